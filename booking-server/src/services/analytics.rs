//! Analytics aggregation
//!
//! All aggregation runs in memory over a flat projection of the
//! reservation table. Revenue maths stay in `Decimal`; only the
//! sentiment ratios are floats.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::models::reservation::Sentiment;
use crate::db::models::ReservationStatus;
use crate::db::repository::{
    AnalyticsRow, PackageOptionRepository, PackageRepository, ReservationFilter,
    ReservationRepository, UserRepository,
};
use crate::utils::AppResult;

/// Share of each sentiment label among labelled reviews, percent, 2dp
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentRatios {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// The option with the most completed reservations
#[derive(Debug, Clone, Serialize)]
pub struct BestOption {
    pub id: String,
    pub name: String,
    pub package_name: String,
    pub completed_count: usize,
}

/// Revenue for one calendar month
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyRevenue {
    /// "YYYY-MM"
    pub month: String,
    pub revenue: Decimal,
}

/// One row of the recent-activity list
#[derive(Debug, Clone, Serialize)]
pub struct RecentReservation {
    pub id: String,
    pub package_option: String,
    pub reservation_datetime: i64,
    pub status: ReservationStatus,
    pub price_purchased: Decimal,
    pub reviewed: bool,
}

/// Full analytics payload
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub total_reservations: usize,
    pub active_users: usize,
    pub total_packages: usize,
    pub total_revenue: Decimal,
    pub sentiment_ratios: SentimentRatios,
    pub best_option: Option<BestOption>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub recent_reservations: Vec<RecentReservation>,
}

pub struct AnalyticsService {
    reservations: ReservationRepository,
    options: PackageOptionRepository,
    packages: PackageRepository,
    users: UserRepository,
}

impl AnalyticsService {
    pub fn new(
        reservations: ReservationRepository,
        options: PackageOptionRepository,
        packages: PackageRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            reservations,
            options,
            packages,
            users,
        }
    }

    /// Compute the full analytics snapshot
    pub async fn compute(&self) -> AppResult<AnalyticsResponse> {
        let rows = self.reservations.analytics_rows().await?;
        let now = Utc::now();

        let total_reservations = rows.len();
        // Every registered account counts, booked or not
        let active_users = self.users.count().await?;
        let total_packages = self.packages.count().await?;
        let total_revenue = total_completed_revenue(&rows);
        let sentiment_ratios = sentiment_ratios(&rows);
        let monthly_revenue = monthly_revenue(&rows, now);

        let best_option = match best_option_counts(&rows) {
            Some((option_id, completed_count)) => {
                self.describe_option(&option_id, completed_count).await?
            }
            None => None,
        };

        let recent = self
            .reservations
            .find_all(&ReservationFilter::default())
            .await?;
        let recent_reservations = recent
            .into_iter()
            .take(5)
            .map(|r| RecentReservation {
                id: r.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                package_option: r.package_option.to_string(),
                reservation_datetime: r.reservation_datetime,
                status: r.status,
                price_purchased: r.price_purchased,
                reviewed: r.is_reviewed(),
            })
            .collect();

        Ok(AnalyticsResponse {
            total_reservations,
            active_users,
            total_packages,
            total_revenue,
            sentiment_ratios,
            best_option,
            monthly_revenue,
            recent_reservations,
        })
    }

    async fn describe_option(
        &self,
        option_id: &str,
        completed_count: usize,
    ) -> AppResult<Option<BestOption>> {
        let Some(option) = self.options.find_by_id(option_id).await? else {
            return Ok(None);
        };
        let package_name = self
            .packages
            .find_by_id(&option.package.to_string())
            .await?
            .map(|p| p.name)
            .unwrap_or_default();

        Ok(Some(BestOption {
            id: option_id.to_string(),
            name: option.name,
            package_name,
            completed_count,
        }))
    }
}

/// Sum of `price_purchased` over completed reservations
fn total_completed_revenue(rows: &[AnalyticsRow]) -> Decimal {
    rows.iter()
        .filter(|r| r.status == ReservationStatus::Completed)
        .map(|r| r.price_purchased)
        .sum()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Label shares among labelled reviews. All zeros when nothing is labelled.
fn sentiment_ratios(rows: &[AnalyticsRow]) -> SentimentRatios {
    let mut positive = 0usize;
    let mut neutral = 0usize;
    let mut negative = 0usize;

    for row in rows {
        match row.sentiment {
            Some(Sentiment::Positive) => positive += 1,
            Some(Sentiment::Neutral) => neutral += 1,
            Some(Sentiment::Negative) => negative += 1,
            None => {}
        }
    }

    let total = positive + neutral + negative;
    if total == 0 {
        return SentimentRatios {
            positive: 0.0,
            neutral: 0.0,
            negative: 0.0,
        };
    }

    let pct = |count: usize| round2(count as f64 * 100.0 / total as f64);
    SentimentRatios {
        positive: pct(positive),
        neutral: pct(neutral),
        negative: pct(negative),
    }
}

/// Completed revenue bucketed per calendar month over the trailing twelve
/// months, ascending. Months without revenue are omitted.
fn monthly_revenue(rows: &[AnalyticsRow], now: DateTime<Utc>) -> Vec<MonthlyRevenue> {
    let cutoff = now
        .checked_sub_months(Months::new(12))
        .unwrap_or(now)
        .timestamp_millis();

    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        if row.status != ReservationStatus::Completed {
            continue;
        }
        if row.reservation_datetime < cutoff || row.reservation_datetime > now.timestamp_millis() {
            continue;
        }
        let Some(dt) = DateTime::<Utc>::from_timestamp_millis(row.reservation_datetime) else {
            continue;
        };
        let key = format!("{:04}-{:02}", dt.year(), dt.month());
        *buckets.entry(key).or_insert(Decimal::ZERO) += row.price_purchased;
    }

    buckets
        .into_iter()
        .map(|(month, revenue)| MonthlyRevenue { month, revenue })
        .collect()
}

/// Option with the most completed reservations; ties break toward the
/// lexicographically smallest record id so the result is deterministic.
fn best_option_counts(rows: &[AnalyticsRow]) -> Option<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        if row.status == ReservationStatus::Completed {
            *counts.entry(row.package_option.to_string()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
}
