//! Reservation repository
//!
//! Status transitions, review persistence and deletion are single
//! conditional statements so that concurrent writers serialize on the
//! stored status instead of a read-modify-write race.

use serde::Deserialize;
use rust_decimal::Decimal;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::reservation::Sentiment;
use crate::db::models::serde_helpers;
use crate::db::models::{Reservation, ReservationStatus};

/// Optional filters for the admin listing
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub user_id: Option<String>,
}

/// Outcome of a guarded delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Refused because the stored status forbids deletion
    Blocked(ReservationStatus),
    NotFound,
}

/// Projection used by the analytics aggregation
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsRow {
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub package_option: RecordId,
    pub status: ReservationStatus,
    pub price_purchased: Decimal,
    pub reservation_datetime: i64,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> = self
            .base
            .db
            .create("reservation")
            .content(reservation)
            .await?;
        created.ok_or(RepoError::Database(
            "reservation insert returned nothing".into(),
        ))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let record_id = parse_reservation_id(id)?;
        let reservation: Option<Reservation> = self.base.db.select(record_id).await?;
        Ok(reservation)
    }

    /// All reservations matching the filter, most recent booking first
    pub async fn find_all(&self, filter: &ReservationFilter) -> RepoResult<Vec<Reservation>> {
        let mut query =
            String::from("SELECT * FROM reservation WHERE true");
        if filter.status.is_some() {
            query.push_str(" AND status = $status");
        }
        if filter.user_id.is_some() {
            query.push_str(" AND user = $user");
        }
        query.push_str(" ORDER BY reservation_datetime DESC");

        let mut request = self.base.db.query(query);
        if let Some(status) = filter.status {
            request = request.bind(("status", status.as_str().to_string()));
        }
        if let Some(user_id) = &filter.user_id {
            let user: RecordId = user_id
                .parse()
                .map_err(|_| RepoError::Validation(format!("invalid user id: {}", user_id)))?;
            request = request.bind(("user", user));
        }

        let mut result = request.await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations)
    }

    /// Reservations belonging to one user, most recent booking first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Reservation>> {
        self.find_all(&ReservationFilter {
            status: None,
            user_id: Some(user_id.to_string()),
        })
        .await
    }

    /// Apply `from -> to` only if the stored status still equals `from`.
    ///
    /// Returns `None` when the record does not exist or its status moved
    /// in the meantime.
    pub async fn transition_if(
        &self,
        id: &str,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> RepoResult<Option<Reservation>> {
        let record_id = parse_reservation_id(id)?;
        let mut result = self
            .base
            .db
            .query(
                "UPDATE $reservation SET status = $to_status, updated_at = $now \
                 WHERE status = $from_status RETURN AFTER",
            )
            .bind(("reservation", record_id))
            .bind(("from_status", from.as_str().to_string()))
            .bind(("to_status", to.as_str().to_string()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        let updated: Vec<Reservation> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Persist review text, rating and sentiment in one statement, only
    /// while the reservation is completed.
    pub async fn submit_review_if_completed(
        &self,
        id: &str,
        review_text: &str,
        rating: u8,
        sentiment: Sentiment,
    ) -> RepoResult<Option<Reservation>> {
        let record_id = parse_reservation_id(id)?;
        let mut result = self
            .base
            .db
            .query(
                "UPDATE $reservation SET review_text = $review_text, rating = $rating, \
                 sentiment = $sentiment, updated_at = $now \
                 WHERE status = 'completed' RETURN AFTER",
            )
            .bind(("reservation", record_id))
            .bind(("review_text", review_text.to_string()))
            .bind(("rating", rating as i64))
            .bind(("sentiment", sentiment.to_string()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        let updated: Vec<Reservation> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Delete only while the status permits it (pending or cancelled)
    pub async fn delete_if_deletable(&self, id: &str) -> RepoResult<DeleteOutcome> {
        let record_id = parse_reservation_id(id)?;
        let mut result = self
            .base
            .db
            .query(
                "DELETE $reservation \
                 WHERE status IN ['pending', 'cancelled'] RETURN BEFORE",
            )
            .bind(("reservation", record_id))
            .await?;
        let deleted: Vec<Reservation> = result.take(0)?;
        if deleted.into_iter().next().is_some() {
            return Ok(DeleteOutcome::Deleted);
        }

        match self.find_by_id(id).await? {
            Some(existing) => Ok(DeleteOutcome::Blocked(existing.status)),
            None => Ok(DeleteOutcome::NotFound),
        }
    }

    /// Flat projection of every reservation for in-memory aggregation
    pub async fn analytics_rows(&self) -> RepoResult<Vec<AnalyticsRow>> {
        let mut result = self
            .base
            .db
            .query(
                "SELECT user, package_option, status, price_purchased, \
                 reservation_datetime, sentiment, rating FROM reservation",
            )
            .await?;
        let rows: Vec<AnalyticsRow> = result.take(0)?;
        Ok(rows)
    }

    /// Completed, reviewed reservations for one option
    pub async fn reviews_for_option(&self, option_id: &str) -> RepoResult<Vec<Reservation>> {
        let option: RecordId = option_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("invalid option id: {}", option_id)))?;
        let mut result = self
            .base
            .db
            .query(
                "SELECT * FROM reservation WHERE package_option = $option \
                 AND status = 'completed' AND rating != NONE \
                 ORDER BY updated_at DESC",
            )
            .bind(("option", option))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations)
    }

    /// Remove every reservation referencing the option (cascade path)
    pub async fn delete_for_option(&self, option_id: &str) -> RepoResult<usize> {
        let option: RecordId = option_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("invalid option id: {}", option_id)))?;
        let mut result = self
            .base
            .db
            .query("DELETE reservation WHERE package_option = $option RETURN BEFORE")
            .bind(("option", option))
            .await?;
        let deleted: Vec<Reservation> = result.take(0)?;
        Ok(deleted.len())
    }
}

fn parse_reservation_id(id: &str) -> RepoResult<RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("invalid reservation id: {}", id)))
}
