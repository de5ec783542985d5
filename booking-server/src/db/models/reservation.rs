//! Reservation model and status state machine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

use super::serde_helpers;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether a transition from `self` to `target` is permitted.
    ///
    /// Cancelling an already cancelled reservation is an idempotent no-op;
    /// completed is fully terminal.
    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        match (self, target) {
            (Self::Pending, Self::Confirmed) => true,
            (Self::Pending, Self::Cancelled) => true,
            (Self::Pending, Self::Completed) => true,
            (Self::Confirmed, Self::Cancelled) => true,
            (Self::Confirmed, Self::Completed) => true,
            (Self::Cancelled, Self::Cancelled) => true,
            _ => false,
        }
    }

    /// Terminal states accept no further meaningful transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown reservation status: {}", other)),
        }
    }
}

/// Review sentiment label assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        };
        f.write_str(s)
    }
}

/// Booking of a package option by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Booking user
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// Booked option
    #[serde(with = "serde_helpers::record_id")]
    pub package_option: RecordId,
    /// Scheduled time of the booking, epoch milliseconds
    pub reservation_datetime: i64,
    /// Free-form service address
    pub address: String,
    /// Price captured from the option at creation time. Immutable thereafter.
    pub price_purchased: Decimal,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
    /// Last modification time, epoch milliseconds
    pub updated_at: i64,
}

impl Reservation {
    /// A reservation counts as reviewed once a rating is present
    pub fn is_reviewed(&self) -> bool {
        self.rating.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationRequest {
    pub package_option_id: String,
    /// Scheduled time, epoch milliseconds. Must be in the future.
    pub reservation_datetime: i64,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub review_text: String,
    pub rating: i64,
}
