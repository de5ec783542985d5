//! Review submission
//!
//! Classification happens before persistence; when the classifier fails
//! the reservation is left untouched. The final write is a single
//! conditional update so text, rating and sentiment land together.

use std::sync::Arc;

use crate::db::models::Reservation;
use crate::db::models::ReservationStatus;
use crate::db::repository::ReservationRepository;
use crate::services::sentiment::SentimentClassifier;
use crate::utils::validation::{MAX_REVIEW_LEN, validate_rating, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

pub struct ReviewService {
    reservations: ReservationRepository,
    classifier: Arc<dyn SentimentClassifier>,
}

impl ReviewService {
    pub fn new(
        reservations: ReservationRepository,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            reservations,
            classifier,
        }
    }

    /// Submit a review for a completed reservation owned by `actor_id`
    pub async fn submit(
        &self,
        actor_id: &str,
        reservation_id: &str,
        review_text: &str,
        rating: i64,
    ) -> AppResult<Reservation> {
        validate_required_text(review_text, "review_text", MAX_REVIEW_LEN)?;
        let rating = validate_rating(rating)?;

        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

        // A foreign caller gets the same answer as a missing record
        if reservation.user.to_string() != actor_id {
            return Err(AppError::new(ErrorCode::ReservationNotFound));
        }
        if reservation.status != ReservationStatus::Completed {
            return Err(AppError::new(ErrorCode::ReviewNotAllowed)
                .with_detail("status", reservation.status.as_str()));
        }

        let sentiment = self.classifier.classify(review_text).await?;

        self.reservations
            .submit_review_if_completed(reservation_id, review_text, rating, sentiment)
            .await?
            .ok_or_else(|| {
                // Status moved between the read and the write
                AppError::new(ErrorCode::ReviewNotAllowed)
            })
    }
}
