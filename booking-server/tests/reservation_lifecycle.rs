//! Reservation lifecycle integration tests
//!
//! Runs against a real embedded database in a temporary directory.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use booking_server::db;
use booking_server::db::models::reservation::Sentiment;
use booking_server::db::models::{Package, PackageOption, Reservation, ReservationStatus, User};
use booking_server::db::repository::{
    DeleteOutcome, PackageOptionRepository, PackageRepository, ReservationRepository,
    UserRepository,
};
use booking_server::services::{
    OptionInsights, ReviewService, ReviewSnapshot, SentimentClassifier, SentimentError,
};
use booking_server::utils::ErrorCode;

/// Classifier stub with a switchable failure mode
struct StubClassifier {
    label: Sentiment,
    fail: AtomicBool,
}

impl StubClassifier {
    fn new(label: Sentiment) -> Self {
        Self {
            label,
            fail: AtomicBool::new(false),
        }
    }

    fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SentimentClassifier for StubClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment, SentimentError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SentimentError::Unavailable("stub offline".into()));
        }
        Ok(self.label)
    }

    async fn summarize_reviews(
        &self,
        _option_name: &str,
        _reviews: &[ReviewSnapshot],
    ) -> Result<OptionInsights, SentimentError> {
        Ok(OptionInsights {
            analysis: "stub analysis".into(),
            recommendation: "stub recommendation".into(),
        })
    }
}

struct Fixture {
    db: Surreal<Db>,
    user_id: String,
    option_id: String,
    _dir: tempfile::TempDir,
}

async fn setup() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("db");
    let db = db::connect(path.to_str().expect("utf8 path"))
        .await
        .expect("connect");

    let users = UserRepository::new(db.clone());
    let user = users
        .create(User::new("Jane", "jane@example.com", "password123", "user").expect("user"))
        .await
        .expect("create user");
    let user_id = user.id.expect("user id").to_string();

    let packages = PackageRepository::new(db.clone());
    let package = packages
        .create(Package {
            id: None,
            name: "Weekend Escape".into(),
            description: None,
            image: None,
            analysis: None,
            recommendation: None,
            is_active: true,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
        .await
        .expect("create package");

    let options = PackageOptionRepository::new(db.clone());
    let option = options
        .create(PackageOption {
            id: None,
            package: package.id.expect("package id"),
            name: "Two nights".into(),
            description: None,
            price: Decimal::new(10000, 2),
            image: None,
            analysis: None,
            recommendation: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
        .await
        .expect("create option");
    let option_id = option.id.expect("option id").to_string();

    Fixture {
        db,
        user_id,
        option_id,
        _dir: dir,
    }
}

async fn book(fixture: &Fixture, price: Decimal) -> Reservation {
    let now = chrono::Utc::now().timestamp_millis();
    let repo = ReservationRepository::new(fixture.db.clone());
    repo.create(Reservation {
        id: None,
        user: fixture.user_id.parse().expect("user record id"),
        package_option: fixture.option_id.parse().expect("option record id"),
        reservation_datetime: now + 86_400_000,
        address: "5 Harbour Street".into(),
        price_purchased: price,
        status: ReservationStatus::Pending,
        review_text: None,
        rating: None,
        sentiment: None,
        created_at: now,
        updated_at: now,
    })
    .await
    .expect("create reservation")
}

fn id_of(reservation: &Reservation) -> String {
    reservation.id.as_ref().expect("reservation id").to_string()
}

#[tokio::test]
async fn price_snapshot_survives_option_price_change() {
    let fixture = setup().await;
    let reservation = book(&fixture, Decimal::new(10000, 2)).await;
    let id = id_of(&reservation);

    // Admin doubles the option price afterwards
    let options = PackageOptionRepository::new(fixture.db.clone());
    let mut option = options
        .find_by_id(&fixture.option_id)
        .await
        .expect("lookup")
        .expect("option");
    option.price = Decimal::new(20000, 2);
    options
        .update(&fixture.option_id, option)
        .await
        .expect("update option");

    let repo = ReservationRepository::new(fixture.db.clone());
    let stored = repo
        .find_by_id(&id)
        .await
        .expect("lookup")
        .expect("reservation");
    assert_eq!(stored.price_purchased, Decimal::new(10000, 2));
}

#[tokio::test]
async fn fractional_price_roundtrips_exactly() {
    let fixture = setup().await;
    let reservation = book(&fixture, Decimal::new(4999, 2)).await;
    let id = id_of(&reservation);

    let repo = ReservationRepository::new(fixture.db.clone());
    let stored = repo
        .find_by_id(&id)
        .await
        .expect("lookup")
        .expect("reservation");
    assert_eq!(stored.price_purchased.to_string(), "49.99");
}

#[tokio::test]
async fn transition_follows_state_machine() {
    let fixture = setup().await;
    let repo = ReservationRepository::new(fixture.db.clone());

    let reservation = book(&fixture, Decimal::new(10000, 2)).await;
    let id = id_of(&reservation);

    // pending -> confirmed succeeds
    let confirmed = repo
        .transition_if(&id, ReservationStatus::Pending, ReservationStatus::Confirmed)
        .await
        .expect("query")
        .expect("transition applied");
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);

    // pending -> completed no longer matches; the record moved on
    let stale = repo
        .transition_if(&id, ReservationStatus::Pending, ReservationStatus::Completed)
        .await
        .expect("query");
    assert!(stale.is_none());

    // confirmed -> completed succeeds
    let completed = repo
        .transition_if(
            &id,
            ReservationStatus::Confirmed,
            ReservationStatus::Completed,
        )
        .await
        .expect("query")
        .expect("transition applied");
    assert_eq!(completed.status, ReservationStatus::Completed);

    // A writer still assuming the old status cannot touch the record
    let reopened = repo
        .transition_if(&id, ReservationStatus::Pending, ReservationStatus::Cancelled)
        .await
        .expect("query");
    assert!(reopened.is_none());

    let stored = repo
        .find_by_id(&id)
        .await
        .expect("lookup")
        .expect("reservation");
    assert_eq!(stored.status, ReservationStatus::Completed);
}

#[tokio::test]
async fn delete_allowed_for_pending_and_cancelled_only() {
    let fixture = setup().await;
    let repo = ReservationRepository::new(fixture.db.clone());

    // Pending deletes
    let pending = book(&fixture, Decimal::new(10000, 2)).await;
    assert_eq!(
        repo.delete_if_deletable(&id_of(&pending)).await.expect("query"),
        DeleteOutcome::Deleted
    );

    // Cancelled deletes
    let cancelled = book(&fixture, Decimal::new(10000, 2)).await;
    let cancelled_id = id_of(&cancelled);
    repo.transition_if(
        &cancelled_id,
        ReservationStatus::Pending,
        ReservationStatus::Cancelled,
    )
    .await
    .expect("query")
    .expect("cancel");
    assert_eq!(
        repo.delete_if_deletable(&cancelled_id).await.expect("query"),
        DeleteOutcome::Deleted
    );

    // Confirmed is blocked
    let confirmed = book(&fixture, Decimal::new(10000, 2)).await;
    let confirmed_id = id_of(&confirmed);
    repo.transition_if(
        &confirmed_id,
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
    )
    .await
    .expect("query")
    .expect("confirm");
    assert_eq!(
        repo.delete_if_deletable(&confirmed_id).await.expect("query"),
        DeleteOutcome::Blocked(ReservationStatus::Confirmed)
    );

    // Unknown id
    assert_eq!(
        repo.delete_if_deletable("reservation:doesnotexist")
            .await
            .expect("query"),
        DeleteOutcome::NotFound
    );
}

#[tokio::test]
async fn option_cascade_removes_its_reservations() {
    let fixture = setup().await;
    let repo = ReservationRepository::new(fixture.db.clone());

    let first = book(&fixture, Decimal::new(10000, 2)).await;
    let second = book(&fixture, Decimal::new(10000, 2)).await;

    let removed = repo
        .delete_for_option(&fixture.option_id)
        .await
        .expect("cascade");
    assert_eq!(removed, 2);

    for reservation in [first, second] {
        let stored = repo
            .find_by_id(&id_of(&reservation))
            .await
            .expect("lookup");
        assert!(stored.is_none());
    }
}

#[tokio::test]
async fn review_persists_text_rating_and_sentiment_together() {
    let fixture = setup().await;
    let repo = ReservationRepository::new(fixture.db.clone());
    let classifier = Arc::new(StubClassifier::new(Sentiment::Positive));
    let service = ReviewService::new(repo.clone(), classifier.clone());

    let reservation = book(&fixture, Decimal::new(10000, 2)).await;
    let id = id_of(&reservation);
    repo.transition_if(&id, ReservationStatus::Pending, ReservationStatus::Completed)
        .await
        .expect("query")
        .expect("complete");

    let reviewed = service
        .submit(&fixture.user_id, &id, "Lovely weekend, would book again", 5)
        .await
        .expect("review accepted");

    assert_eq!(reviewed.rating, Some(5));
    assert_eq!(
        reviewed.review_text.as_deref(),
        Some("Lovely weekend, would book again")
    );
    assert_eq!(reviewed.sentiment, Some(Sentiment::Positive));
}

#[tokio::test]
async fn review_rejected_when_classifier_fails() {
    let fixture = setup().await;
    let repo = ReservationRepository::new(fixture.db.clone());
    let classifier = Arc::new(StubClassifier::new(Sentiment::Positive));
    let service = ReviewService::new(repo.clone(), classifier.clone());

    let reservation = book(&fixture, Decimal::new(10000, 2)).await;
    let id = id_of(&reservation);
    repo.transition_if(&id, ReservationStatus::Pending, ReservationStatus::Completed)
        .await
        .expect("query")
        .expect("complete");

    classifier.set_failing(true);
    let result = service
        .submit(&fixture.user_id, &id, "Terrible, never again", 1)
        .await;
    assert!(result.is_err());

    // Nothing of the submission was persisted
    let stored = repo
        .find_by_id(&id)
        .await
        .expect("lookup")
        .expect("reservation");
    assert!(stored.review_text.is_none());
    assert!(stored.rating.is_none());
    assert!(stored.sentiment.is_none());
}

#[tokio::test]
async fn review_requires_completed_status_and_ownership() {
    let fixture = setup().await;
    let repo = ReservationRepository::new(fixture.db.clone());
    let service = ReviewService::new(
        repo.clone(),
        Arc::new(StubClassifier::new(Sentiment::Neutral)),
    );

    let reservation = book(&fixture, Decimal::new(10000, 2)).await;
    let id = id_of(&reservation);

    // Still pending
    assert!(
        service
            .submit(&fixture.user_id, &id, "Too early to tell", 3)
            .await
            .is_err()
    );

    repo.transition_if(&id, ReservationStatus::Pending, ReservationStatus::Completed)
        .await
        .expect("query")
        .expect("complete");

    // Wrong owner answers as if the reservation did not exist
    let err = service
        .submit("user:somebodyelse", &id, "Not my booking", 3)
        .await
        .expect_err("foreign review");
    assert_eq!(err.code, ErrorCode::ReservationNotFound);

    // Rating out of range
    assert!(
        service
            .submit(&fixture.user_id, &id, "Fine I guess", 6)
            .await
            .is_err()
    );

    // Valid submission still works afterwards
    assert!(
        service
            .submit(&fixture.user_id, &id, "Fine I guess", 3)
            .await
            .is_ok()
    );
}
