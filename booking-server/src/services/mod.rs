//! Service layer
//!
//! Business operations that span repositories or external collaborators.

pub mod analytics;
pub mod reviews;
pub mod sentiment;

pub use analytics::{AnalyticsResponse, AnalyticsService};
pub use reviews::ReviewService;
pub use sentiment::{
    HttpSentimentService, OptionInsights, ReviewSnapshot, SentimentClassifier, SentimentConfig,
    SentimentError,
};
