//! Database models
//!
//! Record types stored in SurrealDB plus the request/response DTOs that
//! travel over the API.

pub mod package;
pub mod package_option;
pub mod reservation;
pub mod serde_helpers;
pub mod user;

pub use package::{CreatePackageRequest, Package, PackageWithOptions, UpdatePackageRequest};
pub use package_option::{CreateOptionRequest, PackageOption, UpdateOptionRequest};
pub use reservation::{
    CreateReservationRequest, Reservation, ReservationStatus, ReviewRequest, Sentiment,
    UpdateStatusRequest,
};
pub use user::User;
