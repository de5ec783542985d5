//! Package catalog model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::package_option::PackageOption;
use super::serde_helpers;

/// Top-level catalog entry grouping one or more bookable options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Relative URL of the uploaded cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Generated review analysis text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    /// Generated improvement recommendation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default = "serde_helpers::bool_true")]
    pub is_active: bool,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
}

/// Package detail with its options eager-loaded
#[derive(Debug, Clone, Serialize)]
pub struct PackageWithOptions {
    #[serde(flatten)]
    pub package: Package,
    pub options: Vec<PackageOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePackageRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}
