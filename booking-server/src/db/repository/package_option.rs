//! Package option repository

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::PackageOption;

#[derive(Clone)]
pub struct PackageOptionRepository {
    base: BaseRepository,
}

impl PackageOptionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, option: PackageOption) -> RepoResult<PackageOption> {
        let created: Option<PackageOption> = self
            .base
            .db
            .create("package_option")
            .content(option)
            .await?;
        created.ok_or(RepoError::Database(
            "package_option insert returned nothing".into(),
        ))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PackageOption>> {
        let record_id = parse_option_id(id)?;
        let option: Option<PackageOption> = self.base.db.select(record_id).await?;
        Ok(option)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<PackageOption>> {
        let mut result = self
            .base
            .db
            .query("SELECT * FROM package_option ORDER BY created_at ASC")
            .await?;
        let options: Vec<PackageOption> = result.take(0)?;
        Ok(options)
    }

    pub async fn update(&self, id: &str, option: PackageOption) -> RepoResult<PackageOption> {
        let record_id = parse_option_id(id)?;
        let updated: Option<PackageOption> =
            self.base.db.update(record_id).content(option).await?;
        updated.ok_or(RepoError::NotFound)
    }

    /// Delete an option. The caller must verify no reservations reference it.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_option_id(id)?;
        let deleted: Option<PackageOption> = self.base.db.delete(record_id).await?;
        deleted.map(|_| ()).ok_or(RepoError::NotFound)
    }

    /// Store generated analysis and recommendation text on an option
    pub async fn set_insights(
        &self,
        id: &str,
        analysis: &str,
        recommendation: &str,
    ) -> RepoResult<PackageOption> {
        let record_id = parse_option_id(id)?;
        let mut result = self
            .base
            .db
            .query(
                "UPDATE $option SET analysis = $analysis, recommendation = $recommendation \
                 RETURN AFTER",
            )
            .bind(("option", record_id))
            .bind(("analysis", analysis.to_string()))
            .bind(("recommendation", recommendation.to_string()))
            .await?;
        let updated: Vec<PackageOption> = result.take(0)?;
        updated.into_iter().next().ok_or(RepoError::NotFound)
    }
}

fn parse_option_id(id: &str) -> RepoResult<RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("invalid package option id: {}", id)))
}
