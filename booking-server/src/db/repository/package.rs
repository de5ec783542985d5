//! Package repository

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Package, PackageOption};

#[derive(Clone)]
pub struct PackageRepository {
    base: BaseRepository,
}

impl PackageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, package: Package) -> RepoResult<Package> {
        let created: Option<Package> = self.base.db.create("package").content(package).await?;
        created.ok_or(RepoError::Database(
            "package insert returned nothing".into(),
        ))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Package>> {
        let record_id = parse_package_id(id)?;
        let package: Option<Package> = self.base.db.select(record_id).await?;
        Ok(package)
    }

    /// All packages, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Package>> {
        let mut result = self
            .base
            .db
            .query("SELECT * FROM package ORDER BY created_at DESC")
            .await?;
        let packages: Vec<Package> = result.take(0)?;
        Ok(packages)
    }

    pub async fn update(&self, id: &str, package: Package) -> RepoResult<Package> {
        let record_id = parse_package_id(id)?;
        let updated: Option<Package> = self.base.db.update(record_id).content(package).await?;
        updated.ok_or(RepoError::NotFound)
    }

    /// Delete a package. The caller must verify no options reference it.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_package_id(id)?;
        let deleted: Option<Package> = self.base.db.delete(record_id).await?;
        deleted.map(|_| ()).ok_or(RepoError::NotFound)
    }

    /// Options belonging to a package, oldest first
    pub async fn options_for(&self, package_id: &str) -> RepoResult<Vec<PackageOption>> {
        let record_id = parse_package_id(package_id)?;
        let mut result = self
            .base
            .db
            .query("SELECT * FROM package_option WHERE package = $package ORDER BY created_at ASC")
            .bind(("package", record_id))
            .await?;
        let options: Vec<PackageOption> = result.take(0)?;
        Ok(options)
    }

    pub async fn count(&self) -> RepoResult<usize> {
        let packages = self.find_all().await?;
        Ok(packages.len())
    }
}

fn parse_package_id(id: &str) -> RepoResult<RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("invalid package id: {}", id)))
}
