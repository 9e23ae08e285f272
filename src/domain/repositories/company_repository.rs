//! Repository trait for companies, memberships and reference data.

use async_trait::async_trait;

use crate::domain::entities::{Company, CompanyMembership, CompanyPatch, Industry, Skill};
use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Active memberships of a user in active companies, oldest first.
    async fn memberships(&self, user_id: i64) -> Result<Vec<CompanyMembership>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>, AppError>;

    async fn list_active(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Company>, AppError>;

    async fn count_active(&self, search: Option<String>) -> Result<i64, AppError>;

    async fn update(&self, id: i64, patch: CompanyPatch) -> Result<Company, AppError>;

    /// Active industries ordered for display.
    async fn industries(&self) -> Result<Vec<Industry>, AppError>;

    async fn industry_exists(&self, id: i64) -> Result<bool, AppError>;

    /// Returns the subset of `ids` that exist.
    async fn existing_skill_ids(&self, ids: Vec<i64>) -> Result<Vec<i64>, AppError>;

    async fn skills(&self) -> Result<Vec<Skill>, AppError>;
}
