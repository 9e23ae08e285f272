//! Public company directory and employer company profile.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::membership::require_membership;
use crate::domain::entities::{Company, CompanyPatch, JobPosting, PageRequest, Paginated, User};
use crate::domain::repositories::{CompanyRepository, JobRepository};
use crate::error::AppError;

pub struct CompanyService<C, J>
where
    C: CompanyRepository,
    J: JobRepository,
{
    companies: Arc<C>,
    jobs: Arc<J>,
}

impl<C, J> CompanyService<C, J>
where
    C: CompanyRepository,
    J: JobRepository,
{
    pub fn new(companies: Arc<C>, jobs: Arc<J>) -> Self {
        Self { companies, jobs }
    }

    pub async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Paginated<Company>, AppError> {
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let total = self.companies.count_active(search.clone()).await?;
        let items = self
            .companies
            .list_active(search, page.offset(), page.limit())
            .await?;

        Ok(Paginated::new(items, page, total))
    }

    /// Looks a company up by numeric id or by slug.
    pub async fn show(&self, id_or_slug: &str) -> Result<Company, AppError> {
        let company = match id_or_slug.parse::<i64>() {
            Ok(id) => self.companies.find_by_id(id).await?,
            Err(_) => self.companies.find_by_slug(id_or_slug).await?,
        };

        company
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::not_found("Company not found", json!({})))
    }

    pub async fn jobs(
        &self,
        id_or_slug: &str,
        page: PageRequest,
    ) -> Result<(Company, Vec<JobPosting>), AppError> {
        let company = self.show(id_or_slug).await?;
        let jobs = self
            .jobs
            .list_open_for_company(company.id, page.offset(), page.limit())
            .await?;
        Ok((company, jobs))
    }

    pub async fn my_company(&self, user: &User) -> Result<Company, AppError> {
        let membership = require_membership(self.companies.as_ref(), user.id, None).await?;

        self.companies
            .find_by_id(membership.company_id)
            .await?
            .ok_or_else(|| AppError::not_found("Company not found", json!({})))
    }

    /// Updates the employer's company. Only owners and admins may edit it.
    pub async fn update_company(&self, user: &User, patch: CompanyPatch) -> Result<Company, AppError> {
        let membership = require_membership(self.companies.as_ref(), user.id, None).await?;

        if !membership.role_type.can_edit_company() {
            return Err(AppError::forbidden(
                "You do not have permission to update the company",
                json!({}),
            ));
        }

        if let Some(industry_id) = patch.industry_id
            && !self.companies.industry_exists(industry_id).await?
        {
            return Err(AppError::invalid_field(
                "industry_id",
                "The selected industry is invalid.",
            ));
        }

        if patch.is_empty() {
            return self.my_company(user).await;
        }

        let company = self.companies.update(membership.company_id, patch).await?;
        info!(company_id = company.id, "Company updated");
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::company::fixtures::{company, owner_membership};
    use crate::domain::entities::user::fixtures::user;
    use crate::domain::entities::{CompanyMembership, CompanyRole};
    use crate::domain::repositories::{MockCompanyRepository, MockJobRepository};

    #[tokio::test]
    async fn test_show_by_id_or_slug() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .withf(|id| *id == 12)
            .returning(|id| Ok(Some(company(id))));
        companies
            .expect_find_by_slug()
            .withf(|slug| slug == "acme-ltd")
            .returning(|_| Ok(Some(company(3))));

        let svc = CompanyService::new(Arc::new(companies), Arc::new(MockJobRepository::new()));
        assert_eq!(svc.show("12").await.unwrap().id, 12);
        assert_eq!(svc.show("acme-ltd").await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_inactive_company_hidden() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_find_by_id().returning(|id| {
            Ok(Some(Company {
                is_active: false,
                ..company(id)
            }))
        });

        let svc = CompanyService::new(Arc::new(companies), Arc::new(MockJobRepository::new()));
        assert!(matches!(svc.show("1").await, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_recruiter_cannot_edit_company() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_memberships().returning(|_| {
            Ok(vec![CompanyMembership {
                role_type: CompanyRole::Recruiter,
                ..owner_membership(1)
            }])
        });
        companies.expect_update().never();

        let svc = CompanyService::new(Arc::new(companies), Arc::new(MockJobRepository::new()));
        let patch = CompanyPatch {
            name: Some("New".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_company(&user(1), patch).await,
            Err(AppError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_owner_updates_company() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_memberships()
            .returning(|_| Ok(vec![owner_membership(4)]));
        companies
            .expect_update()
            .withf(|id, patch| *id == 4 && patch.description.as_deref() == Some("We hire"))
            .times(1)
            .returning(|id, _| Ok(company(id)));

        let svc = CompanyService::new(Arc::new(companies), Arc::new(MockJobRepository::new()));
        let patch = CompanyPatch {
            description: Some("We hire".to_string()),
            ..Default::default()
        };
        assert_eq!(svc.update_company(&user(1), patch).await.unwrap().id, 4);
    }
}
