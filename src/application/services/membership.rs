//! Resolving the company an employer acts for.

use serde_json::json;

use crate::domain::entities::CompanyMembership;
use crate::domain::repositories::CompanyRepository;
use crate::error::AppError;

/// Company permission flags carried by a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    PostJobs,
    ManageApplications,
    ManageBilling,
}

impl Permission {
    fn granted(&self, membership: &CompanyMembership) -> bool {
        match self {
            Self::PostJobs => membership.can_post_jobs,
            Self::ManageApplications => membership.can_manage_applications,
            Self::ManageBilling => membership.can_manage_billing,
        }
    }

    fn denied_message(&self) -> &'static str {
        match self {
            Self::PostJobs => "You do not have permission to post jobs",
            Self::ManageApplications => "You do not have permission to manage applications",
            Self::ManageBilling => "You do not have permission to manage billing",
        }
    }
}

/// The user's primary company membership, optionally requiring a permission.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] when the user has no company or lacks the
/// permission.
pub async fn require_membership<C: CompanyRepository + ?Sized>(
    companies: &C,
    user_id: i64,
    permission: Option<Permission>,
) -> Result<CompanyMembership, AppError> {
    let membership = companies
        .memberships(user_id)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::forbidden("No company associated with user", json!({})))?;

    if let Some(permission) = permission
        && !permission.granted(&membership)
    {
        return Err(AppError::forbidden(permission.denied_message(), json!({})));
    }

    Ok(membership)
}
