//! Public job search page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
    response::Response,
};
use url::form_urlencoded;

use crate::api::dto::jobs::JobSearchParams;
use crate::api::extract::Client;
use crate::application::services::FilterOptions;
use crate::domain::entities::{JobFilter, JobPosting, PageMeta, Paginated};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::cookies::Toast;
use crate::web::middleware::web_auth::current_user;
use crate::web::page::{PageContext, render};

/// What a search result shows.
#[derive(Debug, Clone)]
pub struct JobCard {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: &'static str,
    pub experience_level: &'static str,
    pub salary: Option<String>,
    pub is_remote: bool,
    pub is_featured: bool,
    pub is_urgent: bool,
    pub posted: String,
}

impl From<&JobPosting> for JobCard {
    fn from(job: &JobPosting) -> Self {
        Self {
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            location: job.location.clone(),
            job_type: job.job_type.as_str(),
            experience_level: job.experience_level.as_str(),
            salary: salary_label(job),
            is_remote: job.is_remote,
            is_featured: job.is_featured,
            is_urgent: job.is_urgent,
            posted: job
                .published_at
                .unwrap_or(job.created_at)
                .format("%d %b %Y")
                .to_string(),
        }
    }
}

fn salary_label(job: &JobPosting) -> Option<String> {
    let amount = match (job.salary_min, job.salary_max) {
        (Some(min), Some(max)) => format!("{min:.0} - {max:.0}"),
        (Some(min), None) => format!("from {min:.0}"),
        (None, Some(max)) => format!("up to {max:.0}"),
        (None, None) => return job.salary_negotiable.then(|| "Negotiable".to_string()),
    };
    Some(format!(
        "{} {amount} / {}",
        job.salary_currency, job.salary_period
    ))
}

/// An `<option>` in one of the filter selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    fn new(value: impl ToString, label: impl ToString, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

fn labelled(value: &str) -> String {
    let mut label = value.replace('-', " ");
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    label
}

#[derive(Template, WebTemplate)]
#[template(path = "jobs.html")]
struct JobsTemplate {
    page: PageContext,
    jobs: Vec<JobCard>,
    pagination: PageMeta,
    search: String,
    location: String,
    remote_only: bool,
    job_types: Vec<Choice>,
    experience_levels: Vec<Choice>,
    industries: Vec<Choice>,
    previous_page: Option<u32>,
    next_page: Option<u32>,
    query: String,
}

impl JobsTemplate {
    fn new(
        page: PageContext,
        results: Paginated<JobPosting>,
        filters: FilterOptions,
        current: &JobFilter,
    ) -> Self {
        let meta = results.meta;
        Self {
            page,
            jobs: results.items.iter().map(JobCard::from).collect(),
            pagination: meta,
            search: current.search.clone().unwrap_or_default(),
            location: current.location.clone().unwrap_or_default(),
            remote_only: current.is_remote == Some(true),
            job_types: filters
                .job_types
                .iter()
                .map(|t| {
                    Choice::new(t, labelled(t), current.job_type.is_some_and(|c| c.as_str() == *t))
                })
                .collect(),
            experience_levels: filters
                .experience_levels
                .iter()
                .map(|l| {
                    Choice::new(
                        l,
                        labelled(l),
                        current.experience_level.is_some_and(|c| c.as_str() == *l),
                    )
                })
                .collect(),
            industries: filters
                .industries
                .iter()
                .map(|i| Choice::new(i.id, &i.name, current.industry_id == Some(i.id)))
                .collect(),
            previous_page: (meta.current_page > 1).then(|| meta.current_page - 1),
            next_page: (meta.current_page < meta.last_page).then(|| meta.current_page + 1),
            query: filter_query(current),
        }
    }
}

/// Current filters as a query string, without the page number.
fn filter_query(filter: &JobFilter) -> String {
    let mut parts = Vec::new();
    let mut push = |key: &str, value: String| {
        let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
        parts.push(format!("{key}={encoded}"));
    };
    if let Some(search) = &filter.search {
        push("search", search.clone());
    }
    if let Some(location) = &filter.location {
        push("location", location.clone());
    }
    if let Some(job_type) = filter.job_type {
        push("type", job_type.to_string());
    }
    if let Some(level) = filter.experience_level {
        push("experience_level", level.to_string());
    }
    if let Some(industry) = filter.industry_id {
        push("industry_id", industry.to_string());
    }
    if let Some(remote) = filter.is_remote {
        push("is_remote", remote.to_string());
    }
    if let Some(min) = filter.salary_min {
        push("salary_min", min.to_string());
    }
    if let Some(max) = filter.salary_max {
        push("salary_max", max.to_string());
    }
    parts.join("&")
}

/// Renders the job search page.
///
/// # Endpoint
///
/// `GET /jobs`
///
/// Accepts the query parameters of `GET /api/jobs`. A malformed query shows
/// every active job with a warning instead of failing.
pub async fn jobs_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    client: Client,
    params: Result<Query<JobSearchParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let user = current_user(&state, &headers).await;
    let mut page = PageContext::new(&state.app_name, &headers, user.as_ref());

    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignoring malformed job search query");
            page = page.with_toast(Toast::warning(
                "Some filters were not understood and were ignored.",
            ));
            JobSearchParams::default()
        }
    };

    let current = params.filter();
    let mut visitor = client.visitor();
    visitor.user_id = user.as_ref().map(|u| u.id);

    let results = state
        .job_service
        .search(current.clone(), params.pagination.page_request(), visitor)
        .await?;
    let filters = state.job_service.filter_options().await?;

    Ok(render(JobsTemplate::new(page, results, filters, &current)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ExperienceLevel, JobType, PageRequest};
    use crate::domain::entities::job_posting::fixtures::job;

    #[test]
    fn test_salary_label() {
        let mut posting = job(1, 1, 1);
        posting.salary_min = Some(80000.0);
        posting.salary_max = Some(120000.0);
        assert_eq!(
            salary_label(&posting).as_deref(),
            Some("KES 80000 - 120000 / monthly")
        );

        posting.salary_min = None;
        posting.salary_max = None;
        posting.salary_negotiable = false;
        assert_eq!(salary_label(&posting), None);

        posting.salary_negotiable = true;
        assert_eq!(salary_label(&posting).as_deref(), Some("Negotiable"));
    }

    #[test]
    fn test_choice_labels() {
        assert_eq!(labelled("full-time"), "Full time");
        assert_eq!(labelled("senior"), "Senior");
        assert_eq!(labelled(""), "");
    }

    #[test]
    fn test_template_marks_selection_and_pages() {
        let filters = FilterOptions {
            industries: Vec::new(),
            job_types: vec!["full-time", "contract"],
            experience_levels: vec!["entry", "senior"],
        };
        let current = JobFilter {
            job_type: Some(JobType::Contract),
            ..JobFilter::default()
        };
        let results = Paginated::new(vec![job(1, 1, 1)], PageRequest::new(Some(2), Some(1)), 3);

        let template = JobsTemplate::new(PageContext::default(), results, filters, &current);
        assert!(!template.job_types[0].selected);
        assert!(template.job_types[1].selected);
        assert_eq!(template.previous_page, Some(1));
        assert_eq!(template.next_page, Some(3));
        assert_eq!(template.query, "type=contract");
        assert_eq!(template.jobs.len(), 1);
    }

    #[test]
    fn test_filter_query_encodes_values() {
        let filter = JobFilter {
            search: Some("rust & go".into()),
            job_type: Some(JobType::FullTime),
            experience_level: Some(ExperienceLevel::Senior),
            is_remote: Some(true),
            ..JobFilter::default()
        };
        assert_eq!(
            filter_query(&filter),
            "search=rust+%26+go&type=full-time&experience_level=senior&is_remote=true"
        );
        assert_eq!(filter_query(&JobFilter::default()), "");
    }
}
