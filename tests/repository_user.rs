use chrono::{Duration, Utc};
use hr_talent::domain::entities::{NewCompanyProfile, NewUser, UserRole};
use hr_talent::domain::repositories::UserRepository;
use hr_talent::infrastructure::persistence::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

fn new_user(email: &str, role: UserRole) -> NewUser {
    NewUser {
        uuid: Uuid::new_v4(),
        first_name: "Amina".to_string(),
        last_name: "Otieno".to_string(),
        email: email.to_string(),
        phone: None,
        password_hash: "$argon2id$placeholder".to_string(),
        role,
        email_verification_token: format!("token-{email}"),
        company: None,
    }
}

#[sqlx::test]
async fn test_create_job_seeker_with_profile(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo
        .create(new_user("amina@example.com", UserRole::JobSeeker))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::JobSeeker);
    assert_eq!(user.failed_login_attempts, 0);
    let seeker = repo.find_job_seeker(user.id).await.unwrap().unwrap();
    assert_eq!(seeker.profile_completion_percentage, 20);
}

#[sqlx::test]
async fn test_create_admin_without_profile(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo
        .create(new_user("ops@example.com", UserRole::Admin))
        .await
        .unwrap();

    assert!(repo.find_job_seeker(user.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_create_employer_with_company(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));
    let mut employer = new_user("hr@acme.co.ke", UserRole::Employer);
    employer.company = Some(NewCompanyProfile {
        name: "Acme Ltd".to_string(),
        slug: "acme-ltd".to_string(),
        website: None,
        description: None,
        industry_id: None,
    });

    let user = repo.create(employer).await.unwrap();

    let role: String =
        sqlx::query_scalar("SELECT role_type FROM user_company_roles WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(role, "owner");
    assert!(repo.find_job_seeker(user.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_find_by_email_and_token(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let created = repo
        .create(new_user("amina@example.com", UserRole::JobSeeker))
        .await
        .unwrap();

    let by_email = repo.find_by_email("amina@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(created.id));

    let by_token = repo
        .find_by_verification_token("token-amina@example.com")
        .await
        .unwrap();
    assert_eq!(by_token.map(|u| u.id), Some(created.id));

    assert!(repo.find_by_email("ghost@example.com").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_failed_logins_lock_at_threshold(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo
        .create(new_user("amina@example.com", UserRole::JobSeeker))
        .await
        .unwrap();
    let until = Utc::now() + Duration::minutes(15);

    for expected in 1..3 {
        let failed = repo.record_failed_login(user.id, 3, until).await.unwrap();
        assert_eq!(failed.attempts, expected);
        assert!(failed.locked_until.is_none());
    }

    let locked = repo.record_failed_login(user.id, 3, until).await.unwrap();
    assert_eq!(locked.attempts, 0);
    assert!(locked.locked_until.is_some());

    repo.clear_lock(user.id).await.unwrap();
    let user = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(user.locked_until.is_none());
    assert_eq!(user.failed_login_attempts, 0);
}

#[sqlx::test]
async fn test_mark_email_verified_drops_token(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo
        .create(new_user("amina@example.com", UserRole::JobSeeker))
        .await
        .unwrap();

    repo.mark_email_verified(user.id).await.unwrap();

    let user = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(user.email_verified_at.is_some());
    assert!(
        repo.find_by_verification_token("token-amina@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
async fn test_list_and_count(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    for i in 0..3 {
        repo.create(new_user(&format!("user{i}@example.com"), UserRole::JobSeeker))
            .await
            .unwrap();
    }

    assert_eq!(repo.count().await.unwrap(), 3);
    assert_eq!(repo.list(0, 2).await.unwrap().len(), 2);
    assert_eq!(repo.list(2, 2).await.unwrap().len(), 1);
}

fn employer(email: &str, company: &str) -> NewUser {
    let mut employer = new_user(email, UserRole::Employer);
    employer.company = Some(NewCompanyProfile {
        name: company.to_string(),
        slug: "acme-ltd".to_string(),
        website: None,
        description: None,
        industry_id: None,
    });
    employer
}

#[sqlx::test]
async fn test_duplicate_phone_reported_on_phone(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let mut first = new_user("amina@example.com", UserRole::JobSeeker);
    first.phone = Some("+254712345678".to_string());
    repo.create(first).await.unwrap();

    let mut second = new_user("brian@example.com", UserRole::JobSeeker);
    second.phone = Some("+254712345678".to_string());
    let err = repo.create(second).await.unwrap_err();

    assert_eq!(err.field_messages()[0].0, "phone");
}

#[sqlx::test]
async fn test_duplicate_email_reported_on_email(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("amina@example.com", UserRole::JobSeeker))
        .await
        .unwrap();

    let err = repo
        .create(new_user("AMINA@example.com", UserRole::JobSeeker))
        .await
        .unwrap_err();

    assert_eq!(err.field_messages()[0].0, "email");
}

#[sqlx::test]
async fn test_concurrent_employers_get_distinct_slugs(pool: PgPool) {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    let (a, b, c) = tokio::join!(
        repo.create(employer("a@acme.co.ke", "Acme Ltd")),
        repo.create(employer("b@acme.co.ke", "Acme Ltd")),
        repo.create(employer("c@acme.co.ke", "Acme Ltd")),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    let slugs: Vec<String> = sqlx::query_scalar("SELECT slug FROM companies ORDER BY slug")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(slugs, ["acme-ltd", "acme-ltd-1", "acme-ltd-2"]);
}
