//! Status and category enumerations stored as text columns.
//!
//! Each enum has a fixed wire value used in SQL, JSON and HTML forms.

use std::fmt;

/// A text value that does not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// Account role, one per user.
    pub enum UserRole: "role" {
        JobSeeker => "job-seeker",
        Employer => "employer",
        Admin => "admin",
        SuperAdmin => "super-admin",
    }
}

string_enum! {
    /// Position of a user inside a company.
    pub enum CompanyRole: "company role" {
        Owner => "owner",
        Admin => "admin",
        HrManager => "hr_manager",
        Recruiter => "recruiter",
        Member => "member",
    }
}

string_enum! {
    pub enum JobType: "job type" {
        FullTime => "full-time",
        PartTime => "part-time",
        Contract => "contract",
        Freelance => "freelance",
        Internship => "internship",
    }
}

string_enum! {
    pub enum ExperienceLevel: "experience level" {
        Entry => "entry",
        Mid => "mid",
        Senior => "senior",
        Executive => "executive",
    }
}

string_enum! {
    pub enum SalaryPeriod: "salary period" {
        Hourly => "hourly",
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

string_enum! {
    /// Lifecycle of a job posting.
    pub enum JobStatus: "job status" {
        Draft => "draft",
        Pending => "pending",
        Active => "active",
        Paused => "paused",
        Closed => "closed",
        Expired => "expired",
    }
}

string_enum! {
    /// Lifecycle of a job application.
    pub enum ApplicationStatus: "application status" {
        Submitted => "submitted",
        Reviewing => "reviewing",
        Shortlisted => "shortlisted",
        Interview => "interview",
        Offered => "offered",
        Rejected => "rejected",
        Withdrawn => "withdrawn",
        Accepted => "accepted",
    }
}

string_enum! {
    pub enum SubscriptionStatus: "subscription status" {
        Trial => "trial",
        Active => "active",
        Pending => "pending",
        PastDue => "past_due",
        Cancelled => "cancelled",
        Expired => "expired",
    }
}

string_enum! {
    pub enum BillingPeriod: "billing period" {
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

string_enum! {
    pub enum PackageTier: "package tier" {
        Starter => "starter",
        Professional => "professional",
        Business => "business",
        Enterprise => "enterprise",
    }
}

string_enum! {
    pub enum EmailStatus: "email status" {
        Queued => "queued",
        Sent => "sent",
        Failed => "failed",
        Bounced => "bounced",
    }
}

string_enum! {
    pub enum SmsStatus: "sms status" {
        Queued => "queued",
        Sent => "sent",
        Delivered => "delivered",
        Failed => "failed",
        Expired => "expired",
    }
}

impl JobStatus {
    /// Publishing is allowed from draft, pending and paused.
    pub fn can_publish(&self) -> bool {
        matches!(self, Self::Draft | Self::Pending | Self::Paused)
    }

    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Draft and pending postings are only visible to their company.
    pub fn is_public(&self) -> bool {
        !matches!(self, Self::Draft | Self::Pending)
    }
}

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Withdrawn | Self::Accepted)
    }

    /// Status changes an employer may make.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        matches!(
            (self, next),
            (Submitted, Reviewing | Shortlisted | Rejected)
                | (Reviewing, Shortlisted | Interview | Rejected)
                | (Shortlisted, Interview | Rejected)
                | (Interview, Offered | Rejected)
                | (Offered, Accepted | Rejected)
        )
    }

    /// Whether the applicant may still withdraw.
    pub fn can_withdraw(&self) -> bool {
        !self.is_terminal()
    }
}

impl CompanyRole {
    /// Roles allowed to edit the company profile.
    pub fn can_edit_company(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl SubscriptionStatus {
    /// Statuses that count as the company's current plan.
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Trial | Self::Active)
    }
}

impl SmsStatus {
    /// Maps a delivery receipt status reported by the gateway.
    pub fn from_receipt(status: &str) -> Option<Self> {
        match status.to_ascii_lowercase().as_str() {
            "delivered" => Some(Self::Delivered),
            "failed" | "rejected" => Some(Self::Failed),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl UserRole {
    /// Roles a visitor may pick during self-registration.
    pub fn is_self_service(&self) -> bool {
        matches!(self, Self::JobSeeker | Self::Employer)
    }
}
