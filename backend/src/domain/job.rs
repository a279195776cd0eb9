//! Job applications tracked on behalf of a user.
//!
//! A [`Job`] is always owned by exactly one user. Field constraints are
//! enforced both when a job is created from a [`JobDraft`] and whenever a
//! [`JobPatch`] is applied, so a stored job is valid by construction.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::UserId;
use super::identifier::uuid_identifier;

uuid_identifier!(
    /// Stable job identifier.
    JobId
);

/// Maximum length of the company and title fields.
pub const JOB_HEADLINE_MAX: usize = 100;
/// Maximum length of location and contact name.
pub const JOB_SHORT_TEXT_MAX: usize = 100;
/// Maximum length of free-form notes.
pub const JOB_NOTES_MAX: usize = 1000;

/// Lifecycle stage of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
    Accepted,
}

impl JobStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Applied,
        Self::Interview,
        Self::Offer,
        Self::Rejected,
        Self::Accepted,
    ];

    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
            Self::Accepted => "Accepted",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| JobValidationError::UnknownStatus {
                value: s.to_owned(),
            })
    }
}

/// Validation failures for job fields.
///
/// The `Display` strings are returned to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobValidationError {
    #[error("Please add a company name")]
    MissingCompany,
    #[error("Please add a job title")]
    MissingTitle,
    #[error("Please add an applied date")]
    MissingAppliedDate,
    #[error("{label} cannot be more than {max} characters")]
    TooLong {
        field: &'static str,
        label: &'static str,
        max: usize,
    },
    #[error("Please add a valid email")]
    InvalidContactEmail,
    #[error("Please use a valid URL with HTTP or HTTPS")]
    InvalidLink,
    #[error("Status must be one of Applied, Interview, Offer, Rejected, Accepted")]
    UnknownStatus { value: String },
}

impl JobValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingCompany => "company",
            Self::MissingTitle => "title",
            Self::MissingAppliedDate => "appliedDate",
            Self::TooLong { field, .. } => *field,
            Self::InvalidContactEmail => "contactEmail",
            Self::InvalidLink => "link",
            Self::UnknownStatus { .. } => "status",
        }
    }
}

static CONTACT_EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static LINK_RE: OnceLock<Regex> = OnceLock::new();

fn contact_email_regex() -> &'static Regex {
    CONTACT_EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$")
            .unwrap_or_else(|error| panic!("contact email regex failed to compile: {error}"))
    })
}

fn link_regex() -> &'static Regex {
    LINK_RE.get_or_init(|| {
        Regex::new(r#"^https?://[^ "]+$"#)
            .unwrap_or_else(|error| panic!("link regex failed to compile: {error}"))
    })
}

#[derive(Clone, Copy)]
struct TextRule {
    field: &'static str,
    label: &'static str,
    max: usize,
}

const COMPANY: TextRule = TextRule {
    field: "company",
    label: "Company name",
    max: JOB_HEADLINE_MAX,
};
const TITLE: TextRule = TextRule {
    field: "title",
    label: "Job title",
    max: JOB_HEADLINE_MAX,
};
const LOCATION: TextRule = TextRule {
    field: "location",
    label: "Location",
    max: JOB_SHORT_TEXT_MAX,
};
const CONTACT_NAME: TextRule = TextRule {
    field: "contactName",
    label: "Contact name",
    max: JOB_SHORT_TEXT_MAX,
};
const NOTES: TextRule = TextRule {
    field: "notes",
    label: "Notes",
    max: JOB_NOTES_MAX,
};

fn check_length(value: &str, rule: TextRule) -> Result<(), JobValidationError> {
    if value.chars().count() > rule.max {
        return Err(JobValidationError::TooLong {
            field: rule.field,
            label: rule.label,
            max: rule.max,
        });
    }
    Ok(())
}

fn required_text(
    value: &str,
    rule: TextRule,
    missing: JobValidationError,
) -> Result<String, JobValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing);
    }
    check_length(trimmed, rule)?;
    Ok(trimmed.to_owned())
}

/// Trim an optional field; blank values collapse to `None`.
fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}

/// Optional descriptive fields attached to a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub location: Option<String>,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub salary: Option<String>,
    pub link: Option<String>,
}

impl JobDetails {
    /// Trim every field and enforce the per-field constraints.
    pub fn normalised(self) -> Result<Self, JobValidationError> {
        let details = Self {
            location: optional_text(self.location.as_deref()),
            notes: optional_text(self.notes.as_deref()),
            contact_name: optional_text(self.contact_name.as_deref()),
            contact_email: optional_text(self.contact_email.as_deref()),
            contact_phone: optional_text(self.contact_phone.as_deref()),
            salary: optional_text(self.salary.as_deref()),
            link: optional_text(self.link.as_deref()),
        };
        if let Some(location) = &details.location {
            check_length(location, LOCATION)?;
        }
        if let Some(contact_name) = &details.contact_name {
            check_length(contact_name, CONTACT_NAME)?;
        }
        if let Some(notes) = &details.notes {
            check_length(notes, NOTES)?;
        }
        if details
            .contact_email
            .as_deref()
            .is_some_and(|email| !contact_email_regex().is_match(email))
        {
            return Err(JobValidationError::InvalidContactEmail);
        }
        if details
            .link
            .as_deref()
            .is_some_and(|link| !link_regex().is_match(link))
        {
            return Err(JobValidationError::InvalidLink);
        }
        Ok(details)
    }
}

/// Unvalidated input for a new job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDraft {
    pub company: String,
    pub title: String,
    pub status: Option<JobStatus>,
    pub applied_date: Option<DateTime<Utc>>,
    pub details: JobDetails,
}

/// Partial update; `None` leaves a field untouched and an empty detail
/// string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
    pub company: Option<String>,
    pub title: Option<String>,
    pub status: Option<JobStatus>,
    pub applied_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub salary: Option<String>,
    pub link: Option<String>,
}

/// A stored job application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub owner: UserId,
    pub company: String,
    pub title: String,
    pub status: JobStatus,
    pub applied_date: DateTime<Utc>,
    pub details: JobDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Old and new status captured while applying a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

impl Job {
    /// Validate `draft` and build a job owned by `owner`.
    pub fn create(
        id: JobId,
        owner: UserId,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, JobValidationError> {
        let company = required_text(&draft.company, COMPANY, JobValidationError::MissingCompany)?;
        let title = required_text(&draft.title, TITLE, JobValidationError::MissingTitle)?;
        let applied_date = draft
            .applied_date
            .ok_or(JobValidationError::MissingAppliedDate)?;
        let details = draft.details.normalised()?;
        Ok(Self {
            id,
            owner,
            company,
            title,
            status: draft.status.unwrap_or_default(),
            applied_date,
            details,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply `patch`, returning the updated job and the status transition
    /// when the status actually changed.
    pub fn apply(
        &self,
        patch: JobPatch,
        now: DateTime<Utc>,
    ) -> Result<(Self, Option<StatusTransition>), JobValidationError> {
        let company = match patch.company {
            Some(company) => required_text(&company, COMPANY, JobValidationError::MissingCompany)?,
            None => self.company.clone(),
        };
        let title = match patch.title {
            Some(title) => required_text(&title, TITLE, JobValidationError::MissingTitle)?,
            None => self.title.clone(),
        };
        let current = &self.details;
        let details = JobDetails {
            location: patch.location.or_else(|| current.location.clone()),
            notes: patch.notes.or_else(|| current.notes.clone()),
            contact_name: patch.contact_name.or_else(|| current.contact_name.clone()),
            contact_email: patch.contact_email.or_else(|| current.contact_email.clone()),
            contact_phone: patch.contact_phone.or_else(|| current.contact_phone.clone()),
            salary: patch.salary.or_else(|| current.salary.clone()),
            link: patch.link.or_else(|| current.link.clone()),
        }
        .normalised()?;

        let status = patch.status.unwrap_or(self.status);
        let transition = (status != self.status).then_some(StatusTransition {
            from: self.status,
            to: status,
        });

        let updated = Self {
            id: self.id,
            owner: self.owner,
            company,
            title,
            status,
            applied_date: patch.applied_date.unwrap_or(self.applied_date),
            details,
            created_at: self.created_at,
            updated_at: now,
        };
        Ok((updated, transition))
    }
}

/// Direction for ordering by applied date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Parse the `sort` query value; anything but `asc` sorts newest first.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("asc") => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
