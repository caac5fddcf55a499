//! Job records and the shapes used to create and edit them.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire format of `postingDate`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Job types offered by the create/edit form
pub const JOB_TYPES: [&str; 5] = ["Full-time", "Part-time", "Contract", "Internship", "Remote"];

/// Locations offered by the create/edit form
pub const LOCATIONS: [&str; 5] = ["New York", "San Francisco", "London", "Berlin", "Remote"];

/// Tags offered by the tag selector
pub const SUGGESTED_TAGS: [&str; 8] = [
    "React",
    "Python",
    "JavaScript",
    "Java",
    "DevOps",
    "UI/UX",
    "Backend",
    "Frontend",
];

pub const DEFAULT_JOB_TYPE: &str = "Full-time";
pub const DEFAULT_LOCATION: &str = "New York";

const PLACEHOLDER: &str = "N/A";

/// Server-assigned identifier. Backends hand out either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Int(i64),
    Text(String),
}

impl JobId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            JobId::Int(n) => Some(*n),
            JobId::Text(_) => None,
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Int(n) => write!(f, "{}", n),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for JobId {
    type Err = Infallible;

    /// All-digit text becomes an integer id, anything else stays a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) if s.chars().all(|c| c.is_ascii_digit()) => JobId::Int(n),
            _ => JobId::Text(s.to_string()),
        })
    }
}

impl From<i64> for JobId {
    fn from(n: i64) -> Self {
        JobId::Int(n)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId::Text(s.to_string())
    }
}

/// A job posting as stored by the backend.
///
/// Every descriptive field may be absent on the wire; rendering goes through
/// the `*_or_placeholder` accessors so a sparse record still displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<String>,
}

impl Job {
    /// Builds the stored record for a draft once the backend picked an id
    pub fn from_draft(id: JobId, draft: JobDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id,
            title: draft.title,
            company: draft.company,
            location: draft.location,
            job_type: draft.job_type,
            description: draft.description,
            tags: draft.tags,
            posting_date: draft.posting_date,
        }
    }

    /// Overwrites the fields the patch carries and leaves the rest alone.
    pub fn apply(&mut self, patch: &JobPatch) {
        if let Some(title) = &patch.title {
            self.title = Some(title.clone());
        }
        if let Some(company) = &patch.company {
            self.company = Some(company.clone());
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(job_type) = &patch.job_type {
            self.job_type = Some(job_type.clone());
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
            dedupe_tags(&mut self.tags);
        }
        if let Some(posting_date) = &patch.posting_date {
            self.posting_date = Some(posting_date.clone());
        }
    }

    /// Calendar date the job was posted, if `postingDate` parses
    pub fn posted_on(&self) -> Option<NaiveDate> {
        self.posting_date.as_deref().and_then(parse_posting_date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn company_or_placeholder(&self) -> &str {
        self.company.as_deref().unwrap_or("Unknown company")
    }

    pub fn location_or_placeholder(&self) -> &str {
        self.location.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn job_type_or_placeholder(&self) -> &str {
        self.job_type.as_deref().unwrap_or(PLACEHOLDER)
    }
}

/// Parses a posting date: `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
pub fn parse_posting_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Removes repeated tags, keeping the first occurrence of each.
pub fn dedupe_tags(tags: &mut Vec<String>) {
    let mut seen = HashSet::new();
    tags.retain(|tag| seen.insert(tag.clone()));
}

/// Body of a create request: a job without its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<String>,
}

impl Default for JobDraft {
    /// Same starting values as the "Add Job" form
    fn default() -> Self {
        Self {
            title: None,
            company: None,
            location: Some(DEFAULT_LOCATION.to_string()),
            job_type: Some(DEFAULT_JOB_TYPE.to_string()),
            description: None,
            tags: Vec::new(),
            posting_date: None,
        }
    }
}

/// A required form field was left empty, or the date doesn't parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{message}")]
    MissingField {
        field: &'static str,
        message: &'static str,
    },

    #[error("Invalid posting date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl JobDraft {
    /// Checks required fields in form order and reports the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("title", &self.title, "Please enter job title"),
            ("company", &self.company, "Please enter company name"),
            ("jobType", &self.job_type, "Please select job type"),
            ("location", &self.location, "Please select location"),
            ("postingDate", &self.posting_date, "Please select posting date"),
            ("description", &self.description, "Please enter job description"),
        ];

        for (field, value, message) in required {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                return Err(ValidationError::MissingField { field, message });
            }
        }

        if let Some(date) = &self.posting_date {
            NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
                .map_err(|_| ValidationError::InvalidDate(date.clone()))?;
        }

        Ok(())
    }

    pub fn normalized(mut self) -> Self {
        dedupe_tags(&mut self.tags);
        self
    }
}

impl From<&Job> for JobDraft {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            description: job.description.clone(),
            tags: job.tags.clone(),
            posting_date: job.posting_date.clone(),
        }
    }
}

/// Partial edit of a job. `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<String>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        *self == JobPatch::default()
    }
}
