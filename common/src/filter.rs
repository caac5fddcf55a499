//! Filter/sort pipeline
//!
//! A pure function from (job list, criteria) to the ordered list a front end
//! renders. Each criterion is its own predicate so it can be tested alone.

use crate::job::Job;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single-choice selector that may be switched off with "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn only(value: impl Into<String>) -> Self {
        Selector::Only(value.into())
    }

    /// Exact match; `All` accepts everything, including a missing value.
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") {
            Selector::All
        } else {
            Selector::Only(value)
        }
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::All => "all".to_string(),
            Selector::Only(value) => value,
        }
    }
}

impl FromStr for Selector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selector::from(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            other => Err(format!(
                "unknown sort mode '{}', expected 'newest' or 'oldest'",
                other
            )),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Newest => f.write_str("newest"),
            SortMode::Oldest => f.write_str("oldest"),
        }
    }
}

/// Current search/filter/sort selections. Session-scoped, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: String,
    pub job_type: Selector,
    pub location: Selector,
    pub tags: Vec<String>,
    pub sort: SortMode,
}

/// Which criterion an active-filter chip refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Search,
    JobType,
    Location,
    Tags,
}

/// A non-default criterion, as shown in the active filters bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub kind: FilterKind,
    pub label: String,
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FilterCriteria {
    /// Lists every criterion that currently narrows the result.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut active = Vec::new();

        if !self.search.is_empty() {
            active.push(ActiveFilter {
                kind: FilterKind::Search,
                label: format!("Search: {}", self.search),
            });
        }
        if let Selector::Only(job_type) = &self.job_type {
            active.push(ActiveFilter {
                kind: FilterKind::JobType,
                label: format!("Job Type: {}", job_type),
            });
        }
        if let Selector::Only(location) = &self.location {
            active.push(ActiveFilter {
                kind: FilterKind::Location,
                label: format!("Location: {}", location),
            });
        }
        if !self.tags.is_empty() {
            active.push(ActiveFilter {
                kind: FilterKind::Tags,
                label: format!("Tags: {}", self.tags.join(", ")),
            });
        }

        active
    }

    /// Resets one criterion to its default.
    pub fn clear(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Search => self.search.clear(),
            FilterKind::JobType => self.job_type = Selector::All,
            FilterKind::Location => self.location = Selector::All,
            FilterKind::Tags => self.tags.clear(),
        }
    }
}

/// Case-insensitive substring match on title or company. Empty search matches everything.
pub fn matches_search(job: &Job, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    };
    contains(&job.title) || contains(&job.company)
}

pub fn matches_job_type(job: &Job, selector: &Selector) -> bool {
    selector.accepts(job.job_type.as_deref())
}

pub fn matches_location(job: &Job, selector: &Selector) -> bool {
    selector.accepts(job.location.as_deref())
}

/// Conjunctive: the job must carry every selected tag.
pub fn matches_tags(job: &Job, selected: &[String]) -> bool {
    selected.iter().all(|tag| job.has_tag(tag))
}

/// Sort key for a job; unparseable or missing dates count as the epoch
/// (`NaiveDate::default()` is 1970-01-01).
fn sort_key(job: &Job) -> NaiveDate {
    job.posted_on().unwrap_or_default()
}

/// Filters and orders `jobs` for display. The input is never modified and
/// jobs with equal dates keep their original relative order.
pub fn filter_sort<'a>(jobs: &'a [Job], criteria: &FilterCriteria) -> Vec<&'a Job> {
    let mut result: Vec<&Job> = jobs
        .iter()
        .filter(|job| matches_search(job, &criteria.search))
        .filter(|job| matches_job_type(job, &criteria.job_type))
        .filter(|job| matches_location(job, &criteria.location))
        .filter(|job| matches_tags(job, &criteria.tags))
        .collect();

    // slice::sort_by is stable
    match criteria.sort {
        SortMode::Newest => result.sort_by(|a, b| sort_key(b).cmp(&sort_key(a))),
        SortMode::Oldest => result.sort_by(|a, b| sort_key(a).cmp(&sort_key(b))),
    }

    result
}
