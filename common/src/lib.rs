//! Shared job-board types.
//!
//! The job record as it travels over the wire, the draft/patch shapes used
//! by the create and edit flows, and the pure filter/sort pipeline that turns
//! the in-memory collection into the list a front end renders.

pub mod display;
pub mod filter;
pub mod job;

pub use filter::{
    ActiveFilter, FilterCriteria, FilterKind, Selector, SortMode, filter_sort, matches_job_type,
    matches_location, matches_search, matches_tags,
};
pub use job::{Job, JobDraft, JobId, JobPatch, ValidationError};
