//! Jobs client
//!
//! A REST-backed job store plus the notification seam it reports through.
//! The `jobs` binary in this crate is a terminal front end on top of it.

pub mod api;
pub mod error;
pub mod notify;
pub mod store;

pub use api::{ApiConfig, DEFAULT_API_URL, HttpJobApi, JobApi};
pub use error::{ApiError, StoreError, StoreResult};
pub use notify::{
    ConsoleNotifier, Level, Notification, Notifier, RecordingNotifier, TracingNotifier,
};
pub use store::{JobStore, LoadOutcome};
