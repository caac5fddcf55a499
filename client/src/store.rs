//! Job store
//!
//! Holds the in-memory job list and keeps it in step with the remote
//! collection. Every operation reports its outcome to the user through the
//! store's `Notifier`; nothing is retried.
//!
//! Overlapping `load()` calls are ordered by a request sequence: each load
//! takes a ticket, and only the holder of the newest ticket may touch the
//! list. An older load that finishes late is dropped.

use crate::api::JobApi;
use crate::error::{StoreError, StoreResult};
use crate::notify::{Notification, Notifier};
use common::{FilterCriteria, Job, JobDraft, JobId, JobPatch, filter_sort};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// What became of a `load()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The list was replaced; carries the new length
    Applied(usize),
    /// A newer load was issued before this one finished; state untouched
    Superseded,
}

pub struct JobStore<A, N> {
    api: A,
    notifier: N,
    jobs: RwLock<Vec<Job>>,
    load_seq: AtomicU64,
}

impl<A: JobApi, N: Notifier> JobStore<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            jobs: RwLock::new(Vec::new()),
            load_seq: AtomicU64::new(0),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Copy of the current list, in store order
    pub async fn snapshot(&self) -> Vec<Job> {
        self.jobs.read().await.clone()
    }

    pub async fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.read().await.iter().find(|j| j.id == *id).cloned()
    }

    /// Runs the filter/sort pipeline over the current list
    pub async fn view(&self, criteria: &FilterCriteria) -> Vec<Job> {
        let jobs = self.jobs.read().await;
        filter_sort(&jobs, criteria).into_iter().cloned().collect()
    }

    /// Replaces the list with the remote collection.
    ///
    /// On failure the list is emptied, not kept.
    pub async fn load(&self) -> StoreResult<LoadOutcome> {
        let ticket = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, "loading jobs");

        let result = self.api.list_jobs().await;

        // Check the ticket while holding the write lock so a newer load
        // can't slip its result in between the check and the write.
        let mut jobs = self.jobs.write().await;
        let latest = self.load_seq.load(Ordering::SeqCst);
        if latest != ticket {
            debug!(ticket, latest, "discarding superseded load");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(fetched) => {
                let count = fetched.len();
                *jobs = fetched;
                info!(count, "jobs loaded");
                Ok(LoadOutcome::Applied(count))
            }
            Err(e) => {
                jobs.clear();
                drop(jobs);
                warn!("load failed, job list cleared: {}", e);
                self.fail("Failed to fetch jobs", e.into())
            }
        }
    }

    /// Sends a new job and adds the record the server hands back. If a load
    /// already brought that id in, the existing entry is replaced instead.
    pub async fn create(&self, draft: JobDraft) -> StoreResult<Job> {
        let draft = draft.normalized();
        if let Err(e) = draft.validate() {
            return self.reject(e.into());
        }

        match self.api.create_job(&draft).await {
            Ok(job) => {
                info!(id = %job.id, "job created");
                let mut jobs = self.jobs.write().await;
                match jobs.iter_mut().find(|j| j.id == job.id) {
                    Some(slot) => *slot = job.clone(),
                    None => jobs.push(job.clone()),
                }
                drop(jobs);
                self.notifier
                    .notify(Notification::success("Job added successfully"));
                Ok(job)
            }
            Err(e) => self.fail("Failed to add job", e.into()),
        }
    }

    /// Merges `patch` into the local record and sends the result as a full
    /// replacement. The local record is swapped for the server's answer.
    pub async fn update(&self, id: &JobId, patch: &JobPatch) -> StoreResult<Job> {
        let Some(mut replacement) = self.get(id).await else {
            return self.fail("Failed to update job", StoreError::UnknownJob(id.clone()));
        };
        replacement.apply(patch);
        if let Err(e) = JobDraft::from(&replacement).validate() {
            return self.reject(e.into());
        }

        match self.api.update_job(&replacement).await {
            Ok(updated) => {
                info!(id = %id, "job updated");
                let mut jobs = self.jobs.write().await;
                if let Some(slot) = jobs.iter_mut().find(|j| j.id == *id) {
                    *slot = updated.clone();
                }
                drop(jobs);
                self.notifier
                    .notify(Notification::success("Job updated successfully"));
                Ok(updated)
            }
            Err(e) => self.fail("Failed to update job", e.into()),
        }
    }

    /// Deletes the job remotely, then drops it locally. No undo.
    pub async fn remove(&self, id: &JobId) -> StoreResult<()> {
        match self.api.delete_job(id).await {
            Ok(()) => {
                info!(id = %id, "job deleted");
                self.jobs.write().await.retain(|j| j.id != *id);
                self.notifier
                    .notify(Notification::success("Job deleted successfully"));
                Ok(())
            }
            Err(e) => self.fail("Failed to delete job", e.into()),
        }
    }

    fn fail<T>(&self, context: &str, err: StoreError) -> StoreResult<T> {
        self.notifier
            .notify(Notification::error(format!("{}: {}", context, err)));
        Err(err)
    }

    /// Form problems are shown as-is, like the form's own messages
    fn reject<T>(&self, err: StoreError) -> StoreResult<T> {
        self.notifier.notify(Notification::error(err.to_string()));
        Err(err)
    }
}
