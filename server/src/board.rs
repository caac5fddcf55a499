//! In-memory job collection behind the REST API, optionally mirrored to a JSON file.

use common::{Job, JobDraft, JobId, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Job {0} not found")]
    NotFound(JobId),

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("No job ids left after {0}")]
    IdsExhausted(i64),

    #[error("Failed to read jobs file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse jobs file: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct JobBoard {
    jobs: RwLock<Vec<Job>>,
    data_path: Option<PathBuf>,
}

impl JobBoard {
    /// A board that lives only in memory
    #[cfg(test)]
    pub fn in_memory(jobs: Vec<Job>) -> Self {
        Self {
            jobs: RwLock::new(jobs),
            data_path: None,
        }
    }

    /// Loads the board from `path`, or starts from the sample postings when
    /// the file doesn't exist yet. Mutations are written back to `path`.
    pub async fn open(path: &Path) -> Result<Self, BoardError> {
        let jobs: Vec<Job> = if path.exists() {
            info!("📂 Loading jobs from {:?}", path);
            let content = tokio::fs::read_to_string(path).await?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            info!("⚠️  No {:?} found, starting from sample jobs", path);
            sample_jobs()
        };

        Ok(Self {
            jobs: RwLock::new(jobs),
            data_path: Some(path.to_path_buf()),
        })
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn list(&self) -> Vec<Job> {
        self.jobs.read().await.clone()
    }

    pub async fn create(&self, draft: JobDraft) -> Result<Job, BoardError> {
        draft.validate()?;

        let mut jobs = self.jobs.write().await;
        let job = Job::from_draft(next_id(&jobs)?, draft);
        jobs.push(job.clone());
        info!(id = %job.id, "job created");

        self.persist(&jobs).await;
        Ok(job)
    }

    /// Replaces the job stored under `id`; the stored record keeps `id`.
    pub async fn replace(&self, id: &JobId, draft: JobDraft) -> Result<Job, BoardError> {
        draft.validate()?;

        let mut jobs = self.jobs.write().await;
        let slot = jobs
            .iter_mut()
            .find(|j| j.id == *id)
            .ok_or_else(|| BoardError::NotFound(id.clone()))?;
        *slot = Job::from_draft(id.clone(), draft);
        let job = slot.clone();
        info!(id = %id, "job updated");

        self.persist(&jobs).await;
        Ok(job)
    }

    pub async fn delete(&self, id: &JobId) -> Result<(), BoardError> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|j| j.id != *id);
        if jobs.len() == before {
            return Err(BoardError::NotFound(id.clone()));
        }
        info!(id = %id, "job deleted");

        self.persist(&jobs).await;
        Ok(())
    }

    /// Writes the collection back to disk. A failed write is logged; the
    /// in-memory change stands.
    async fn persist(&self, jobs: &[Job]) {
        let Some(path) = &self.data_path else {
            return;
        };

        let json = match serde_json::to_string_pretty(jobs) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize jobs: {}", e);
                return;
            }
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = tokio::fs::create_dir_all(dir).await {
                warn!("Failed to create {:?}: {}", dir, e);
                return;
            }
        }
        if let Err(e) = tokio::fs::write(path, json).await {
            warn!("Failed to write {:?}: {}", path, e);
        }
    }
}

/// One past the largest integer id in use
fn next_id(jobs: &[Job]) -> Result<JobId, BoardError> {
    let max = jobs.iter().filter_map(|j| j.id.as_int()).max().unwrap_or(0);
    max.checked_add(1)
        .map(JobId::Int)
        .ok_or(BoardError::IdsExhausted(max))
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: i64,
    title: &str,
    company: &str,
    location: &str,
    job_type: &str,
    description: &str,
    tags: &[&str],
    posting_date: &str,
) -> Job {
    Job {
        id: JobId::Int(id),
        title: Some(title.to_string()),
        company: Some(company.to_string()),
        location: Some(location.to_string()),
        job_type: Some(job_type.to_string()),
        description: Some(description.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        posting_date: Some(posting_date.to_string()),
    }
}

/// Postings served when there is no data file yet
pub fn sample_jobs() -> Vec<Job> {
    vec![
        sample(
            1,
            "Frontend Developer",
            "TechCorp",
            "New York",
            "Full-time",
            "We are looking for a skilled Frontend Developer with React experience.",
            &["React", "JavaScript", "Frontend"],
            "2023-05-15",
        ),
        sample(
            2,
            "Backend Engineer",
            "DataSystems",
            "San Francisco",
            "Full-time",
            "Join our team to build scalable backend services.",
            &["Python", "Java", "Backend"],
            "2023-05-10",
        ),
        sample(
            3,
            "UI/UX Designer",
            "CreativeMinds",
            "Remote",
            "Contract",
            "Design beautiful interfaces for our clients.",
            &["UI/UX", "Figma", "Design"],
            "2023-05-18",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> JobDraft {
        JobDraft {
            title: Some(title.to_string()),
            company: Some("Acme".to_string()),
            description: Some("Build things".to_string()),
            posting_date: Some("2023-06-01".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_next_id_skips_text_ids() {
        let mut jobs = sample_jobs();
        jobs[1].id = JobId::Text("legacy".to_string());
        assert_eq!(next_id(&jobs).unwrap(), JobId::Int(4));
        assert_eq!(next_id(&[]).unwrap(), JobId::Int(1));
    }

    #[tokio::test]
    async fn test_create_after_largest_id_fails_without_storing() {
        let mut jobs = sample_jobs();
        jobs[2].id = JobId::Int(i64::MAX);
        let board = JobBoard::in_memory(jobs.clone());

        let err = board.create(draft("QA Engineer")).await.unwrap_err();
        assert!(matches!(err, BoardError::IdsExhausted(i64::MAX)));
        assert_eq!(board.list().await, jobs);
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let board = JobBoard::in_memory(sample_jobs());
        let job = board.create(draft("QA Engineer")).await.unwrap();
        assert_eq!(job.id, JobId::Int(4));
        assert_eq!(board.len().await, 4);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft() {
        let board = JobBoard::in_memory(Vec::new());
        let err = board
            .create(JobDraft {
                description: None,
                ..draft("QA Engineer")
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter job description");
        assert_eq!(board.len().await, 0);
    }

    #[tokio::test]
    async fn test_replace_and_delete_unknown() {
        let board = JobBoard::in_memory(sample_jobs());
        assert!(matches!(
            board.replace(&JobId::Int(9), draft("Ghost")).await,
            Err(BoardError::NotFound(_))
        ));
        assert!(matches!(
            board.delete(&JobId::Int(9)).await,
            Err(BoardError::NotFound(_))
        ));
        assert_eq!(board.list().await, sample_jobs());
    }

    #[tokio::test]
    async fn test_open_missing_file_seeds_samples_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("jobs.json");

        let board = JobBoard::open(&path).await.unwrap();
        assert_eq!(board.len().await, 3);
        assert!(!path.exists());

        board.delete(&JobId::Int(2)).await.unwrap();
        let saved: Vec<Job> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.len(), 2);

        let reopened = JobBoard::open(&path).await.unwrap();
        assert_eq!(reopened.list().await, saved);
    }

    #[tokio::test]
    async fn test_open_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            JobBoard::open(&path).await,
            Err(BoardError::Json(_))
        ));
    }
}
