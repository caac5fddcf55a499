//! Job store driven over HTTP against a mocked jobs API.

use client::{ApiConfig, HttpJobApi, JobStore, LoadOutcome, Notification, RecordingNotifier};
use common::{FilterCriteria, JobId, JobPatch};
use mockito::{Matcher, Server};

const JOBS: &str = r#"[
  {"id":1,"title":"Frontend Developer","company":"TechCorp","location":"New York","jobType":"Full-time",
   "description":"React work","tags":["React","JavaScript","Frontend"],"postingDate":"2023-05-15"},
  {"id":2,"title":"Backend Engineer","company":"DataSystems","location":"San Francisco","jobType":"Full-time",
   "description":"Services","tags":["Python","Java","Backend"],"postingDate":"2023-05-10"},
  {"id":3,"title":"UI/UX Designer","company":"CreativeMinds","location":"Remote","jobType":"Contract",
   "description":"Interfaces","tags":["UI/UX","Figma","Design"],"postingDate":"2023-05-18"}
]"#;

fn store_for(server: &Server) -> JobStore<HttpJobApi, RecordingNotifier> {
    let api = HttpJobApi::new(ApiConfig::new(format!("{}/api", server.url()))).unwrap();
    JobStore::new(api, RecordingNotifier::new())
}

#[tokio::test]
async fn test_load_and_view() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/jobs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(JOBS)
        .create_async()
        .await;

    let store = store_for(&server);
    assert_eq!(store.load().await.unwrap(), LoadOutcome::Applied(3));

    let newest: Vec<JobId> = store
        .view(&FilterCriteria::default())
        .await
        .into_iter()
        .map(|j| j.id)
        .collect();
    assert_eq!(newest, vec![JobId::Int(3), JobId::Int(1), JobId::Int(2)]);

    list.assert_async().await;
}

#[tokio::test]
async fn test_remove_then_failed_load_empties_list() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/jobs")
        .with_status(200)
        .with_body(JOBS)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/jobs/2")
        .with_status(204)
        .create_async()
        .await;

    let store = store_for(&server);
    store.load().await.unwrap();
    store.remove(&JobId::Int(2)).await.unwrap();
    assert_eq!(store.snapshot().await.len(), 2);

    list.remove_async().await;
    let failing = server
        .mock("GET", "/api/jobs")
        .with_status(500)
        .with_body("database unavailable")
        .create_async()
        .await;

    assert!(store.load().await.is_err());
    assert!(store.snapshot().await.is_empty());
    assert_eq!(store.notifier().errors().len(), 1);

    delete.assert_async().await;
    failing.assert_async().await;
}

#[tokio::test]
async fn test_update_sends_merged_record() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/api/jobs")
        .with_status(200)
        .with_body(JOBS)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/api/jobs/3")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "id": 3,
            "title": "UI/UX Designer",
            "company": "CreativeMinds",
            "location": "Berlin"
        })))
        .with_status(200)
        .with_body(
            r#"{"id":3,"title":"UI/UX Designer","company":"CreativeMinds","location":"Berlin",
                "jobType":"Contract","description":"Interfaces","tags":["UI/UX"],"postingDate":"2023-05-18"}"#,
        )
        .create_async()
        .await;

    let store = store_for(&server);
    store.load().await.unwrap();

    let patch = JobPatch {
        location: Some("Berlin".to_string()),
        ..Default::default()
    };
    let updated = store.update(&JobId::Int(3), &patch).await.unwrap();

    assert_eq!(updated.location.as_deref(), Some("Berlin"));
    // The server's answer wins over the local merge
    assert_eq!(updated.tags, vec!["UI/UX"]);
    assert_eq!(store.get(&JobId::Int(3)).await, Some(updated));
    assert_eq!(
        store.notifier().notifications(),
        vec![Notification::success("Job updated successfully")]
    );

    put.assert_async().await;
}
