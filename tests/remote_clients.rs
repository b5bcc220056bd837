//! Tests for the Toggl and Trello API clients against a local stub server.

use chrono::{TimeZone, Utc};

use toggl_trello_kpi::config::LabelColors;
use toggl_trello_kpi::error_handling::ClientError;
use toggl_trello_kpi::initialization::init_client;
use toggl_trello_kpi::toggl::{month_range, TimeEntrySource, TogglClient};
use toggl_trello_kpi::trello::{CardSource, TrelloClient};

#[path = "helpers.rs"]
mod helpers;

use helpers::{spawn_stub_server, Route};

const TIME_ENTRIES: &str = r#"[
    {
        "id": 11, "workspace_id": 42, "project_id": 7, "billable": true,
        "start": "2021-02-01T09:00:00+00:00", "stop": "2021-02-01T10:00:00+00:00",
        "duration": 3600, "description": "Planning", "tags": ["meeting"]
    },
    {
        "id": 12, "workspace_id": 42, "project_id": 7, "billable": false,
        "start": "2021-02-02T09:00:00+00:00", "stop": "2021-02-02T09:30:00+00:00",
        "duration": 1800, "description": "Follow-up", "tags": null
    },
    {
        "id": 13, "workspace_id": 42, "project_id": null, "billable": false,
        "start": "2021-02-03T09:00:00+00:00", "stop": null,
        "duration": -1612345678, "description": "Still running", "tags": []
    },
    {
        "id": 14, "workspace_id": 42, "project_id": null, "billable": false,
        "start": "2021-02-04T09:00:00+00:00", "stop": "2021-02-04T09:05:00+00:00",
        "duration": 300, "description": null, "tags": []
    }
]"#;

const PROJECT: &str = r##"{
    "id": 7, "workspace_id": 42, "client_id": null, "name": "KPI",
    "active": true, "color": "#06aaf5"
}"##;

#[tokio::test]
async fn test_toggl_client_resolves_project_names_once() {
    let (base_url, requests) = spawn_stub_server(vec![
        Route::json("/api/v9/me/time_entries", TIME_ENTRIES),
        Route::json("/api/v9/workspaces/42/projects/7", PROJECT),
    ])
    .await;
    let http = init_client().expect("Failed to build HTTP client");
    let mut client = TogglClient::new(http, &format!("{base_url}/api/v9"), "secret");

    let (start, end) = month_range(2021, 2).unwrap();
    let entries = client.get_range(start, end).await.expect("time entries");

    // The running entry is skipped.
    let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![11, 12, 14]);
    assert_eq!(entries[0].project_name, "KPI");
    assert_eq!(entries[0].tags, vec!["meeting"]);
    assert_eq!(entries[1].project_name, "KPI");
    assert!(entries[1].tags.is_empty());
    assert_eq!(entries[2].project_name, "");
    assert_eq!(entries[2].description, "");
    assert_eq!(
        entries[2].stop,
        Utc.with_ymd_and_hms(2021, 2, 4, 9, 5, 0).unwrap()
    );
    assert_eq!(client.projects().len(), 1);

    let requests = requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 2, "the project is fetched only once");
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path(), "/api/v9/me/time_entries");
    assert!(requests[0]
        .target
        .contains("start_date=2021-02-01T00%3A00%3A00Z"));
    assert!(requests[0]
        .target
        .contains("end_date=2021-02-28T23%3A59%3A59Z"));
    assert_eq!(
        requests[0].header("authorization"),
        Some("Basic c2VjcmV0OmFwaV90b2tlbg==")
    );
    assert_eq!(requests[1].path(), "/api/v9/workspaces/42/projects/7");
}

#[tokio::test]
async fn test_toggl_client_reports_http_status() {
    let (base_url, _requests) = spawn_stub_server(vec![Route::status(
        "/me/time_entries",
        403,
        "Incorrect username and/or password",
    )])
    .await;
    let http = init_client().expect("Failed to build HTTP client");
    let mut client = TogglClient::new(http, &base_url, "wrong");

    let (start, end) = month_range(2021, 2).unwrap();
    let err = client.get_range(start, end).await.unwrap_err();
    match err {
        ClientError::Status { status, url, body } => {
            assert_eq!(status, 403);
            assert!(url.ends_with("/me/time_entries"));
            assert_eq!(body, "Incorrect username and/or password");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_trello_client_classifies_labels() {
    let cards = r#"[
        {
            "id": "c1", "name": "Quarterly report", "closed": false,
            "labels": [
                {"id": "l1", "name": "KPI", "color": "green"},
                {"id": "l2", "name": "ACME", "color": "blue"},
                {"id": "l3", "name": "Someday", "color": null}
            ]
        },
        {"id": "c2", "name": "Archived", "closed": true, "labels": []}
    ]"#;
    let (base_url, requests) =
        spawn_stub_server(vec![Route::json("/1/boards/board42/cards", cards)]).await;
    let http = init_client().expect("Failed to build HTTP client");
    let colors = LabelColors {
        project: vec!["green".to_string()],
        customer: vec!["blue".to_string()],
        team: Vec::new(),
        card_type: Vec::new(),
    };
    let client = TrelloClient::new(
        http,
        &format!("{base_url}/1/"),
        "app-key",
        "token",
        "board42",
        colors,
    );

    let entries = client.get_cards().await.expect("cards");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].labels, vec!["KPI", "ACME", "Someday"]);
    assert_eq!(entries[0].project, "KPI");
    assert_eq!(entries[0].customer, "ACME");
    assert_eq!(entries[0].team, "");
    assert!(entries[1].closed);
    assert!(entries[1].labels.is_empty());

    let requests = requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].target.contains("key=app-key"));
    assert!(requests[0].target.contains("token=token"));
}

#[tokio::test]
async fn test_trello_client_unknown_board() {
    let (base_url, _requests) = spawn_stub_server(Vec::new()).await;
    let http = init_client().expect("Failed to build HTTP client");
    let client = TrelloClient::new(
        http,
        &base_url,
        "app-key",
        "token",
        "missing",
        LabelColors::default(),
    );

    let err = client.get_cards().await.unwrap_err();
    match err {
        ClientError::Status { status, url, .. } => {
            assert_eq!(status, 404);
            assert!(!url.contains("token"), "credentials leaked into {url}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
