//! Toggl Track API v9 client.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::RequestBuilder;
use serde::Deserialize;

use crate::error_handling::ClientError;
use crate::http::fetch_json;
use crate::record::format_timestamp;
use crate::toggl::{TimeEntrySource, TogglTimeEntry};

/// A time entry as returned by `GET /me/time_entries`.
#[derive(Debug, Deserialize)]
struct TimeEntry {
    id: u64,
    workspace_id: u64,
    #[serde(default)]
    project_id: Option<u64>,
    #[serde(default)]
    description: Option<String>,
    start: DateTime<Utc>,
    #[serde(default)]
    stop: Option<DateTime<Utc>>,
    duration: i64,
    #[serde(default)]
    billable: bool,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// A Toggl project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectData {
    pub id: u64,
    pub workspace_id: u64,
    #[serde(default)]
    pub client_id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub color: Option<String>,
}

/// Projects already fetched, by project id.
///
/// Filled lazily while time entries are resolved. Entries are never expired:
/// a renamed project keeps its old name until the cache is cleared or the
/// client is dropped.
#[derive(Debug, Default)]
pub struct ProjectCache {
    projects: HashMap<u64, ProjectData>,
}

impl ProjectCache {
    pub fn get(&self, project_id: u64) -> Option<&ProjectData> {
        self.projects.get(&project_id)
    }

    pub fn insert(&mut self, project: ProjectData) {
        self.projects.insert(project.id, project);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn clear(&mut self) {
        self.projects.clear();
    }
}

/// Client for the Toggl Track API, authenticated with an API token.
pub struct TogglClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    projects: ProjectCache,
}

impl TogglClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            projects: ProjectCache::default(),
        }
    }

    pub fn projects(&self) -> &ProjectCache {
        &self.projects
    }

    /// Fetches a project, bypassing the cache.
    pub async fn get_project(
        &self,
        workspace_id: u64,
        project_id: u64,
    ) -> Result<ProjectData, ClientError> {
        let url = format!(
            "{}/workspaces/{workspace_id}/projects/{project_id}",
            self.base_url
        );
        fetch_json(self.get(&url)).await
    }

    async fn project_name(
        &mut self,
        workspace_id: u64,
        project_id: Option<u64>,
    ) -> Result<String, ClientError> {
        let Some(project_id) = project_id else {
            return Ok(String::new());
        };
        if let Some(project) = self.projects.get(project_id) {
            return Ok(project.name.clone());
        }
        let project = self.get_project(workspace_id, project_id).await?;
        debug!("Caching Toggl project {} ({})", project.id, project.name);
        let name = project.name.clone();
        self.projects.insert(project);
        Ok(name)
    }

    // The API token is the user name; the password is the literal "api_token".
    fn get(&self, url: &str) -> RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.api_token, Some("api_token"))
    }
}

impl TimeEntrySource for TogglClient {
    async fn get_range(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TogglTimeEntry>, ClientError> {
        let url = format!("{}/me/time_entries", self.base_url);
        let request = self.get(&url).query(&[
            ("start_date", format_timestamp(&start)),
            ("end_date", format_timestamp(&end)),
        ]);
        let time_entries: Vec<TimeEntry> = fetch_json(request).await?;

        let mut entries = Vec::with_capacity(time_entries.len());
        for time_entry in time_entries {
            let Some(stop) = time_entry.stop else {
                info!("Skipping running Toggl time entry {}", time_entry.id);
                continue;
            };
            let project_name = self
                .project_name(time_entry.workspace_id, time_entry.project_id)
                .await?;
            entries.push(to_record(time_entry, stop, project_name));
        }
        Ok(entries)
    }
}

fn to_record(entry: TimeEntry, stop: DateTime<Utc>, project_name: String) -> TogglTimeEntry {
    TogglTimeEntry {
        id: entry.id,
        description: entry.description.unwrap_or_default(),
        start: entry.start,
        stop,
        duration: entry.duration,
        billable: entry.billable,
        workspace_id: entry.workspace_id,
        project_id: entry.project_id.unwrap_or_default(),
        project_name,
        tags: entry.tags.unwrap_or_default(),
        trello_card_id: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_entry_from_api_json() {
        let json = r#"{
            "id": 1900000001,
            "workspace_id": 42,
            "project_id": null,
            "task_id": null,
            "billable": false,
            "start": "2021-02-01T10:00:00+00:00",
            "stop": "2021-02-01T11:30:00+00:00",
            "duration": 5400,
            "description": null,
            "tags": null,
            "at": "2021-02-01T11:30:05+00:00"
        }"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        let stop = entry.stop.unwrap();
        let record = to_record(entry, stop, String::new());

        assert_eq!(record.id, 1_900_000_001);
        assert_eq!(record.description, "");
        assert_eq!(record.project_id, 0);
        assert!(record.tags.is_empty());
        assert_eq!(
            record.stop,
            Utc.with_ymd_and_hms(2021, 2, 1, 11, 30, 0).unwrap()
        );
        assert_eq!(record.trello_card_id, "");
    }

    #[test]
    fn test_project_cache() {
        let mut cache = ProjectCache::default();
        assert!(cache.is_empty());
        cache.insert(ProjectData {
            id: 7,
            workspace_id: 42,
            client_id: None,
            name: "KPI".to_string(),
            active: true,
            color: None,
        });
        assert_eq!(cache.get(7).map(|p| p.name.as_str()), Some("KPI"));
        assert!(cache.get(8).is_none());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = TogglClient::new(reqwest::Client::new(), "http://localhost:1/api/v9/", "t");
        assert_eq!(client.base_url, "http://localhost:1/api/v9");
    }
}
