//! Trello REST API client.

use serde::Deserialize;

use crate::config::LabelColors;
use crate::error_handling::ClientError;
use crate::http::fetch_json;
use crate::trello::{CardSource, Label, TrelloCardEntry};

#[derive(Debug, Deserialize)]
struct Card {
    id: String,
    name: String,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    labels: Vec<CardLabel>,
}

#[derive(Debug, Deserialize)]
struct CardLabel {
    #[serde(default)]
    name: String,
    // Colorless labels come back as null.
    #[serde(default)]
    color: Option<String>,
}

impl From<CardLabel> for Label {
    fn from(label: CardLabel) -> Self {
        Label {
            name: label.name,
            color: label.color.unwrap_or_default(),
        }
    }
}

/// Client for one Trello board, authenticated with an app key and token.
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    app_key: String,
    api_token: String,
    board_id: String,
    label_colors: LabelColors,
}

impl TrelloClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        app_key: impl Into<String>,
        api_token: impl Into<String>,
        board_id: impl Into<String>,
        label_colors: LabelColors,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_key: app_key.into(),
            api_token: api_token.into(),
            board_id: board_id.into(),
            label_colors,
        }
    }
}

impl CardSource for TrelloClient {
    async fn get_cards(&self) -> Result<Vec<TrelloCardEntry>, ClientError> {
        let url = format!("{}/boards/{}/cards", self.base_url, self.board_id);
        let request = self.http.get(&url).query(&[
            ("key", self.app_key.as_str()),
            ("token", self.api_token.as_str()),
            ("fields", "id,name,closed,labels"),
        ]);
        let cards: Vec<Card> = fetch_json(request).await?;
        Ok(cards
            .into_iter()
            .map(|card| {
                let labels: Vec<Label> = card.labels.into_iter().map(Label::from).collect();
                TrelloCardEntry::from_labels(
                    card.id,
                    card.name,
                    card.closed,
                    &labels,
                    &self.label_colors,
                )
            })
            .collect())
    }
}
