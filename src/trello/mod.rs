//! Trello board cards.
//!
//! [`Trello`] pulls every card of the configured board from a [`CardSource`]
//! (normally the [`TrelloClient`]) and either writes them to
//! `trello_entries.csv` or stores them in the `trello_card` table.

mod client;

use std::path::PathBuf;

use log::{error, info};

use crate::config::{LabelColors, TRELLO_CARD_TABLE, TRELLO_CSV_NAME};
use crate::error_handling::{ClientError, DatabaseError, TrelloError};
use crate::export::write_records_csv_in;
use crate::record::{Field, FieldKind, FieldValue, Record};
use crate::storage::{insert_records, DatabaseConnection, SqlExecutor};

pub use client::TrelloClient;

/// One Trello card, flattened to a `trello_card` row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrelloCardEntry {
    pub id: String,
    pub name: String,
    pub closed: bool,
    /// Names of all labels on the card, in board order.
    pub labels: Vec<String>,
    pub project: String,
    pub customer: String,
    pub team: String,
    /// Stored in the `type` column.
    pub card_type: String,
}

impl Record for TrelloCardEntry {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            kind: FieldKind::Text,
            get: |c| FieldValue::Text(c.id.clone()),
        },
        Field {
            name: "name",
            kind: FieldKind::Text,
            get: |c| FieldValue::Text(c.name.clone()),
        },
        Field {
            name: "closed",
            kind: FieldKind::Bool,
            get: |c| FieldValue::Bool(c.closed),
        },
        Field {
            name: "labels",
            kind: FieldKind::TextList,
            get: |c| FieldValue::TextList(c.labels.clone()),
        },
        Field {
            name: "project",
            kind: FieldKind::Text,
            get: |c| FieldValue::Text(c.project.clone()),
        },
        Field {
            name: "customer",
            kind: FieldKind::Text,
            get: |c| FieldValue::Text(c.customer.clone()),
        },
        Field {
            name: "team",
            kind: FieldKind::Text,
            get: |c| FieldValue::Text(c.team.clone()),
        },
        Field {
            name: "type",
            kind: FieldKind::Text,
            get: |c| FieldValue::Text(c.card_type.clone()),
        },
    ];
}

/// A card label: its display name and color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub color: String,
}

impl TrelloCardEntry {
    /// Builds a card entry, classifying its labels by color.
    ///
    /// Every label name goes to `labels`. A label whose color is listed in
    /// `colors` also sets the matching field; when several labels match the
    /// same field the last one wins.
    pub fn from_labels(
        id: String,
        name: String,
        closed: bool,
        labels: &[Label],
        colors: &LabelColors,
    ) -> Self {
        let mut entry = TrelloCardEntry {
            id,
            name,
            closed,
            ..Default::default()
        };
        for label in labels {
            entry.labels.push(label.name.clone());
            let targets = [
                (&colors.project, &mut entry.project),
                (&colors.customer, &mut entry.customer),
                (&colors.team, &mut entry.team),
                (&colors.card_type, &mut entry.card_type),
            ];
            for (color_list, field) in targets {
                if color_list.contains(&label.color) {
                    field.clone_from(&label.name);
                }
            }
        }
        entry
    }
}

/// Where cards come from.
#[allow(async_fn_in_trait)]
pub trait CardSource {
    /// Every card on the board.
    async fn get_cards(&self) -> Result<Vec<TrelloCardEntry>, ClientError>;
}

/// The Trello board service.
pub struct Trello<S, E = DatabaseConnection> {
    source: S,
    database: Option<E>,
    output_dir: PathBuf,
}

impl<S: CardSource> Trello<S> {
    /// A service that can only write CSV files.
    pub fn new(source: S) -> Self {
        Self {
            source,
            database: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl<S: CardSource, E: SqlExecutor> Trello<S, E> {
    pub fn with_database(source: S, database: E) -> Self {
        Self {
            source,
            database: Some(database),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Writes the board's cards to `trello_entries.csv`.
    pub async fn download_as_csv(&self) -> Result<PathBuf, TrelloError> {
        let cards = self.retrieve().await?;
        Ok(write_records_csv_in(&self.output_dir, &cards, TRELLO_CSV_NAME)?)
    }

    /// Inserts the board's cards into `trello_card`, one transaction per card.
    pub async fn store(&self) -> Result<usize, TrelloError> {
        let cards = self.retrieve().await?;
        let Some(db) = &self.database else {
            return Err(DatabaseError::NoConnection.into());
        };
        let stored = insert_records(db, TRELLO_CARD_TABLE, &cards).await?;
        info!("Stored {stored} cards in {TRELLO_CARD_TABLE}");
        Ok(stored)
    }

    async fn retrieve(&self) -> Result<Vec<TrelloCardEntry>, TrelloError> {
        let cards = self.source.get_cards().await?;
        if cards.is_empty() {
            error!("The Trello board has no cards, skipping");
            return Err(TrelloError::EmptyCards);
        }
        info!("Trello card entries: {}", cards.len());
        Ok(cards)
    }
}
