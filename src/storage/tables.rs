//! Known tables and SQL identifier checks.
//!
//! Table and column names are spliced into statement text, so the CLI only
//! accepts the tables this crate creates and plain column identifiers.

use clap::ValueEnum;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::{TOGGL_TIME_TABLE, TRELLO_CARD_TABLE};

/// A table created by [`init_database`](crate::storage::init_database).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter, EnumString, ValueEnum)]
pub enum KnownTable {
    #[strum(serialize = "toggl_time")]
    #[value(name = "toggl_time")]
    TogglTime,
    #[strum(serialize = "trello_card")]
    #[value(name = "trello_card")]
    TrelloCard,
}

impl KnownTable {
    pub fn name(&self) -> &'static str {
        match self {
            KnownTable::TogglTime => TOGGL_TIME_TABLE,
            KnownTable::TrelloCard => TRELLO_CARD_TABLE,
        }
    }
}

/// Whether `name` is a plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses one column name. Used as a clap value parser.
pub fn parse_column(raw: &str) -> Result<String, String> {
    if is_identifier(raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("{raw:?} is not a valid column name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_known_table_names() {
        let names: Vec<&str> = KnownTable::iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["toggl_time", "trello_card"]);
        assert_eq!(KnownTable::TrelloCard.to_string(), "trello_card");
        assert_eq!("toggl_time".parse::<KnownTable>().unwrap(), KnownTable::TogglTime);
        assert!("users".parse::<KnownTable>().is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("trello_card_id"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("id; DROP TABLE toggl_time"));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("trello_card_id").unwrap(), "trello_card_id");
        assert!(parse_column("name)").is_err());
    }
}
