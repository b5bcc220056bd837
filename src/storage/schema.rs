//! Table definitions for the synchronized Toggl and Trello data.

use log::info;

use crate::config::{TOGGL_TIME_TABLE, TRELLO_CARD_TABLE};
use crate::error_handling::DatabaseError;
use crate::storage::executor::{Dialect, SqlExecutor};

const POSTGRES_TOGGL_TIME: &str = "CREATE TABLE IF NOT EXISTS toggl_time
(
    id              varchar(255) NOT NULL,
    description     text NOT NULL,
    start           timestamptz NOT NULL,
    stop            timestamptz NOT NULL,
    duration        bigint NOT NULL,
    billable        boolean NOT NULL,
    workspace_id    bigint NOT NULL,
    project_id      bigint NOT NULL,
    project_name    varchar(255) NOT NULL DEFAULT '',
    tags            varchar(255)[] NOT NULL DEFAULT array[]::varchar(255)[],
    trello_card_id  varchar(255) NOT NULL DEFAULT '',
    PRIMARY KEY(id)
)";

const POSTGRES_TRELLO_CARD: &str = "CREATE TABLE IF NOT EXISTS trello_card
(
    id              varchar(255) NOT NULL,
    name            varchar(255) NOT NULL,
    closed          boolean NOT NULL,
    labels          varchar(255)[] NOT NULL DEFAULT array[]::varchar(255)[],
    project         varchar(255) NOT NULL DEFAULT '',
    customer        varchar(255) NOT NULL DEFAULT '',
    team            varchar(255) NOT NULL DEFAULT '',
    type            varchar(255) NOT NULL DEFAULT '',
    PRIMARY KEY(id)
)";

// SQLite stores the tag and label sequences comma-joined.
const SQLITE_TOGGL_TIME: &str = "CREATE TABLE IF NOT EXISTS toggl_time
(
    id              TEXT NOT NULL PRIMARY KEY,
    description     TEXT NOT NULL,
    start           TEXT NOT NULL,
    stop            TEXT NOT NULL,
    duration        INTEGER NOT NULL,
    billable        BOOLEAN NOT NULL,
    workspace_id    INTEGER NOT NULL,
    project_id      INTEGER NOT NULL,
    project_name    TEXT NOT NULL DEFAULT '',
    tags            TEXT NOT NULL DEFAULT '',
    trello_card_id  TEXT NOT NULL DEFAULT ''
)";

const SQLITE_TRELLO_CARD: &str = "CREATE TABLE IF NOT EXISTS trello_card
(
    id              TEXT NOT NULL PRIMARY KEY,
    name            TEXT NOT NULL,
    closed          BOOLEAN NOT NULL,
    labels          TEXT NOT NULL DEFAULT '',
    project         TEXT NOT NULL DEFAULT '',
    customer        TEXT NOT NULL DEFAULT '',
    team            TEXT NOT NULL DEFAULT '',
    type            TEXT NOT NULL DEFAULT ''
)";

/// Creates the `toggl_time` and `trello_card` tables if they don't exist.
///
/// Each table is created in its own transaction.
pub async fn init_database<E: SqlExecutor>(db: &E) -> Result<(), DatabaseError> {
    let (toggl_time, trello_card) = match db.dialect() {
        Dialect::Postgres => (POSTGRES_TOGGL_TIME, POSTGRES_TRELLO_CARD),
        Dialect::Sqlite => (SQLITE_TOGGL_TIME, SQLITE_TRELLO_CARD),
    };
    db.execute_in_transaction(toggl_time, &[]).await?;
    info!("Table {TOGGL_TIME_TABLE} is ready.");
    db.execute_in_transaction(trello_card, &[]).await?;
    info!("Table {TRELLO_CARD_TABLE} is ready.");
    Ok(())
}
