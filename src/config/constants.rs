//! Configuration constants.
//!
//! Table names, output file names, API endpoints and the defaults used by the
//! CLI options.

/// Table holding the Toggl time entries.
pub const TOGGL_TIME_TABLE: &str = "toggl_time";
/// Table holding the Trello cards.
pub const TRELLO_CARD_TABLE: &str = "trello_card";

/// Base name of the CSV file the Toggl download writes.
pub const TOGGL_CSV_NAME: &str = "toggl_time_entries";
/// Base name of the CSV file the Trello download writes.
pub const TRELLO_CSV_NAME: &str = "trello_entries";

pub const TOGGL_API_URL: &str = "https://api.track.toggl.com/api/v9";
pub const TRELLO_API_URL: &str = "https://api.trello.com/1";

/// Per-request timeout for the remote APIs, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Database pool defaults
pub const DEFAULT_DATABASE_PORT: u16 = 5432;
pub const DEFAULT_MAX_OPEN_CONNECTIONS: u32 = 10;
pub const DEFAULT_MAX_IDLE_CONNECTIONS: u32 = 2;
pub const DEFAULT_MAX_LIFETIME_MINUTES: u64 = 30;

// Dashboard files
pub const DASHBOARD_TEMPLATE_PATH: &str = "./grafana/dashboard_template.json";
pub const DASHBOARD_OUTPUT_PATH: &str = "./grafana/dashboard.json";
