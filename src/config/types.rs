//! Configuration types.
//!
//! Each settings group is a `clap` argument group whose options can also be
//! set through the environment variable named in its `env` attribute. The
//! structs are plain data, so library callers can build them directly.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::constants::{
    DASHBOARD_OUTPUT_PATH, DASHBOARD_TEMPLATE_PATH, DEFAULT_DATABASE_PORT,
    DEFAULT_MAX_IDLE_CONNECTIONS, DEFAULT_MAX_LIFETIME_MINUTES, DEFAULT_MAX_OPEN_CONNECTIONS,
    TOGGL_API_URL, TRELLO_API_URL,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: One JSON object per line for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Database connection settings.
///
/// `url` wins when set; a `sqlite:` URL selects SQLite. Otherwise a
/// PostgreSQL connection is built from the individual fields.
#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Database URL (postgres://... or sqlite:...), overrides the fields below
    #[arg(long = "database-url", env = "DATABASE_URL", hide_env_values = true)]
    pub url: Option<String>,

    #[arg(long = "database-host", env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long = "database-port", env = "DATABASE_PORT", default_value_t = DEFAULT_DATABASE_PORT)]
    pub port: u16,

    #[arg(long = "database-name", env = "DATABASE_NAME", default_value = "toggl_trello_kpi")]
    pub name: String,

    #[arg(long = "database-username", env = "DATABASE_USERNAME", default_value = "postgres")]
    pub username: String,

    #[arg(
        long = "database-password",
        env = "DATABASE_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Maximum number of pooled connections
    #[arg(
        long = "database-max-open-connections",
        env = "DATABASE_MAX_OPEN_CONNECTIONS",
        default_value_t = DEFAULT_MAX_OPEN_CONNECTIONS
    )]
    pub max_open_connections: u32,

    /// Connections kept open while idle
    #[arg(
        long = "database-max-idle-connections",
        env = "DATABASE_MAX_IDLE_CONNECTIONS",
        default_value_t = DEFAULT_MAX_IDLE_CONNECTIONS
    )]
    pub max_idle_connections: u32,

    /// Maximum lifetime of a pooled connection, in minutes
    #[arg(
        long = "database-max-lifetime-in-minutes",
        env = "DATABASE_MAX_LIFETIME_IN_MINUTES",
        default_value_t = DEFAULT_MAX_LIFETIME_MINUTES
    )]
    pub max_lifetime_minutes: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: DEFAULT_DATABASE_PORT,
            name: "toggl_trello_kpi".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
            max_open_connections: DEFAULT_MAX_OPEN_CONNECTIONS,
            max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS,
            max_lifetime_minutes: DEFAULT_MAX_LIFETIME_MINUTES,
        }
    }
}

/// Toggl API settings.
#[derive(Clone, Debug, Args)]
pub struct TogglConfig {
    #[arg(id = "toggl_api_token", long = "toggl-api-token", env = "TOGGL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(id = "toggl_api_url", long = "toggl-api-url", env = "TOGGL_API_URL", default_value = TOGGL_API_URL)]
    pub api_url: String,
}

impl Default for TogglConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            api_url: TOGGL_API_URL.to_string(),
        }
    }
}

/// Trello API settings and the label colors that classify cards.
#[derive(Clone, Debug, Args)]
pub struct TrelloConfig {
    #[arg(long = "trello-app-key", env = "TRELLO_APP_KEY", hide_env_values = true)]
    pub app_key: Option<String>,

    #[arg(id = "trello_api_token", long = "trello-api-token", env = "TRELLO_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(long = "trello-board-id", env = "TRELLO_BOARD_ID")]
    pub board_id: Option<String>,

    #[arg(id = "trello_api_url", long = "trello-api-url", env = "TRELLO_API_URL", default_value = TRELLO_API_URL)]
    pub api_url: String,

    #[command(flatten)]
    pub label_colors: LabelColors,
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            app_key: None,
            api_token: None,
            board_id: None,
            api_url: TRELLO_API_URL.to_string(),
            label_colors: LabelColors::default(),
        }
    }
}

/// Label colors that mark a card's project, customer, team and type.
///
/// A card label whose color is in one of these lists sets the matching
/// card field to the label's name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Args)]
pub struct LabelColors {
    #[arg(long = "trello-label-project-color", env = "TRELLO_LABEL_PROJECT_COLOR", value_delimiter = ',')]
    pub project: Vec<String>,

    #[arg(long = "trello-label-customer-color", env = "TRELLO_LABEL_CUSTOMER_COLOR", value_delimiter = ',')]
    pub customer: Vec<String>,

    #[arg(long = "trello-label-team-color", env = "TRELLO_LABEL_TEAM_COLOR", value_delimiter = ',')]
    pub team: Vec<String>,

    #[arg(long = "trello-label-card-type-color", env = "TRELLO_LABEL_CARD_TYPE_COLOR", value_delimiter = ',')]
    pub card_type: Vec<String>,
}

/// Grafana dashboard settings.
///
/// The year and months are kept as text and validated when the dashboard is
/// generated, so a bad value names the offending parameter.
#[derive(Clone, Debug, Args)]
pub struct DashboardConfig {
    #[arg(long = "grafana-year", env = "GRAFANA_YEAR")]
    pub year: Option<String>,

    #[arg(long = "grafana-start-month", env = "GRAFANA_START_MONTH")]
    pub start_month: Option<String>,

    #[arg(long = "grafana-end-month", env = "GRAFANA_END_MONTH")]
    pub end_month: Option<String>,

    #[arg(long = "grafana-template", env = "GRAFANA_TEMPLATE", default_value = DASHBOARD_TEMPLATE_PATH)]
    pub template: PathBuf,

    #[arg(long = "grafana-output", env = "GRAFANA_OUTPUT", default_value = DASHBOARD_OUTPUT_PATH)]
    pub output: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            year: None,
            start_month: None,
            end_month: None,
            template: PathBuf::from(DASHBOARD_TEMPLATE_PATH),
            output: PathBuf::from(DASHBOARD_OUTPUT_PATH),
        }
    }
}
