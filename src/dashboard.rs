//! Grafana dashboard generation.
//!
//! The dashboard template is a Grafana JSON model whose time range is written
//! as `{{.StartTime}}` and `{{.EndTime}}`. Generation fills both from the
//! configured year and month range and writes the result to the output path.

use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Duration, NaiveDate};
use log::info;

use crate::config::DashboardConfig;
use crate::error_handling::DashboardError;

const START_TIME_PLACEHOLDER: &str = "{{.StartTime}}";
const END_TIME_PLACEHOLDER: &str = "{{.EndTime}}";

/// The time range shown by the dashboard, in Grafana's timestamp form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardTimeRange {
    /// First millisecond of the start month, e.g. `2021-01-01T00:00:00.000Z`.
    pub start_time: String,
    /// Last millisecond of the end month, e.g. `2021-03-31T23:59:59.999Z`.
    pub end_time: String,
}

impl DashboardTimeRange {
    /// Validates the configured parameters and computes the range.
    ///
    /// # Errors
    ///
    /// - `DashboardError::InvalidParameter` naming a missing or malformed value
    /// - `DashboardError::InvalidRange` if the end month precedes the start month
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let year: i32 = parse_parameter(config.year.as_deref(), "year")?;
        let start_month = parse_month(config.start_month.as_deref(), "start_month")?;
        let end_month = parse_month(config.end_month.as_deref(), "end_month")?;
        Self::new(year, start_month, end_month)
    }

    pub fn new(year: i32, start_month: u32, end_month: u32) -> Result<Self, DashboardError> {
        if end_month < start_month {
            return Err(DashboardError::InvalidRange);
        }
        let start = NaiveDate::from_ymd_opt(year, start_month, 1)
            .ok_or(DashboardError::InvalidParameter("start_month"))?;
        let last_day = last_day_of_month(year, end_month)
            .ok_or(DashboardError::InvalidParameter("end_month"))?;

        Ok(Self {
            start_time: format!("{}T00:00:00.000Z", start.format("%Y-%m-%d")),
            end_time: format!("{}T23:59:59.999Z", last_day.format("%Y-%m-%d")),
        })
    }

    /// Fills the time range placeholders of a template.
    pub fn render(&self, template: &str) -> String {
        template
            .replace(START_TIME_PLACEHOLDER, &self.start_time)
            .replace(END_TIME_PLACEHOLDER, &self.end_time)
    }
}

/// Renders the configured template into the configured output file.
pub fn create_dashboard(config: &DashboardConfig) -> Result<PathBuf, DashboardError> {
    let range = DashboardTimeRange::from_config(config)?;
    let template = fs::read_to_string(&config.template)?;
    fs::write(&config.output, range.render(&template))?;
    info!(
        "Dashboard for {} to {} written to {}",
        range.start_time,
        range.end_time,
        config.output.display()
    );
    Ok(config.output.clone())
}

fn parse_parameter<T: std::str::FromStr>(
    raw: Option<&str>,
    name: &'static str,
) -> Result<T, DashboardError> {
    raw.and_then(|value| value.trim().parse().ok())
        .ok_or(DashboardError::InvalidParameter(name))
}

fn parse_month(raw: Option<&str>, name: &'static str) -> Result<u32, DashboardError> {
    let month: u32 = parse_parameter(raw, name)?;
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(DashboardError::InvalidParameter(name))
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(chrono::Months::new(1))?;
    let last = next - Duration::days(1);
    debug_assert_eq!(last.month(), month);
    Some(last)
}
