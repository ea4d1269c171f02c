//! Maps a parameter and a chart kind to a renderer-agnostic [`ChartSpec`].

use crate::aggregate::granularity::Granularity;
use crate::chart::error::ChartError;
use crate::types::parameter::{color_for, display_name};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The charting primitives a renderer is expected to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Scatter,
    Bar,
    Area,
    Box,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Bar,
        ChartKind::Area,
        ChartKind::Box,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
            ChartKind::Bar => "bar",
            ChartKind::Area => "area",
            ChartKind::Box => "box",
        }
    }
}

/// Parses case-insensitively, so widget labels such as `"Line"` work as well as `"line"`.
impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChartError::UnsupportedChartKind(s.to_string()))
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a rendering collaborator needs to draw one parameter, minus the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub parameter: String,
    pub kind: ChartKind,
    /// Named CSS color from the parameter catalog.
    pub color: &'static str,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ChartSpec {
    /// Builds a spec for a known kind. Never fails: unknown parameters get the fallback color
    /// and a title-cased name.
    pub fn new(parameter: &str, kind: ChartKind) -> Self {
        let name = display_name(parameter);
        Self {
            parameter: parameter.to_string(),
            kind,
            color: color_for(parameter),
            title: name.clone(),
            x_title: "Time".to_string(),
            y_title: name,
            unit: None,
        }
    }

    /// Appends the aggregation period to the title, e.g. `Max Temperature (Monthly)`.
    pub fn for_granularity(mut self, granularity: Granularity) -> Self {
        self.title = format!("{} ({})", display_name(&self.parameter), granularity);
        self
    }

    /// Records the unit and shows it on the y axis, e.g. `Rain (mm)`.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        self.y_title = format!("{} ({})", display_name(&self.parameter), unit);
        self.unit = Some(unit);
        self
    }
}

/// Resolves a `(parameter, kind)` pair into a [`ChartSpec`].
///
/// # Errors
///
/// [`ChartError::UnsupportedChartKind`] if `kind` is not one of line, scatter, bar, area, box.
///
/// # Examples
///
/// ```
/// use meteo_pipeline::select_chart;
///
/// let spec = select_chart("temperature_2m_max", "line")?;
/// assert_eq!(spec.color, "crimson");
/// assert_eq!(spec.title, "Max Temperature");
/// assert!(select_chart("temperature_2m_max", "pie").is_err());
/// # Ok::<(), meteo_pipeline::ChartError>(())
/// ```
pub fn select_chart(parameter: &str, kind: &str) -> Result<ChartSpec, ChartError> {
    Ok(ChartSpec::new(parameter, kind.parse()?))
}
