//! Packages a [`ChartSpec`] and its backing data for an external renderer, as JSON or as a
//! standalone HTML snapshot that embeds that JSON.

use crate::chart::chart_spec::ChartSpec;
use crate::export::error::ExportError;
use crate::series::error::SeriesError;
use crate::series::observation_series::ObservationSeries;
use crate::series::stats::linear_trend;
use serde::Serialize;

/// A chart description plus the data it plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDocument {
    pub spec: ChartSpec,
    /// Formatted timestamps (`YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`).
    pub x: Vec<String>,
    /// Values aligned with `x`; missing values serialize as `null`.
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<f64>>,
}

impl ChartDocument {
    /// Pulls the spec's parameter out of `series`. The series unit, if any, is copied
    /// onto the spec.
    ///
    /// # Errors
    ///
    /// [`SeriesError::UnknownParameter`] (wrapped) if the series lacks the parameter.
    pub fn package(spec: ChartSpec, series: &ObservationSeries) -> Result<Self, ExportError> {
        let y = series
            .parameter(&spec.parameter)
            .ok_or_else(|| SeriesError::UnknownParameter(spec.parameter.clone()))?
            .to_vec();
        let format = series.resolution().timestamp_format();
        let x = series
            .timestamps()
            .iter()
            .map(|t| t.format(format).to_string())
            .collect();
        let inherited_unit = match spec.unit {
            Some(_) => None,
            None => series.unit(&spec.parameter).map(str::to_string),
        };
        let spec = match inherited_unit {
            Some(unit) => spec.with_unit(unit),
            None => spec,
        };
        Ok(Self {
            spec,
            x,
            y,
            trend: None,
        })
    }

    /// Adds a least-squares trend line computed from `series`. Leaves the document
    /// unchanged when fewer than two points are present.
    pub fn with_trend(mut self, series: &ObservationSeries) -> Result<Self, ExportError> {
        self.trend = linear_trend(series, &self.spec.parameter)?;
        Ok(self)
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }

    /// A self-contained HTML page carrying the chart JSON in a
    /// `<script type="application/json" id="chart-data">` element.
    pub fn to_html(&self) -> Result<String, ExportError> {
        // `</` inside the JSON would otherwise close the script element early.
        let json = self.to_json()?.replace("</", "<\\/");
        let title = escape_html(&self.spec.title);
        Ok(format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{title}</title>\n\
             </head>\n\
             <body>\n\
             <h1>{title}</h1>\n\
             <div id=\"chart\" data-kind=\"{kind}\" data-color=\"{color}\"></div>\n\
             <script type=\"application/json\" id=\"chart-data\">{json}</script>\n\
             </body>\n\
             </html>\n",
            kind = self.spec.kind,
            color = self.spec.color,
        ))
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
