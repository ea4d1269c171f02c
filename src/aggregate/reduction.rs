//! Table-driven choice of how a parameter's values combine inside a bucket.

use crate::types::parameter::PARAMETERS;
use ordered_float::OrderedFloat;
use std::collections::HashMap;

/// Below this resultant length, directions cancel out and have no mean.
const MIN_RESULTANT: f64 = 1e-9;

/// How a parameter's values combine inside one aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReductionKind {
    /// Instantaneous quantities: temperature, wind speed, pressure.
    Mean,
    /// Accumulative quantities: rainfall, snowfall, evapotranspiration.
    Sum,
    /// Largest value. WMO weather codes grow with severity, so this keeps the worst weather.
    Max,
    /// Mean of compass directions in degrees, so 350° and 10° average to 0°.
    CircularMean,
}

impl ReductionKind {
    /// Reduces the present values. Returns `None` if every value is missing, and for
    /// [`ReductionKind::CircularMean`] also when the directions cancel out.
    pub fn reduce<'a>(&self, values: impl IntoIterator<Item = &'a Option<f64>>) -> Option<f64> {
        let present: Vec<f64> = values.into_iter().flatten().copied().collect();
        if present.is_empty() {
            return None;
        }
        match self {
            ReductionKind::Sum => Some(present.iter().sum()),
            ReductionKind::Mean => Some(present.iter().sum::<f64>() / present.len() as f64),
            ReductionKind::Max => present.into_iter().map(OrderedFloat).max().map(|v| v.0),
            ReductionKind::CircularMean => circular_mean_degrees(&present),
        }
    }
}

fn circular_mean_degrees(degrees: &[f64]) -> Option<f64> {
    let (sin, cos) = degrees.iter().fold((0.0_f64, 0.0_f64), |(sin, cos), d| {
        let radians = d.to_radians();
        (sin + radians.sin(), cos + radians.cos())
    });
    if sin.hypot(cos) / (degrees.len() as f64) < MIN_RESULTANT {
        return None;
    }
    let mean = sin.atan2(cos).to_degrees().rem_euclid(360.0);
    // rem_euclid can round a tiny negative angle up to 360.
    Some(if mean >= 360.0 { 0.0 } else { mean })
}

/// Explicit mapping from parameter name to [`ReductionKind`].
///
/// Parameters without an entry use `default_kind`, which is part of the table
/// rather than inferred from the name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionTable {
    kinds: HashMap<String, ReductionKind>,
    default_kind: ReductionKind,
}

impl ReductionTable {
    /// An empty table where every parameter reduces with `default_kind`.
    pub fn new(default_kind: ReductionKind) -> Self {
        Self {
            kinds: HashMap::new(),
            default_kind,
        }
    }

    /// Adds or replaces the kind for one parameter.
    pub fn with(mut self, parameter: impl Into<String>, kind: ReductionKind) -> Self {
        self.kinds.insert(parameter.into(), kind);
        self
    }

    pub fn kind_for(&self, parameter: &str) -> ReductionKind {
        self.kinds
            .get(parameter)
            .copied()
            .unwrap_or(self.default_kind)
    }

    pub fn default_kind(&self) -> ReductionKind {
        self.default_kind
    }
}

/// The table built from the shared parameter catalog, defaulting to [`ReductionKind::Mean`].
impl Default for ReductionTable {
    fn default() -> Self {
        PARAMETERS
            .iter()
            .fold(ReductionTable::new(ReductionKind::Mean), |table, info| {
                table.with(info.name, info.reduction)
            })
    }
}
