//! The shared parameter catalog: one table holding the display label, chart color,
//! reduction kind and grouping of every Open-Meteo variable the crate knows about.
//!
//! Chart selection, aggregation defaults and the default request lists all read from
//! [`PARAMETERS`], so a parameter only ever has to be described once.

use crate::aggregate::reduction::ReductionKind;
use std::fmt;

/// Color used for any parameter that has no entry (or no color) in the catalog.
pub const FALLBACK_COLOR: &str = "gray";

/// Thematic grouping used to organise parameters in pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterGroup {
    Temperature,
    Precipitation,
    Wind,
    Atmospheric,
    HumidityAndCloud,
    Soil,
    Other,
}

impl ParameterGroup {
    /// All groups in picker order.
    pub const ALL: [ParameterGroup; 7] = [
        ParameterGroup::Temperature,
        ParameterGroup::Precipitation,
        ParameterGroup::Wind,
        ParameterGroup::Atmospheric,
        ParameterGroup::HumidityAndCloud,
        ParameterGroup::Soil,
        ParameterGroup::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ParameterGroup::Temperature => "Temperature",
            ParameterGroup::Precipitation => "Precipitation",
            ParameterGroup::Wind => "Wind",
            ParameterGroup::Atmospheric => "Atmospheric",
            ParameterGroup::HumidityAndCloud => "Humidity & Cloud",
            ParameterGroup::Soil => "Soil Data",
            ParameterGroup::Other => "Other",
        }
    }
}

impl fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static description of a single weather variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInfo {
    /// Open-Meteo variable name, e.g. `temperature_2m_max`.
    pub name: &'static str,
    /// Human readable label. `None` falls back to a title-cased name.
    pub label: Option<&'static str>,
    /// Named CSS color used when charting this parameter.
    pub color: Option<&'static str>,
    /// How values combine when bucketed by a coarser period.
    pub reduction: ReductionKind,
    pub group: ParameterGroup,
}

const fn entry(
    name: &'static str,
    label: Option<&'static str>,
    color: Option<&'static str>,
    reduction: ReductionKind,
    group: ParameterGroup,
) -> ParameterInfo {
    ParameterInfo {
        name,
        label,
        color,
        reduction,
        group,
    }
}

use ParameterGroup::*;
use ReductionKind::{CircularMean, Max, Mean, Sum};

/// Every known parameter. Daily variables first, then hourly ones.
pub const PARAMETERS: &[ParameterInfo] = &[
    // Daily
    entry("temperature_2m_max", Some("Max Temperature"), Some("crimson"), Mean, Temperature),
    entry("temperature_2m_min", Some("Min Temperature"), Some("lightskyblue"), Mean, Temperature),
    entry("rain_sum", Some("Rain"), Some("cornflowerblue"), Sum, Precipitation),
    entry("precipitation_sum", Some("Precipitation"), Some("steelblue"), Sum, Precipitation),
    entry("wind_speed_10m_max", Some("Max Wind Speed"), Some("teal"), Mean, Wind),
    entry("uv_index_max", Some("Max UV Index"), Some("gold"), Mean, Other),
    // Hourly
    entry("temperature_2m", None, Some("orangered"), Mean, Temperature),
    entry("apparent_temperature", None, Some("tomato"), Mean, Temperature),
    entry("dew_point_2m", None, Some("salmon"), Mean, Temperature),
    entry("rain", None, Some("dodgerblue"), Sum, Precipitation),
    entry("precipitation", None, Some("royalblue"), Sum, Precipitation),
    entry("snowfall", None, Some("lightsteelblue"), Sum, Precipitation),
    entry("snow_depth", None, None, Mean, Precipitation),
    entry("wind_speed_10m", None, Some("darkcyan"), Mean, Wind),
    entry("wind_speed_100m", None, Some("cadetblue"), Mean, Wind),
    entry("wind_direction_10m", None, None, CircularMean, Wind),
    entry("wind_direction_100m", None, None, CircularMean, Wind),
    entry("wind_gusts_10m", None, Some("mediumpurple"), Mean, Wind),
    entry("pressure_msl", None, Some("darkorchid"), Mean, Atmospheric),
    entry("surface_pressure", None, Some("mediumorchid"), Mean, Atmospheric),
    entry("vapour_pressure_deficit", None, None, Mean, Atmospheric),
    entry("relative_humidity_2m", None, Some("mediumseagreen"), Mean, HumidityAndCloud),
    entry("cloud_cover", None, Some("dimgray"), Mean, HumidityAndCloud),
    entry("cloud_cover_low", None, None, Mean, HumidityAndCloud),
    entry("cloud_cover_mid", None, None, Mean, HumidityAndCloud),
    entry("cloud_cover_high", None, None, Mean, HumidityAndCloud),
    entry("soil_temperature_0_to_7cm", None, None, Mean, Soil),
    entry("soil_temperature_7_to_28cm", None, None, Mean, Soil),
    entry("soil_temperature_28_to_100cm", None, None, Mean, Soil),
    entry("soil_temperature_100_to_255cm", None, None, Mean, Soil),
    entry("soil_moisture_0_to_7cm", None, None, Mean, Soil),
    entry("soil_moisture_7_to_28cm", None, None, Mean, Soil),
    entry("soil_moisture_28_to_100cm", None, None, Mean, Soil),
    entry("soil_moisture_100_to_255cm", None, None, Mean, Soil),
    entry("weather_code", None, None, Max, Other),
    entry("et0_fao_evapotranspiration", None, None, Sum, Other),
];

/// Variables requested for daily series unless configured otherwise.
pub const DEFAULT_DAILY_PARAMETERS: [&str; 6] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "rain_sum",
    "precipitation_sum",
    "wind_speed_10m_max",
    "uv_index_max",
];

/// Variables requested for hourly series unless configured otherwise.
pub const DEFAULT_HOURLY_PARAMETERS: [&str; 30] = [
    "temperature_2m",
    "wind_speed_100m",
    "relative_humidity_2m",
    "dew_point_2m",
    "apparent_temperature",
    "rain",
    "precipitation",
    "snowfall",
    "snow_depth",
    "soil_temperature_0_to_7cm",
    "soil_temperature_7_to_28cm",
    "soil_temperature_28_to_100cm",
    "soil_temperature_100_to_255cm",
    "soil_moisture_0_to_7cm",
    "soil_moisture_7_to_28cm",
    "soil_moisture_28_to_100cm",
    "soil_moisture_100_to_255cm",
    "weather_code",
    "pressure_msl",
    "surface_pressure",
    "cloud_cover",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "et0_fao_evapotranspiration",
    "vapour_pressure_deficit",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_direction_100m",
    "wind_gusts_10m",
];

/// Looks up a parameter in the catalog by its exact Open-Meteo name.
pub fn lookup(name: &str) -> Option<&'static ParameterInfo> {
    PARAMETERS.iter().find(|info| info.name == name)
}

/// Resolves the chart color for a parameter, falling back to [`FALLBACK_COLOR`].
///
/// ```
/// use meteo_pipeline::parameter::{color_for, FALLBACK_COLOR};
///
/// assert_eq!(color_for("temperature_2m_max"), "crimson");
/// assert_eq!(color_for("not_a_parameter"), FALLBACK_COLOR);
/// ```
pub fn color_for(name: &str) -> &'static str {
    lookup(name)
        .and_then(|info| info.color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Human readable name: the catalog label, or the name with underscores replaced
/// and each word capitalised (`wind_gusts_10m` -> `Wind Gusts 10m`).
pub fn display_name(name: &str) -> String {
    if let Some(label) = lookup(name).and_then(|info| info.label) {
        return label.to_string();
    }
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parameters of `group`, in catalog order, that are present in `available`.
pub fn parameters_in_group<'a>(group: ParameterGroup, available: &[&'a str]) -> Vec<&'a str> {
    PARAMETERS
        .iter()
        .filter(|info| info.group == group)
        .filter_map(|info| available.iter().copied().find(|name| *name == info.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = PARAMETERS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), PARAMETERS.len());
    }

    #[test]
    fn test_default_lists_are_catalogued() {
        for name in DEFAULT_DAILY_PARAMETERS.iter().chain(DEFAULT_HOURLY_PARAMETERS.iter()) {
            assert!(lookup(name).is_some(), "{name} missing from catalog");
        }
    }

    #[test]
    fn test_color_lookup_and_fallback() {
        assert_eq!(color_for("rain_sum"), "cornflowerblue");
        assert_eq!(color_for("relative_humidity_2m"), "mediumseagreen");
        // Catalogued but uncoloured parameters also fall back.
        assert_eq!(color_for("snow_depth"), FALLBACK_COLOR);
        assert_eq!(color_for("unknown_param"), FALLBACK_COLOR);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("temperature_2m_max"), "Max Temperature");
        assert_eq!(display_name("wind_gusts_10m"), "Wind Gusts 10m");
        assert_eq!(display_name("unknown__param"), "Unknown Param");
    }

    #[test]
    fn test_parameters_in_group_keeps_catalog_order() {
        let available = ["precipitation", "temperature_2m", "rain", "cloud_cover"];
        assert_eq!(
            parameters_in_group(ParameterGroup::Precipitation, &available),
            vec!["rain", "precipitation"]
        );
        assert!(parameters_in_group(ParameterGroup::Soil, &available).is_empty());
    }

    #[test]
    fn test_accumulative_parameters_sum() {
        for name in ["rain_sum", "precipitation_sum", "rain", "precipitation", "snowfall"] {
            assert_eq!(lookup(name).map(|p| p.reduction), Some(ReductionKind::Sum));
        }
        assert_eq!(
            lookup("temperature_2m").map(|p| p.reduction),
            Some(ReductionKind::Mean)
        );
    }
}
