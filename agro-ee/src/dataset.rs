use serde::{Deserialize, Serialize};
use std::fmt;

/// Palette for precipitation maps (dry white to wet blue).
pub const PRECIPITATION_PALETTE: [&str; 6] = [
    "#ffffff", "#ff3333", "#fff581", "#33ecff", "#6f5eff", "#171cb1",
];

/// Diverging cold-to-hot palette for land-surface temperature maps.
pub const TEMPERATURE_PALETTE: [&str; 11] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];

/// Sequential green palette for evapotranspiration maps.
pub const EVAPOTRANSPIRATION_PALETTE: [&str; 5] =
    ["#ffffcc", "#c2e699", "#78c679", "#31a354", "#006837"];

/// Resolution used for the min/max scan behind map color ramps, in meters.
pub const MAP_STATS_SCALE: f64 = 1000.0;

/// Pixel budget passed to every region reduction.
pub const MAX_PIXELS: f64 = 1e9;

/// The agrometeorological quantities the dashboard knows how to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Precipitation,
    Temperature,
    Evapotranspiration,
    WaterBalance,
}

impl Variable {
    /// Stable key used for table rows and CSV columns.
    pub fn key(&self) -> &'static str {
        match self {
            Variable::Precipitation => "precipitation",
            Variable::Temperature => "temperature",
            Variable::Evapotranspiration => "evapotranspiration",
            Variable::WaterBalance => "water_balance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Variable::Precipitation => "Precipitação",
            Variable::Temperature => "Temperatura Média",
            Variable::Evapotranspiration => "Evapotranspiração",
            Variable::WaterBalance => "Balanço Hídrico",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Variable::Temperature => "°C",
            _ => "mm",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How the images inside one period are combined before the spatial mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalReducer {
    /// Flux-like quantities accumulate over the period.
    Sum,
    /// State quantities are averaged over the period.
    Mean,
}

impl TemporalReducer {
    /// Earth Engine algorithm name for the collection reduction.
    pub fn function_name(&self) -> &'static str {
        match self {
            TemporalReducer::Sum => "reduce.sum",
            TemporalReducer::Mean => "reduce.mean",
        }
    }
}

/// Linear conversion from stored digital numbers to physical units:
/// `physical = raw * multiply + add`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub multiply: f64,
    pub add: f64,
}

impl Scaling {
    pub const IDENTITY: Scaling = Scaling {
        multiply: 1.0,
        add: 0.0,
    };
}

/// A remote image sequence plus everything needed to reduce it to one
/// number per period over a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub variable: Variable,
    /// Earth Engine image collection id.
    pub collection: String,
    pub band: String,
    pub scaling: Scaling,
    pub temporal_reducer: TemporalReducer,
    /// Nominal resolution of the region mean, in meters.
    pub scale: f64,
    pub palette: Vec<String>,
}

impl Dataset {
    /// CHIRPS daily rainfall, summed per period.
    pub fn chirps_daily() -> Self {
        Self {
            variable: Variable::Precipitation,
            collection: "UCSB-CHG/CHIRPS/DAILY".to_string(),
            band: "precipitation".to_string(),
            scaling: Scaling::IDENTITY,
            temporal_reducer: TemporalReducer::Sum,
            scale: 10_000.0,
            palette: to_palette(&PRECIPITATION_PALETTE),
        }
    }

    /// CHIRPS pentads, the precipitation side of the water balance.
    pub fn chirps_pentad() -> Self {
        Self {
            collection: "UCSB-CHG/CHIRPS/PENTAD".to_string(),
            scale: 5_000.0,
            ..Self::chirps_daily()
        }
    }

    /// MODIS MOD11A2 daytime land-surface temperature in °C.
    pub fn mod11a2_temperature() -> Self {
        Self {
            variable: Variable::Temperature,
            collection: "MODIS/006/MOD11A2".to_string(),
            band: "LST_Day_1km".to_string(),
            scaling: Scaling {
                multiply: 0.02,
                add: -273.15,
            },
            temporal_reducer: TemporalReducer::Mean,
            scale: 1_000.0,
            palette: to_palette(&TEMPERATURE_PALETTE),
        }
    }

    /// MODIS MOD16A2GF gap-filled evapotranspiration in mm.
    pub fn mod16a2_evapotranspiration() -> Self {
        Self {
            variable: Variable::Evapotranspiration,
            collection: "MODIS/061/MOD16A2GF".to_string(),
            band: "ET".to_string(),
            scaling: Scaling {
                multiply: 0.1,
                add: 0.0,
            },
            temporal_reducer: TemporalReducer::Mean,
            scale: 5_000.0,
            palette: to_palette(&EVAPOTRANSPIRATION_PALETTE),
        }
    }

    /// Default dataset behind a variable's page.
    pub fn for_variable(variable: Variable) -> Option<Self> {
        match variable {
            Variable::Precipitation => Some(Self::chirps_daily()),
            Variable::Temperature => Some(Self::mod11a2_temperature()),
            Variable::Evapotranspiration => Some(Self::mod16a2_evapotranspiration()),
            Variable::WaterBalance => None,
        }
    }
}

fn to_palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precipitation_is_summed_and_temperature_averaged() {
        assert_eq!(Dataset::chirps_daily().temporal_reducer, TemporalReducer::Sum);
        assert_eq!(
            Dataset::mod11a2_temperature().temporal_reducer,
            TemporalReducer::Mean
        );
        assert_eq!(
            Dataset::mod16a2_evapotranspiration().temporal_reducer,
            TemporalReducer::Mean
        );
    }

    #[test]
    fn temperature_scaling_converts_kelvin_digital_numbers() {
        let scaling = Dataset::mod11a2_temperature().scaling;
        // 15000 * 0.02 = 300 K
        assert!((15000.0 * scaling.multiply + scaling.add - 26.85).abs() < 1e-9);
        assert_eq!(Dataset::chirps_daily().scaling, Scaling::IDENTITY);
    }

    #[test]
    fn pentad_shares_precipitation_band() {
        let pentad = Dataset::chirps_pentad();
        assert_eq!(pentad.band, "precipitation");
        assert_eq!(pentad.variable, Variable::Precipitation);
        assert_eq!(pentad.scale, 5_000.0);
    }

    #[test]
    fn water_balance_has_no_single_source() {
        assert!(Dataset::for_variable(Variable::WaterBalance).is_none());
        assert_eq!(
            Dataset::for_variable(Variable::Temperature).unwrap().band,
            "LST_Day_1km"
        );
    }
}
