//! Query result structs.
//!
//! All structs derive `Serialize` so they can be handed to D3.js as JSON.
//! Absent values serialize as `null`.

use serde::Serialize;

/// One year of a series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnnualValue {
    pub year: i32,
    pub value: Option<f64>,
}

/// One month of a series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyValue {
    pub year: i32,
    pub month: u32,
    /// First day of the month, `YYYY-MM-DD`.
    pub date: String,
    pub value: Option<f64>,
}

/// A month with its centered 3-month moving average.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RollingValue {
    pub year: i32,
    pub month: u32,
    pub date: String,
    pub value: Option<f64>,
    /// Absent for the first and last month and whenever a neighbor is absent.
    pub moving_average: Option<f64>,
}

/// Mean of one calendar month across all years.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeasonalMean {
    pub month: u32,
    pub value: Option<f64>,
}

/// A row of the composite page's raw table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaterBalanceRow {
    pub year: i32,
    pub month: u32,
    pub date: String,
    pub precipitation: Option<f64>,
    pub evapotranspiration: Option<f64>,
    pub water_balance: Option<f64>,
}

/// The year holding a series' highest or lowest present value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Extremes {
    pub highest: YearValue,
    pub lowest: YearValue,
}
