//! Reports assembled from the series of one analysis run.

use crate::stats::DescriptiveStats;
use agro_db::models::{AnnualValue, Extremes, RollingValue, SeasonalMean, WaterBalanceRow};
use agro_db::Database;
use agro_ee::aggregation::{AnalysisRequest, VariableSeries, WaterBalanceInputs};
use agro_ee::dataset::Variable;
use agro_utils::dates::{format_date, month_abbreviation};
use serde::Serialize;

/// A seasonal mean with its month label, ready for the category axis.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeasonalPoint {
    pub month: u32,
    pub label: String,
    pub value: Option<f64>,
}

fn label_seasonal(rows: Vec<SeasonalMean>) -> anyhow::Result<Vec<SeasonalPoint>> {
    rows.into_iter()
        .map(|row| {
            Ok(SeasonalPoint {
                month: row.month,
                label: month_abbreviation(row.month)?.to_string(),
                value: row.value,
            })
        })
        .collect()
}

/// What the run was about, repeated in titles and exports.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportHeader {
    pub region: String,
    pub start: String,
    pub end: String,
}

impl ReportHeader {
    fn new(request: &AnalysisRequest) -> Self {
        Self {
            region: request.region.label(),
            start: format_date(&request.window.start()),
            end: format_date(&request.window.end()),
        }
    }
}

/// Everything a single-variable page shows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VariableReport {
    pub header: ReportHeader,
    pub variable: Variable,
    pub label: String,
    pub unit: String,
    pub annual: Vec<AnnualValue>,
    pub monthly: Vec<RollingValue>,
    pub seasonal: Vec<SeasonalPoint>,
    /// Statistics of the annual values.
    pub annual_stats: DescriptiveStats,
    pub extremes: Option<Extremes>,
}

impl VariableReport {
    /// Tabulate a variable's series in a fresh local table.
    pub fn from_series(
        series: &VariableSeries,
        request: &AnalysisRequest,
    ) -> anyhow::Result<Self> {
        let db = Database::new()?;
        db.load_series(&series.annual)?;
        db.load_series(&series.monthly)?;
        Self::from_db(&db, series.annual.variable, request)
    }

    pub fn from_db(
        db: &Database,
        variable: Variable,
        request: &AnalysisRequest,
    ) -> anyhow::Result<Self> {
        let key = variable.key();
        let annual = db.query_annual(key)?;
        let annual_stats = DescriptiveStats::from_values(annual.iter().map(|r| r.value));
        log::info!(
            "report: {} for {}: {} years, {} present",
            key,
            request.region.label(),
            annual.len(),
            annual_stats.count
        );
        Ok(Self {
            header: ReportHeader::new(request),
            variable,
            label: variable.label().to_string(),
            unit: variable.unit().to_string(),
            monthly: db.query_monthly_rolling(key)?,
            seasonal: label_seasonal(db.query_seasonal_means(key)?)?,
            extremes: db.query_extremes(key)?,
            annual,
            annual_stats,
        })
    }
}

/// Everything the composite evapotranspiration/water-balance page shows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaterBalanceReport {
    pub header: ReportHeader,
    /// Raw monthly table of the joined months.
    pub rows: Vec<WaterBalanceRow>,
    pub evapotranspiration_monthly: Vec<RollingValue>,
    pub balance_monthly: Vec<RollingValue>,
    pub evapotranspiration_annual: Vec<AnnualValue>,
    pub balance_annual: Vec<AnnualValue>,
    pub evapotranspiration_seasonal: Vec<SeasonalPoint>,
    pub balance_seasonal: Vec<SeasonalPoint>,
    pub evapotranspiration_stats: DescriptiveStats,
    pub balance_stats: DescriptiveStats,
}

impl WaterBalanceReport {
    pub fn from_inputs(
        inputs: &WaterBalanceInputs,
        request: &AnalysisRequest,
    ) -> anyhow::Result<Self> {
        let db = Database::new()?;
        let precipitation = Variable::Precipitation.key();
        let et = Variable::Evapotranspiration.key();
        let balance = Variable::WaterBalance.key();
        db.load_series_as(precipitation, &inputs.precipitation)?;
        db.load_series_as(et, &inputs.evapotranspiration)?;
        let joined = db.materialize_water_balance(precipitation, et, balance)?;
        log::info!(
            "report: water balance for {}: {} joined months",
            request.region.label(),
            joined
        );

        let rows = db.query_water_balance(precipitation, et, balance)?;
        Ok(Self {
            header: ReportHeader::new(request),
            evapotranspiration_stats: DescriptiveStats::from_values(
                rows.iter().map(|r| r.evapotranspiration),
            ),
            balance_stats: DescriptiveStats::from_values(rows.iter().map(|r| r.water_balance)),
            evapotranspiration_monthly: db.query_monthly_rolling(et)?,
            balance_monthly: db.query_monthly_rolling(balance)?,
            evapotranspiration_annual: db.query_annual_means(et)?,
            balance_annual: db.query_annual_means(balance)?,
            evapotranspiration_seasonal: label_seasonal(db.query_seasonal_means(et)?)?,
            balance_seasonal: label_seasonal(db.query_seasonal_means(balance)?)?,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_ee::period::Period;
    use agro_ee::series::AggregateSeries;
    use chrono::NaiveDate;

    fn request() -> AnalysisRequest {
        AnalysisRequest::new(
            "Minas Gerais",
            "Uberlândia",
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2017, 12, 31).unwrap(),
        )
        .unwrap()
    }

    fn monthly(variable: Variable, value: impl Fn(i32, u32) -> Option<f64>) -> AggregateSeries {
        let mut series = AggregateSeries::new(variable);
        for year in 2015..=2017 {
            for month in 1..=12 {
                series.push(Period::month(year, month).unwrap(), value(year, month));
            }
        }
        series
    }

    #[test]
    fn variable_report_from_series() {
        let mut annual = AggregateSeries::new(Variable::Precipitation);
        annual.push(Period::Year(2015), Some(1200.0));
        annual.push(Period::Year(2016), Some(1650.0));
        annual.push(Period::Year(2017), Some(1410.0));
        let monthly = monthly(Variable::Precipitation, |year, month| {
            if year == 2016 && month == 6 {
                None
            } else {
                Some(month as f64 * 10.0)
            }
        });
        let series = VariableSeries { annual, monthly };

        let report = VariableReport::from_series(&series, &request()).unwrap();
        assert_eq!(report.header.region, "Uberlândia - Minas Gerais");
        assert_eq!(report.header.start, "2015-01-01");
        assert_eq!(report.annual.len(), 3);
        assert_eq!(report.monthly.len(), 36);
        assert_eq!(report.seasonal.len(), 12);
        assert_eq!(report.seasonal[5].label, "Jun");
        // June only has 2015 and 2017
        assert_eq!(report.seasonal[5].value, Some(60.0));
        assert_eq!(report.annual_stats.count, 3);
        let extremes = report.extremes.unwrap();
        assert_eq!(extremes.highest.year, 2016);
        assert_eq!(extremes.lowest.year, 2015);
        assert_eq!(report.unit, "mm");
    }

    #[test]
    fn water_balance_report_joins_on_period() {
        let precipitation = monthly(Variable::Precipitation, |_, month| Some(month as f64 * 20.0));
        let mut et = monthly(Variable::Evapotranspiration, |_, _| Some(50.0));
        // drop the last month from ET so the join has 35 rows
        let mut trimmed = AggregateSeries::new(Variable::Evapotranspiration);
        for entry in et.entries().iter().take(35) {
            trimmed.push(entry.period, entry.value);
        }
        et = trimmed;
        let inputs = WaterBalanceInputs {
            precipitation,
            evapotranspiration: et,
        };

        let report = WaterBalanceReport::from_inputs(&inputs, &request()).unwrap();
        assert_eq!(report.rows.len(), 35);
        assert_eq!(report.rows[0].water_balance, Some(-30.0));
        assert_eq!(report.balance_monthly.len(), 35);
        assert_eq!(report.evapotranspiration_annual.len(), 3);
        assert_eq!(report.evapotranspiration_stats.mean, Some(50.0));
        assert_eq!(report.balance_seasonal[11].label, "Dez");
    }
}
