//! Chart payloads: the `(data_json, config_json)` pairs handed to the D3
//! scripts through `js_bridge`.

use agro_data::report::{SeasonalPoint, VariableReport, WaterBalanceReport};
use agro_db::models::{AnnualValue, RollingValue};
use agro_ee::dataset::Variable;
use serde_json::{json, Value};

pub const PRECIPITATION_COLOR: &str = "#0077b6";
pub const TEMPERATURE_COLOR: &str = "#ff8800";
pub const EVAPOTRANSPIRATION_COLOR: &str = "#ff8800";
pub const BALANCE_COLOR: &str = "#00bfff";

/// Line/bar color and dashed moving-average color of a variable.
pub fn variable_colors(variable: Variable) -> (&'static str, &'static str) {
    match variable {
        Variable::Precipitation => (PRECIPITATION_COLOR, "#03045e"),
        Variable::Temperature => ("#ffbb33", TEMPERATURE_COLOR),
        Variable::Evapotranspiration => (EVAPOTRANSPIRATION_COLOR, "#ffbb33"),
        Variable::WaterBalance => (BALANCE_COLOR, "#005577"),
    }
}

/// JSON payload pair for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    pub data: String,
    pub config: String,
}

impl ChartPayload {
    fn new(data: Value, config: Value) -> Self {
        Self {
            data: data.to_string(),
            config: config.to_string(),
        }
    }
}

fn annual_points(annual: &[AnnualValue]) -> Value {
    Value::Array(
        annual
            .iter()
            .map(|a| json!({ "label": a.year.to_string(), "value": a.value }))
            .collect(),
    )
}

fn seasonal_points(seasonal: &[SeasonalPoint]) -> Value {
    Value::Array(
        seasonal
            .iter()
            .map(|s| json!({ "label": s.label, "value": s.value }))
            .collect(),
    )
}

fn y_label(label: &str, unit: &str) -> String {
    format!("{label} ({unit})")
}

/// Annual totals (precipitation) or means as bars.
pub fn annual_bars(report: &VariableReport) -> ChartPayload {
    let (color, _) = variable_colors(report.variable);
    ChartPayload::new(
        annual_points(&report.annual),
        json!({
            "title": format!("{} Anual", report.label),
            "yLabel": y_label(&report.label, &report.unit),
            "unit": report.unit,
            "color": color,
            "decimals": 1,
        }),
    )
}

/// Annual means as a line with the year as its date.
pub fn annual_line(report: &VariableReport) -> ChartPayload {
    let (color, _) = variable_colors(report.variable);
    let data: Vec<Value> = report
        .annual
        .iter()
        .map(|a| {
            json!({
                "date": format!("{}-07-01", a.year),
                "value": a.value,
                "moving_average": Value::Null,
            })
        })
        .collect();
    ChartPayload::new(
        Value::Array(data),
        json!({
            "title": format!("{} Anual", report.label),
            "yLabel": y_label(&report.label, &report.unit),
            "unit": report.unit,
            "color": color,
            "averageColor": color,
            "valueLabel": "Anual",
            "averageLabel": "",
            "decimals": 2,
        }),
    )
}

/// Mean of each calendar month across the years.
pub fn seasonal_bars(report: &VariableReport) -> ChartPayload {
    let (color, _) = variable_colors(report.variable);
    ChartPayload::new(
        seasonal_points(&report.seasonal),
        json!({
            "title": format!("{} Média Mensal", report.label),
            "yLabel": y_label(&report.label, &report.unit),
            "unit": report.unit,
            "color": color,
            "decimals": 1,
        }),
    )
}

fn rolling_line(
    rows: &[RollingValue],
    variable: Variable,
    title: &str,
    label: &str,
    unit: &str,
) -> ChartPayload {
    let (color, average_color) = variable_colors(variable);
    ChartPayload::new(
        json!(rows),
        json!({
            "title": title,
            "yLabel": y_label(label, unit),
            "unit": unit,
            "color": color,
            "averageColor": average_color,
            "valueLabel": label,
            "averageLabel": "Média móvel (3 meses)",
            "decimals": 1,
        }),
    )
}

/// Monthly series with its centered three-month moving average.
pub fn monthly_series(report: &VariableReport) -> ChartPayload {
    rolling_line(
        &report.monthly,
        report.variable,
        &format!("Série Temporal Mensal de {}", report.label),
        &report.label,
        &report.unit,
    )
}

/// Distribution of the annual values.
pub fn annual_box(report: &VariableReport) -> ChartPayload {
    let (color, _) = variable_colors(report.variable);
    let values: Vec<Option<f64>> = report.annual.iter().map(|a| a.value).collect();
    ChartPayload::new(
        json!([{ "name": report.label, "color": color, "values": values }]),
        json!({
            "title": format!("Distribuição de {} Anual", report.label),
            "yLabel": y_label(&report.label, &report.unit),
            "unit": report.unit,
            "decimals": 2,
        }),
    )
}

fn grouped(
    categories: Vec<String>,
    et: Vec<Option<f64>>,
    balance: Vec<Option<f64>>,
    title: &str,
) -> ChartPayload {
    ChartPayload::new(
        json!({
            "categories": categories,
            "series": [
                {
                    "name": Variable::Evapotranspiration.label(),
                    "color": EVAPOTRANSPIRATION_COLOR,
                    "values": et,
                },
                {
                    "name": Variable::WaterBalance.label(),
                    "color": BALANCE_COLOR,
                    "values": balance,
                },
            ],
        }),
        json!({
            "title": title,
            "yLabel": "Valor (mm/mês)",
            "unit": "mm",
            "decimals": 1,
        }),
    )
}

/// Annual means of ET and balance side by side. Both lists come from the
/// same joined months so they share the year axis.
pub fn water_balance_annual(report: &WaterBalanceReport) -> ChartPayload {
    grouped(
        report
            .evapotranspiration_annual
            .iter()
            .map(|a| a.year.to_string())
            .collect(),
        report
            .evapotranspiration_annual
            .iter()
            .map(|a| a.value)
            .collect(),
        report.balance_annual.iter().map(|a| a.value).collect(),
        "Evapotranspiração e Balanço Hídrico Médios Anuais",
    )
}

/// Calendar-month means of ET and balance side by side.
pub fn water_balance_seasonal(report: &WaterBalanceReport) -> ChartPayload {
    grouped(
        report
            .evapotranspiration_seasonal
            .iter()
            .map(|s| s.label.clone())
            .collect(),
        report
            .evapotranspiration_seasonal
            .iter()
            .map(|s| s.value)
            .collect(),
        report.balance_seasonal.iter().map(|s| s.value).collect(),
        "Evapotranspiração e Balanço Hídrico Médios Mensais",
    )
}

pub fn evapotranspiration_series(report: &WaterBalanceReport) -> ChartPayload {
    rolling_line(
        &report.evapotranspiration_monthly,
        Variable::Evapotranspiration,
        "Série Temporal de Evapotranspiração",
        Variable::Evapotranspiration.label(),
        "mm",
    )
}

pub fn balance_series(report: &WaterBalanceReport) -> ChartPayload {
    rolling_line(
        &report.balance_monthly,
        Variable::WaterBalance,
        "Série Temporal do Balanço Hídrico",
        Variable::WaterBalance.label(),
        "mm",
    )
}

/// Raw monthly table of the joined months.
pub fn water_balance_table(report: &WaterBalanceReport) -> ChartPayload {
    ChartPayload::new(
        json!(report.rows),
        json!({
            "title": "Tabela de Dados Mensais",
            "columns": [
                { "key": "date", "label": "Data", "type": "date" },
                { "key": "precipitation", "label": "Precipitação (mm)", "type": "number", "decimals": 2 },
                { "key": "evapotranspiration", "label": "ET (mm)", "type": "number", "decimals": 2 },
                { "key": "water_balance", "label": "Balanço Hídrico (mm)", "type": "number", "decimals": 2 },
            ],
            "defaultSort": { "key": "date", "direction": "asc" },
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_data::report::ReportHeader;
    use agro_data::stats::DescriptiveStats;

    fn report() -> VariableReport {
        VariableReport {
            header: ReportHeader {
                region: "Uberlândia - Minas Gerais".to_string(),
                start: "2015-01-01".to_string(),
                end: "2016-12-31".to_string(),
            },
            variable: Variable::Precipitation,
            label: "Precipitação".to_string(),
            unit: "mm".to_string(),
            annual: vec![
                AnnualValue { year: 2015, value: Some(1320.5) },
                AnnualValue { year: 2016, value: None },
            ],
            monthly: vec![RollingValue {
                year: 2015,
                month: 1,
                date: "2015-01-15".to_string(),
                value: Some(250.0),
                moving_average: None,
            }],
            seasonal: vec![SeasonalPoint {
                month: 1,
                label: "Jan".to_string(),
                value: Some(250.0),
            }],
            annual_stats: DescriptiveStats::from_values([Some(1320.5), None]),
            extremes: None,
        }
    }

    #[test]
    fn annual_bars_keep_absent_years_as_null() {
        let payload = annual_bars(&report());
        let data: Value = serde_json::from_str(&payload.data).unwrap();
        assert_eq!(data[0]["label"], "2015");
        assert_eq!(data[0]["value"], 1320.5);
        assert!(data[1]["value"].is_null());

        let config: Value = serde_json::from_str(&payload.config).unwrap();
        assert_eq!(config["yLabel"], "Precipitação (mm)");
        assert_eq!(config["color"], PRECIPITATION_COLOR);
    }

    #[test]
    fn monthly_series_carries_the_moving_average_field() {
        let payload = monthly_series(&report());
        let data: Value = serde_json::from_str(&payload.data).unwrap();
        assert_eq!(data[0]["date"], "2015-01-15");
        assert!(data[0]["moving_average"].is_null());
    }

    #[test]
    fn box_plot_has_one_set_per_report() {
        let payload = annual_box(&report());
        let data: Value = serde_json::from_str(&payload.data).unwrap();
        assert_eq!(data.as_array().unwrap().len(), 1);
        assert_eq!(data[0]["values"].as_array().unwrap().len(), 2);
    }
}
