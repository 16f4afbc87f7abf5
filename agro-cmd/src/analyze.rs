//! Analysis runs: one variable, the water balance, one year's map.

use agro_data::export;
use agro_data::report::{VariableReport, WaterBalanceReport};
use agro_data::stats::DescriptiveStats;
use agro_ee::aggregation::{AnalysisRequest, Aggregator};
use agro_ee::client::EarthEngineClient;
use agro_ee::dataset::{Dataset, Variable};
use agro_utils::dates::parse_date;
use agro_utils::numbers::format_optional;
use anyhow::Context;
use log::info;
use std::fmt::Write as _;
use std::path::Path;

/// Validate the command line before anything remote happens.
pub fn parse_request(
    state: &str,
    municipality: &str,
    start: &str,
    end: &str,
) -> anyhow::Result<AnalysisRequest> {
    let start = parse_date(start).with_context(|| format!("data inicial inválida {start:?}"))?;
    let end = parse_date(end).with_context(|| format!("data final inválida {end:?}"))?;
    Ok(AnalysisRequest::new(state, municipality, start, end)?)
}

fn dataset_for(variable: Variable) -> anyhow::Result<Dataset> {
    Dataset::for_variable(variable)
        .with_context(|| format!("{} não tem um conjunto de dados único", variable.label()))
}

/// Statistics as an aligned two-column block, one column per series.
pub fn format_stats(columns: &[(&str, &DescriptiveStats)], decimals: usize) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<16}", "");
    for (name, _) in columns {
        let _ = write!(out, "{name:>20}");
    }
    out.push('\n');
    let rendered: Vec<_> = columns.iter().map(|(_, s)| s.table_rows(decimals)).collect();
    if let Some(first) = rendered.first() {
        for (i, (label, _)) in first.iter().enumerate() {
            let _ = write!(out, "{label:<16}");
            for rows in &rendered {
                let _ = write!(out, "{:>20}", rows[i].1);
            }
            out.push('\n');
        }
    }
    out
}

/// Plain-text summary of a variable report.
pub fn format_variable_report(report: &VariableReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) em {}, {} a {}",
        report.label, report.unit, report.header.region, report.header.start, report.header.end
    );
    let _ = writeln!(out, "\nAnual");
    for row in &report.annual {
        let _ = writeln!(out, "  {}  {:>10}", row.year, format_optional(row.value, 2));
    }
    let _ = writeln!(out, "\nMédia mensal");
    for point in &report.seasonal {
        let _ = writeln!(out, "  {}  {:>10}", point.label, format_optional(point.value, 2));
    }
    let _ = writeln!(out, "\nEstatísticas dos valores anuais");
    out.push_str(&format_stats(&[(report.label.as_str(), &report.annual_stats)], 2));
    if let Some(extremes) = &report.extremes {
        let _ = writeln!(
            out,
            "\nMaior: {} ({:.2} {})\nMenor: {} ({:.2} {})",
            extremes.highest.year,
            extremes.highest.value,
            report.unit,
            extremes.lowest.year,
            extremes.lowest.value,
            report.unit
        );
    }
    out
}

/// Plain-text summary of the water balance.
pub fn format_water_balance(report: &WaterBalanceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Balanço hídrico em {}, {} a {} ({} meses pareados)",
        report.header.region,
        report.header.start,
        report.header.end,
        report.rows.len()
    );
    let _ = writeln!(out, "\n  {:<10} {:>10} {:>10} {:>10}", "data", "P", "ET", "P-ET");
    for row in &report.rows {
        let _ = writeln!(
            out,
            "  {:<10} {:>10} {:>10} {:>10}",
            row.date,
            format_optional(row.precipitation, 2),
            format_optional(row.evapotranspiration, 2),
            format_optional(row.water_balance, 2)
        );
    }
    out.push('\n');
    out.push_str(&format_stats(
        &[
            ("ET", &report.evapotranspiration_stats),
            ("P-ET", &report.balance_stats),
        ],
        2,
    ));
    out
}

pub async fn run_analyze(
    client: &EarthEngineClient,
    variable: Variable,
    request: &AnalysisRequest,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let dataset = dataset_for(variable)?;
    info!(
        "Analyzing {} for {} ({} years, {} months)",
        variable.key(),
        request.region.label(),
        request.window.years().len(),
        request.window.months().len()
    );
    let series = Aggregator::new(client)
        .variable_series(&dataset, request)
        .await?;
    let report = VariableReport::from_series(&series, request)?;

    match output {
        Some(path) => export::write_to_path(path, |w| export::write_variable_csv(&report, w))?,
        None => print!("{}", format_variable_report(&report)),
    }
    Ok(())
}

pub async fn run_water_balance(
    client: &EarthEngineClient,
    request: &AnalysisRequest,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    info!("Water balance for {}", request.region.label());
    let inputs = Aggregator::new(client)
        .water_balance_inputs(
            &Dataset::chirps_pentad(),
            &Dataset::mod16a2_evapotranspiration(),
            request,
        )
        .await?;
    let report = WaterBalanceReport::from_inputs(&inputs, request)?;

    match output {
        Some(path) => {
            export::write_to_path(path, |w| export::write_water_balance_csv(&report, w))?
        }
        None => print!("{}", format_water_balance(&report)),
    }
    Ok(())
}

pub async fn run_map(
    client: &EarthEngineClient,
    variable: Variable,
    request: &AnalysisRequest,
    year: Option<i32>,
) -> anyhow::Result<()> {
    let dataset = dataset_for(variable)?;
    let years = request.window.years();
    let period = match year {
        Some(year) => years
            .into_iter()
            .find(|p| p.year() == year)
            .with_context(|| format!("{year} está fora de {} a {}", request.window.start(), request.window.end()))?,
        None => years
            .into_iter()
            .next()
            .context("o período não cobre nenhum ano")?,
    };
    let map = client
        .result_map(&dataset, &request.region, &request.window, &period)
        .await?;
    info!("Map {} for {}", map.layer.name, period);
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_validated_locally() {
        let request = parse_request("Minas Gerais", "Uberlândia", "2015-01-01", "2017-12-31").unwrap();
        assert_eq!(request.window.years().len(), 3);
        assert_eq!(request.window.months().len(), 36);

        assert!(parse_request("Minas Gerais", "Uberlândia", "2017-12-31", "2015-01-01").is_err());
        assert!(parse_request("Minas Gerais", "Uberlândia", "2015-13-01", "2017-01-01").is_err());
        assert!(parse_request("", "Uberlândia", "2015-01-01", "2017-01-01").is_err());
    }

    #[test]
    fn water_balance_has_no_single_dataset() {
        assert!(dataset_for(Variable::WaterBalance).is_err());
        assert_eq!(dataset_for(Variable::Temperature).unwrap().band, "LST_Day_1km");
    }

    #[test]
    fn stats_block_aligns_columns() {
        let et = DescriptiveStats::from_values([Some(80.0), Some(100.0), None]);
        let balance = DescriptiveStats::from_values([Some(-20.0), Some(40.0)]);
        let text = format_stats(&[("ET", &et), ("P-ET", &balance)], 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[1].starts_with("Contagem"));
        assert!(lines[1].ends_with("2"));
        assert!(lines[2].contains("90.0"));
        assert!(lines[2].contains("10.0"));
    }
}
