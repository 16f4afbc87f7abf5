//! CSV export of reports.
//!
//! A path ending in `.gz` is written gzip-compressed.

use crate::report::{VariableReport, WaterBalanceReport};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Annual rows then monthly rows, one table:
/// `granularity,year,month,value,moving_average`.
pub fn write_variable_csv<W: Write>(report: &VariableReport, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["granularity", "year", "month", "value", "moving_average"])?;
    for row in &report.annual {
        wtr.write_record([
            "annual".to_string(),
            row.year.to_string(),
            String::new(),
            cell(row.value),
            String::new(),
        ])?;
    }
    for row in &report.monthly {
        wtr.write_record([
            "monthly".to_string(),
            row.year.to_string(),
            row.month.to_string(),
            cell(row.value),
            cell(row.moving_average),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// The raw joined table: `year,month,precipitation,evapotranspiration,water_balance`.
pub fn write_water_balance_csv<W: Write>(
    report: &WaterBalanceReport,
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "year",
        "month",
        "precipitation",
        "evapotranspiration",
        "water_balance",
    ])?;
    for row in &report.rows {
        wtr.write_record([
            row.year.to_string(),
            row.month.to_string(),
            cell(row.precipitation),
            cell(row.evapotranspiration),
            cell(row.water_balance),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Create `path` and hand a writer to `write`, compressing for `.gz` paths.
pub fn write_to_path<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut dyn Write) -> anyhow::Result<()>,
{
    let file = BufWriter::new(File::create(path)?);
    if is_gzip_path(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write(&mut encoder)?;
        encoder.finish()?.flush()?;
    } else {
        let mut file = file;
        write(&mut file)?;
        file.flush()?;
    }
    log::info!("export: wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportHeader, SeasonalPoint};
    use crate::stats::DescriptiveStats;
    use agro_db::models::{AnnualValue, RollingValue};
    use agro_ee::dataset::Variable;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn report() -> VariableReport {
        VariableReport {
            header: ReportHeader {
                region: "Uberlândia - Minas Gerais".to_string(),
                start: "2016-01-01".to_string(),
                end: "2016-12-31".to_string(),
            },
            variable: Variable::Precipitation,
            label: "Precipitação".to_string(),
            unit: "mm".to_string(),
            annual: vec![AnnualValue {
                year: 2016,
                value: Some(1480.5),
            }],
            monthly: vec![RollingValue {
                year: 2016,
                month: 6,
                date: "2016-06-01".to_string(),
                value: None,
                moving_average: None,
            }],
            seasonal: vec![SeasonalPoint {
                month: 6,
                label: "Jun".to_string(),
                value: None,
            }],
            annual_stats: DescriptiveStats::default(),
            extremes: None,
        }
    }

    #[test]
    fn variable_csv_leaves_absent_cells_empty() {
        let mut buf = Vec::new();
        write_variable_csv(&report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "granularity,year,month,value,moving_average");
        assert_eq!(lines[1], "annual,2016,,1480.5,");
        assert_eq!(lines[2], "monthly,2016,6,,");
    }

    #[test]
    fn gz_paths_are_compressed() {
        let path = std::env::temp_dir().join(format!("agro-data-{}.csv.gz", std::process::id()));
        write_to_path(&path, |w| write_variable_csv(&report(), w)).unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.starts_with("granularity,year"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn gzip_detection() {
        assert!(is_gzip_path(Path::new("out/precipitation.csv.gz")));
        assert!(!is_gzip_path(Path::new("out/precipitation.csv")));
    }
}
