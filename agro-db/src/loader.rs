//! Loading aggregate series into the local table.
//!
//! Yearly entries go to `annual_values`, monthly entries to `monthly_values`.
//! Re-loading a period replaces its previous row.

use crate::Database;
use agro_ee::period::Period;
use agro_ee::series::AggregateSeries;
use rusqlite::params;

impl Database {
    /// Load a series under its variable key.
    pub fn load_series(&self, series: &AggregateSeries) -> anyhow::Result<usize> {
        self.load_series_as(series.variable.key(), series)
    }

    /// Load a series under an explicit name, for when two series share a
    /// variable (e.g. daily and pentad precipitation).
    pub fn load_series_as(&self, name: &str, series: &AggregateSeries) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let mut count = 0usize;
        let mut absent = 0usize;
        for entry in series.entries() {
            match entry.period {
                Period::Year(year) => {
                    tx.execute(
                        "INSERT OR REPLACE INTO annual_values (series, year, value)
                         VALUES (?1, ?2, ?3)",
                        params![name, year, entry.value],
                    )?;
                }
                Period::Month { year, month } => {
                    tx.execute(
                        "INSERT OR REPLACE INTO monthly_values (series, year, month, value)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![name, year, month, entry.value],
                    )?;
                }
            }
            if entry.value.is_none() {
                absent += 1;
            }
            count += 1;
        }
        tx.commit()?;
        log::info!(
            "loader: loaded {} periods of '{}' ({} absent)",
            count,
            name,
            absent
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use agro_ee::dataset::Variable;
    use agro_ee::period::Period;
    use agro_ee::series::AggregateSeries;

    #[test]
    fn load_series_routes_by_granularity() {
        let db = Database::new().unwrap();
        let mut annual = AggregateSeries::new(Variable::Precipitation);
        annual.push(Period::Year(2015), Some(1300.0));
        annual.push(Period::Year(2016), None);
        let mut monthly = AggregateSeries::new(Variable::Precipitation);
        monthly.push(Period::month(2015, 1).unwrap(), Some(250.0));

        assert_eq!(db.load_series(&annual).unwrap(), 2);
        assert_eq!(db.load_series(&monthly).unwrap(), 1);

        let years = db.query_annual("precipitation").unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(years[1].value, None);
        assert_eq!(db.query_monthly("precipitation").unwrap().len(), 1);
    }

    #[test]
    fn reloading_replaces_rows() {
        let db = Database::new().unwrap();
        let mut first = AggregateSeries::new(Variable::Temperature);
        first.push(Period::Year(2015), Some(20.0));
        db.load_series(&first).unwrap();
        let mut second = AggregateSeries::new(Variable::Temperature);
        second.push(Period::Year(2015), Some(21.5));
        db.load_series(&second).unwrap();

        let years = db.query_annual("temperature").unwrap();
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].value, Some(21.5));
    }

    #[test]
    fn load_series_as_keeps_names_apart() {
        let db = Database::new().unwrap();
        let mut pentad = AggregateSeries::new(Variable::Precipitation);
        pentad.push(Period::month(2015, 1).unwrap(), Some(240.0));
        db.load_series_as("precipitation_pentad", &pentad).unwrap();
        assert!(db.query_monthly("precipitation").unwrap().is_empty());
        assert_eq!(db.query_monthly("precipitation_pentad").unwrap().len(), 1);
    }
}
