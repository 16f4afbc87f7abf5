//! Typed queries over the local table.
//!
//! All queries return chronologically ordered rows from [`crate::models`].
//! Absent values stay absent: aggregates use SQL semantics where `AVG`
//! skips NULL and arithmetic with NULL yields NULL.

use crate::models::{
    AnnualValue, Extremes, MonthlyValue, RollingValue, SeasonalMean, WaterBalanceRow, YearValue,
};
use crate::Database;
use rusqlite::{params, OptionalExtension};

impl Database {
    /// Yearly values of a series.
    pub fn query_annual(&self, series: &str) -> anyhow::Result<Vec<AnnualValue>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT year, value FROM annual_values
             WHERE series = ?1
             ORDER BY year",
        )?;
        let rows = stmt
            .query_map(params![series], |row| {
                Ok(AnnualValue {
                    year: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: query_annual({}) returned {} records", series, rows.len());
        Ok(rows)
    }

    /// Monthly values of a series.
    pub fn query_monthly(&self, series: &str) -> anyhow::Result<Vec<MonthlyValue>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT year, month, printf('%04d-%02d-01', year, month), value
             FROM monthly_values
             WHERE series = ?1
             ORDER BY year, month",
        )?;
        let rows = stmt
            .query_map(params![series], |row| {
                Ok(MonthlyValue {
                    year: row.get(0)?,
                    month: row.get(1)?,
                    date: row.get(2)?,
                    value: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: query_monthly({}) returned {} records", series, rows.len());
        Ok(rows)
    }

    /// Monthly values with a centered 3-month moving average.
    ///
    /// The average is the plain mean of the previous, current and next
    /// calendar month; it is absent unless all three exist and are present.
    /// The frame ranges over a month index, so a missing row breaks the
    /// window instead of pulling in a farther month.
    pub fn query_monthly_rolling(&self, series: &str) -> anyhow::Result<Vec<RollingValue>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT year, month, printf('%04d-%02d-01', year, month), value,
                    CASE WHEN COUNT(value) OVER w = 3 THEN AVG(value) OVER w END
             FROM monthly_values
             WHERE series = ?1
             WINDOW w AS (ORDER BY year * 12 + month RANGE BETWEEN 1 PRECEDING AND 1 FOLLOWING)
             ORDER BY year, month",
        )?;
        let rows = stmt
            .query_map(params![series], |row| {
                Ok(RollingValue {
                    year: row.get(0)?,
                    month: row.get(1)?,
                    date: row.get(2)?,
                    value: row.get(3)?,
                    moving_average: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_monthly_rolling({}) returned {} records",
            series,
            rows.len()
        );
        Ok(rows)
    }

    /// Mean of each calendar month over all years, present values only.
    pub fn query_seasonal_means(&self, series: &str) -> anyhow::Result<Vec<SeasonalMean>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT month, AVG(value) FROM monthly_values
             WHERE series = ?1
             GROUP BY month
             ORDER BY month",
        )?;
        let rows = stmt
            .query_map(params![series], |row| {
                Ok(SeasonalMean {
                    month: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_seasonal_means({}) returned {} records",
            series,
            rows.len()
        );
        Ok(rows)
    }

    /// Mean of the monthly values of each year, present values only.
    pub fn query_annual_means(&self, series: &str) -> anyhow::Result<Vec<AnnualValue>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT year, AVG(value) FROM monthly_values
             WHERE series = ?1
             GROUP BY year
             ORDER BY year",
        )?;
        let rows = stmt
            .query_map(params![series], |row| {
                Ok(AnnualValue {
                    year: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_annual_means({}) returned {} records",
            series,
            rows.len()
        );
        Ok(rows)
    }

    /// Write `output = precipitation - evapotranspiration` for every month
    /// present in both monthly series, replacing any previous `output` rows.
    ///
    /// Pairing is on `(year, month)`; months found in only one input get no
    /// row. A month absent on either side gets an absent balance.
    pub fn materialize_water_balance(
        &self,
        precipitation: &str,
        evapotranspiration: &str,
        output: &str,
    ) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM monthly_values WHERE series = ?1", params![output])?;
        let inserted = tx.execute(
            "INSERT INTO monthly_values (series, year, month, value)
             SELECT ?3, p.year, p.month, p.value - e.value
             FROM monthly_values p
             INNER JOIN monthly_values e
                 ON e.year = p.year AND e.month = p.month AND e.series = ?2
             WHERE p.series = ?1",
            params![precipitation, evapotranspiration, output],
        )?;
        tx.commit()?;
        log::info!(
            "query: materialize_water_balance({} - {}) wrote {} records",
            precipitation,
            evapotranspiration,
            inserted
        );
        Ok(inserted)
    }

    /// The joined raw table behind a materialized balance.
    pub fn query_water_balance(
        &self,
        precipitation: &str,
        evapotranspiration: &str,
        balance: &str,
    ) -> anyhow::Result<Vec<WaterBalanceRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT b.year, b.month, printf('%04d-%02d-01', b.year, b.month),
                    p.value, e.value, b.value
             FROM monthly_values b
             INNER JOIN monthly_values p
                 ON p.year = b.year AND p.month = b.month AND p.series = ?1
             INNER JOIN monthly_values e
                 ON e.year = b.year AND e.month = b.month AND e.series = ?2
             WHERE b.series = ?3
             ORDER BY b.year, b.month",
        )?;
        let rows = stmt
            .query_map(params![precipitation, evapotranspiration, balance], |row| {
                Ok(WaterBalanceRow {
                    year: row.get(0)?,
                    month: row.get(1)?,
                    date: row.get(2)?,
                    precipitation: row.get(3)?,
                    evapotranspiration: row.get(4)?,
                    water_balance: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: query_water_balance returned {} records", rows.len());
        Ok(rows)
    }

    /// Years with the highest and lowest present annual value; `None` when
    /// the series has no present value. Ties go to the earliest year.
    pub fn query_extremes(&self, series: &str) -> anyhow::Result<Option<Extremes>> {
        let conn = self.conn.borrow();
        let pick = |order: &str| -> anyhow::Result<Option<YearValue>> {
            let sql = format!(
                "SELECT year, value FROM annual_values
                 WHERE series = ?1 AND value IS NOT NULL
                 ORDER BY value {order}, year
                 LIMIT 1"
            );
            let found = conn
                .query_row(&sql, params![series], |row| {
                    Ok(YearValue {
                        year: row.get(0)?,
                        value: row.get(1)?,
                    })
                })
                .optional()?;
            Ok(found)
        };
        let highest = pick("DESC")?;
        let lowest = pick("ASC")?;
        Ok(highest.zip(lowest).map(|(highest, lowest)| Extremes { highest, lowest }))
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use agro_ee::dataset::Variable;
    use agro_ee::period::Period;
    use agro_ee::series::AggregateSeries;

    fn monthly(variable: Variable, year: i32, values: &[Option<f64>]) -> AggregateSeries {
        let mut series = AggregateSeries::new(variable);
        for (i, value) in values.iter().enumerate() {
            series.push(Period::month(year, i as u32 + 1).unwrap(), *value);
        }
        series
    }

    fn sample_db() -> Database {
        let db = Database::new().unwrap();
        let mut annual = AggregateSeries::new(Variable::Precipitation);
        annual.push(Period::Year(2015), Some(1250.0));
        annual.push(Period::Year(2016), Some(1610.0));
        annual.push(Period::Year(2017), None);
        annual.push(Period::Year(2018), Some(980.0));
        db.load_series(&annual).unwrap();
        db.load_series(&monthly(
            Variable::Precipitation,
            2016,
            &[Some(300.0), Some(240.0), Some(180.0), None, Some(30.0), Some(10.0)],
        ))
        .unwrap();
        db
    }

    #[test]
    fn query_annual_is_ordered_and_keeps_absent() {
        let db = sample_db();
        let years = db.query_annual("precipitation").unwrap();
        let keys: Vec<i32> = years.iter().map(|r| r.year).collect();
        assert_eq!(keys, vec![2015, 2016, 2017, 2018]);
        assert_eq!(years[2].value, None);
    }

    #[test]
    fn query_monthly_formats_dates() {
        let db = sample_db();
        let months = db.query_monthly("precipitation").unwrap();
        assert_eq!(months.len(), 6);
        assert_eq!(months[0].date, "2016-01-01");
        assert_eq!(months[3].value, None);
    }

    #[test]
    fn query_unknown_series_is_empty() {
        let db = sample_db();
        assert!(db.query_annual("nope").unwrap().is_empty());
        assert!(db.query_monthly_rolling("nope").unwrap().is_empty());
    }

    #[test]
    fn rolling_average_is_centered_and_absent_at_edges() {
        let db = sample_db();
        let rows = db.query_monthly_rolling("precipitation").unwrap();
        assert_eq!(rows[0].moving_average, None);
        assert_eq!(rows[1].moving_average, Some(240.0));
        // March's window includes the absent April
        assert_eq!(rows[2].moving_average, None);
        assert_eq!(rows[3].moving_average, None);
        assert_eq!(rows[4].moving_average, None);
        assert_eq!(rows[5].moving_average, None);
    }

    #[test]
    fn rolling_average_over_full_windows() {
        let db = Database::new().unwrap();
        db.load_series(&monthly(
            Variable::Temperature,
            2015,
            &[Some(24.0), Some(25.0), Some(26.0), Some(21.0)],
        ))
        .unwrap();
        let rows = db.query_monthly_rolling("temperature").unwrap();
        let averages: Vec<Option<f64>> = rows.iter().map(|r| r.moving_average).collect();
        assert_eq!(averages, vec![None, Some(25.0), Some(24.0), None]);
    }

    #[test]
    fn rolling_average_needs_chronological_neighbors() {
        let db = Database::new().unwrap();
        let mut et = AggregateSeries::new(Variable::Evapotranspiration);
        // June has no row at all
        et.push(Period::month(2016, 4).unwrap(), Some(10.0));
        et.push(Period::month(2016, 5).unwrap(), Some(20.0));
        et.push(Period::month(2016, 7).unwrap(), Some(90.0));
        et.push(Period::month(2016, 8).unwrap(), Some(100.0));
        db.load_series(&et).unwrap();

        let rows = db.query_monthly_rolling("evapotranspiration").unwrap();
        let averages: Vec<Option<f64>> = rows.iter().map(|r| r.moving_average).collect();
        assert_eq!(averages, vec![None, None, None, None]);
    }

    #[test]
    fn rolling_average_spans_year_boundary() {
        let db = Database::new().unwrap();
        let mut series = AggregateSeries::new(Variable::Precipitation);
        series.push(Period::month(2015, 11).unwrap(), Some(150.0));
        series.push(Period::month(2015, 12).unwrap(), Some(270.0));
        series.push(Period::month(2016, 1).unwrap(), Some(300.0));
        series.push(Period::month(2016, 3).unwrap(), Some(180.0));
        db.load_series(&series).unwrap();

        let rows = db.query_monthly_rolling("precipitation").unwrap();
        assert_eq!((rows[1].year, rows[1].month), (2015, 12));
        assert_eq!(rows[1].moving_average, Some(240.0));
        // February is missing
        assert_eq!(rows[2].moving_average, None);
        assert_eq!(rows[3].moving_average, None);
    }

    #[test]
    fn seasonal_means_skip_absent() {
        let db = Database::new().unwrap();
        db.load_series(&monthly(Variable::Precipitation, 2015, &[Some(200.0), None]))
            .unwrap();
        db.load_series(&monthly(Variable::Precipitation, 2016, &[Some(300.0), None]))
            .unwrap();
        let seasonal = db.query_seasonal_means("precipitation").unwrap();
        assert_eq!(seasonal.len(), 2);
        assert_eq!(seasonal[0].value, Some(250.0));
        assert_eq!(seasonal[1].value, None);
    }

    #[test]
    fn annual_means_of_monthly_values() {
        let db = sample_db();
        let means = db.query_annual_means("precipitation").unwrap();
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].year, 2016);
        // (300 + 240 + 180 + 30 + 10) / 5, April skipped
        assert!((means[0].value.unwrap() - 152.0).abs() < 1e-9);
    }

    #[test]
    fn water_balance_is_an_inner_join_on_year_and_month() {
        let db = Database::new().unwrap();
        db.load_series(&monthly(
            Variable::Precipitation,
            2016,
            &[Some(250.0), Some(200.0), Some(150.0)],
        ))
        .unwrap();
        let mut et = AggregateSeries::new(Variable::Evapotranspiration);
        et.push(Period::month(2016, 2).unwrap(), Some(90.0));
        et.push(Period::month(2016, 3).unwrap(), None);
        et.push(Period::month(2016, 4).unwrap(), Some(70.0));
        db.load_series(&et).unwrap();

        let written = db
            .materialize_water_balance("precipitation", "evapotranspiration", "water_balance")
            .unwrap();
        assert_eq!(written, 2);

        let rows = db
            .query_water_balance("precipitation", "evapotranspiration", "water_balance")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].year, rows[0].month), (2016, 2));
        assert_eq!(rows[0].water_balance, Some(110.0));
        assert_eq!(rows[1].evapotranspiration, None);
        assert_eq!(rows[1].water_balance, None);
    }

    #[test]
    fn materialize_replaces_previous_balance() {
        let db = Database::new().unwrap();
        db.load_series(&monthly(Variable::Precipitation, 2016, &[Some(100.0)]))
            .unwrap();
        db.load_series(&monthly(Variable::Evapotranspiration, 2016, &[Some(40.0)]))
            .unwrap();
        db.materialize_water_balance("precipitation", "evapotranspiration", "wb")
            .unwrap();
        db.materialize_water_balance("precipitation", "evapotranspiration", "wb")
            .unwrap();
        let balance = db.query_monthly("wb").unwrap();
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[0].value, Some(60.0));
    }

    #[test]
    fn extremes_ignore_absent_years() {
        let db = sample_db();
        let extremes = db.query_extremes("precipitation").unwrap().unwrap();
        assert_eq!(extremes.highest.year, 2016);
        assert_eq!(extremes.lowest.year, 2018);
        assert!(db.query_extremes("temperature").unwrap().is_none());
    }
}
