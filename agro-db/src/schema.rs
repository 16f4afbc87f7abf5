//! SQL schema for the in-memory local table.
//!
//! Every aggregate series lives in one of two tables, keyed by a series name
//! (usually the variable key). `value` is NULL where the remote reduction
//! produced no data for the period.

/// Returns the full SQL schema as a single batch string.
///
/// - `annual_values` - one row per (series, year)
/// - `monthly_values` - one row per (series, year, month)
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS annual_values (
        series TEXT NOT NULL,
        year INTEGER NOT NULL,
        value REAL,
        PRIMARY KEY (series, year)
    );

    CREATE TABLE IF NOT EXISTS monthly_values (
        series TEXT NOT NULL,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
        value REAL,
        PRIMARY KEY (series, year, month)
    );
    CREATE INDEX IF NOT EXISTS idx_monthly_period ON monthly_values(year, month);
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        for table in &["annual_values", "monthly_values"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table '{}' should exist", table);
        }
    }

    #[test]
    fn month_is_range_checked() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        let result = conn.execute(
            "INSERT INTO monthly_values (series, year, month, value) VALUES ('p', 2016, 13, 1.0)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
