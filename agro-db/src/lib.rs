//! In-memory SQLite "local table" for aggregate series.
//!
//! Each analysis run loads its per-period results here and derives the
//! chart tables with SQL: chronological rows, centered moving averages,
//! seasonal and annual means, the water-balance join and extremes.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite`, fresh for every run
//! - Typed query methods returning serializable structs for JSON export to D3.js
//!
//! # Usage
//!
//! ```rust
//! use agro_db::Database;
//! use agro_ee::dataset::Variable;
//! use agro_ee::period::Period;
//! use agro_ee::series::AggregateSeries;
//!
//! let db = Database::new().unwrap();
//! let mut series = AggregateSeries::new(Variable::Precipitation);
//! series.push(Period::Year(2016), Some(1480.0));
//! db.load_series(&series).unwrap();
//! let rows = db.query_annual("precipitation").unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding the series of one analysis run.
///
/// Cheaply cloneable (via `Rc`) for sharing across Dioxus components in a
/// single-threaded WASM environment.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_ee::dataset::Variable;
    use agro_ee::period::Period;
    use agro_ee::series::AggregateSeries;

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        let mut series = AggregateSeries::new(Variable::Temperature);
        series.push(Period::Year(2016), Some(27.4));
        db.load_series(&series).unwrap();
        let rows = db2.query_annual("temperature").unwrap();
        assert_eq!(rows.len(), 1, "Clone should see same data via shared Rc");
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        assert!(db.query_annual("precipitation").unwrap().is_empty());
        assert!(db.query_monthly("precipitation").unwrap().is_empty());
    }
}
