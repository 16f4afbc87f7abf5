//! Shared helpers for the agro crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::NaiveDate;

    const MONTH_ABBREVIATIONS: [&str; 12] = [
        "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
    ];

    const MONTH_NAMES: [&str; 12] = [
        "Janeiro",
        "Fevereiro",
        "Março",
        "Abril",
        "Maio",
        "Junho",
        "Julho",
        "Agosto",
        "Setembro",
        "Outubro",
        "Novembro",
        "Dezembro",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Format as "DD/MM/YYYY", the way dates are shown to users.
    pub fn format_date_br(date: &NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }

    /// Three-letter Portuguese month label, e.g. 3 -> "Mar".
    pub fn month_abbreviation(month: u32) -> Result<&'static str, DateError> {
        month_index(month).map(|i| MONTH_ABBREVIATIONS[i])
    }

    /// Full Portuguese month name, e.g. 3 -> "Março".
    pub fn month_name(month: u32) -> Result<&'static str, DateError> {
        month_index(month).map(|i| MONTH_NAMES[i])
    }

    fn month_index(month: u32) -> Result<usize, DateError> {
        if (1..=12).contains(&month) {
            Ok(month as usize - 1)
        } else {
            Err(DateError(format!("mês {month} fora do intervalo")))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
            assert_eq!(format_date_br(&date), "15/06/2023");
        }

        #[test]
        fn test_parse_rejects_other_formats() {
            assert!(parse_date("15/06/2023").is_err());
            assert!(parse_date("2023-02-30").is_err());
            assert_eq!(
                parse_date(" 2010-01-01 ").unwrap(),
                NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
            );
        }

        #[test]
        fn test_month_labels() {
            assert_eq!(month_abbreviation(1).unwrap(), "Jan");
            assert_eq!(month_abbreviation(12).unwrap(), "Dez");
            assert_eq!(month_name(3).unwrap(), "Março");
            assert!(month_abbreviation(0).is_err());
            assert!(month_name(13).is_err());
        }
    }
}

/// Number formatting for tables and tooltips
pub mod numbers {
    /// Round to `decimals` places and render, or "—" when absent.
    pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{v:.decimals$}"),
            _ => "—".to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_optional() {
            assert_eq!(format_optional(Some(1234.567), 1), "1234.6");
            assert_eq!(format_optional(None, 2), "—");
            assert_eq!(format_optional(Some(f64::NAN), 2), "—");
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "data inválida: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
