//! Statistics and report assembly for aggregate series.
//!
//! This crate turns the rows of the local table into what the pages and the
//! CLI show: descriptive statistics, per-variable reports and the composite
//! water-balance report.

pub mod export;
pub mod report;

/// Descriptive statistics over the present values of a series
pub mod stats {
    use agro_utils::numbers::format_optional;
    use serde::Serialize;

    /// count, mean, std, min, quartiles, max.
    ///
    /// Absent values are skipped, never treated as zero. Everything except
    /// `count` is `None` for an empty input; `std` is the sample standard
    /// deviation and needs at least two values.
    #[derive(Debug, Clone, Default, Serialize, PartialEq)]
    pub struct DescriptiveStats {
        pub count: usize,
        pub mean: Option<f64>,
        pub std: Option<f64>,
        pub min: Option<f64>,
        pub q25: Option<f64>,
        pub median: Option<f64>,
        pub q75: Option<f64>,
        pub max: Option<f64>,
    }

    impl DescriptiveStats {
        pub fn from_values<I>(values: I) -> Self
        where
            I: IntoIterator<Item = Option<f64>>,
        {
            let mut present: Vec<f64> = values
                .into_iter()
                .flatten()
                .filter(|v| v.is_finite())
                .collect();
            if present.is_empty() {
                return Self::default();
            }
            present.sort_by(|a, b| a.total_cmp(b));

            let n = present.len();
            let mean = present.iter().sum::<f64>() / n as f64;
            let std = if n >= 2 {
                let sum_sq: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
                Some((sum_sq / (n - 1) as f64).sqrt())
            } else {
                None
            };
            Self {
                count: n,
                mean: Some(mean),
                std,
                min: present.first().copied(),
                q25: quantile(&present, 0.25),
                median: quantile(&present, 0.5),
                q75: quantile(&present, 0.75),
                max: present.last().copied(),
            }
        }

        /// Label/value rows for the statistics table.
        pub fn table_rows(&self, decimals: usize) -> Vec<(&'static str, String)> {
            vec![
                ("Contagem", self.count.to_string()),
                ("Média", format_optional(self.mean, decimals)),
                ("Desvio padrão", format_optional(self.std, decimals)),
                ("Mínimo", format_optional(self.min, decimals)),
                ("25%", format_optional(self.q25, decimals)),
                ("50%", format_optional(self.median, decimals)),
                ("75%", format_optional(self.q75, decimals)),
                ("Máximo", format_optional(self.max, decimals)),
            ]
        }
    }

    /// Quantile of sorted data by linear interpolation between closest
    /// ranks; `None` when there is no data.
    pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
        let last = sorted.len().checked_sub(1)?;
        let position = q.clamp(0.0, 1.0) * last as f64;
        let low = position.floor() as usize;
        let high = position.ceil() as usize;
        Some(sorted[low] + (sorted[high] - sorted[low]) * (position - low as f64))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_quantile_interpolates_and_handles_empty() {
            assert_eq!(quantile(&[], 0.5), None);
            assert_eq!(quantile(&[7.0], 0.25), Some(7.0));
            assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(2.5));
            assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.25), Some(2.0));
        }

        #[test]
        fn test_stats_skip_absent_values() {
            let with_gaps = DescriptiveStats::from_values(vec![
                Some(10.0),
                None,
                Some(20.0),
                None,
                Some(30.0),
            ]);
            let present_only =
                DescriptiveStats::from_values(vec![Some(10.0), Some(20.0), Some(30.0)]);
            assert_eq!(with_gaps, present_only);
            assert_eq!(with_gaps.count, 3);
            assert_eq!(with_gaps.mean, Some(20.0));
            assert_eq!(with_gaps.min, Some(10.0));
            assert_eq!(with_gaps.max, Some(30.0));
        }

        #[test]
        fn test_sample_std() {
            let stats = DescriptiveStats::from_values(
                [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].map(Some),
            );
            // sum of squares 32 over n-1 = 7
            assert!((stats.std.unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
            assert_eq!(DescriptiveStats::from_values(vec![Some(1.0)]).std, None);
        }

        #[test]
        fn test_quartiles_interpolate() {
            let stats = DescriptiveStats::from_values([4.0, 1.0, 3.0, 2.0].map(Some));
            assert_eq!(stats.q25, Some(1.75));
            assert_eq!(stats.median, Some(2.5));
            assert_eq!(stats.q75, Some(3.25));
        }

        #[test]
        fn test_empty_series() {
            let stats = DescriptiveStats::from_values(vec![None, None]);
            assert_eq!(stats.count, 0);
            assert_eq!(stats.mean, None);
            assert_eq!(stats.table_rows(1)[1], ("Média", "—".to_string()));
        }

        #[test]
        fn test_table_rows() {
            let stats = DescriptiveStats::from_values(vec![Some(1200.0), Some(1500.0)]);
            let rows = stats.table_rows(1);
            assert_eq!(rows.len(), 8);
            assert_eq!(rows[0], ("Contagem", "2".to_string()));
            assert_eq!(rows[1], ("Média", "1350.0".to_string()));
        }
    }
}
