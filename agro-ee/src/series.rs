use crate::dataset::Variable;
use crate::period::Period;
use serde::{Deserialize, Serialize};

/// Result of one per-period round trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSample {
    /// Number of source images that fell inside the period.
    pub image_count: u64,
    /// Region mean of the period aggregate; `None` when no valid pixel exists.
    pub value: Option<f64>,
}

impl PeriodSample {
    pub fn has_imagery(&self) -> bool {
        self.image_count > 0
    }

    /// The value to record: absent whenever the period had no imagery.
    pub fn recorded_value(&self) -> Option<f64> {
        if self.has_imagery() {
            self.value.filter(|v| v.is_finite())
        } else {
            None
        }
    }
}

/// One `(period, value-or-absent)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub period: Period,
    pub value: Option<f64>,
}

/// Chronologically ordered aggregate values for one variable.
///
/// Entries are only ever appended in period order while collecting, then
/// consumed whole by the tabulation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    pub variable: Variable,
    entries: Vec<SeriesEntry>,
}

impl AggregateSeries {
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            entries: Vec::new(),
        }
    }

    /// Append the next period. Out-of-order or repeated periods are ignored
    /// so the series stays strictly increasing.
    pub fn push(&mut self, period: Period, value: Option<f64>) -> bool {
        if let Some(last) = self.entries.last() {
            if last.period >= period {
                log::warn!(
                    "Dropping out-of-order period {} after {} for {}",
                    period,
                    last.period,
                    self.variable
                );
                return false;
            }
        }
        self.entries.push(SeriesEntry { period, value });
        true
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values that are present, in order.
    pub fn present_values(&self) -> Vec<f64> {
        self.entries.iter().filter_map(|e| e.value).collect()
    }

    pub fn absent_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_none()).count()
    }

    pub fn get(&self, period: &Period) -> Option<&SeriesEntry> {
        self.entries
            .binary_search_by(|e| e.period.cmp(period))
            .ok()
            .map(|i| &self.entries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_without_imagery_is_absent() {
        let sample = PeriodSample {
            image_count: 0,
            value: Some(0.0),
        };
        assert_eq!(sample.recorded_value(), None);
        let nan = PeriodSample {
            image_count: 3,
            value: Some(f64::NAN),
        };
        assert_eq!(nan.recorded_value(), None);
        let ok = PeriodSample {
            image_count: 3,
            value: Some(12.5),
        };
        assert_eq!(ok.recorded_value(), Some(12.5));
    }

    #[test]
    fn push_keeps_series_strictly_increasing() {
        let mut series = AggregateSeries::new(Variable::Precipitation);
        assert!(series.push(Period::Year(2015), Some(1200.0)));
        assert!(series.push(Period::Year(2016), None));
        assert!(!series.push(Period::Year(2016), Some(1.0)));
        assert!(!series.push(Period::Year(2014), Some(1.0)));
        assert_eq!(series.len(), 2);
        assert_eq!(series.absent_count(), 1);
        assert_eq!(series.present_values(), vec![1200.0]);
    }

    #[test]
    fn get_finds_entry_by_period() {
        let mut series = AggregateSeries::new(Variable::Temperature);
        series.push(Period::month(2016, 5).unwrap(), Some(24.0));
        series.push(Period::month(2016, 6).unwrap(), None);
        let june = series.get(&Period::month(2016, 6).unwrap()).unwrap();
        assert_eq!(june.value, None);
        assert!(series.get(&Period::month(2016, 7).unwrap()).is_none());
    }
}
