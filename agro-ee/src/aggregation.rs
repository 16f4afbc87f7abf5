//! Per-period temporal + spatial aggregation.
//!
//! For each period the remote sequence is restricted to that period, reduced
//! temporally (sum or mean), then reduced spatially to one region mean. Every
//! period is its own remote round trip and periods are resolved one after the
//! other in chronological order, so latency grows linearly with the number of
//! periods. A failed round trip ends the run; missing imagery does not.

use crate::dataset::Dataset;
use crate::error::{EarthEngineError, ValidationError};
use crate::period::{AnalysisPeriod, Period};
use crate::region::RegionSelection;
use crate::series::{AggregateSeries, PeriodSample};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;

/// Everything one analysis run needs, validated up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub region: RegionSelection,
    pub window: AnalysisPeriod,
}

impl AnalysisRequest {
    pub fn new(
        state: &str,
        municipality: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let window = AnalysisPeriod::new(start, end)?;
        let region = RegionSelection::new(state, municipality)?;
        Ok(Self { region, window })
    }
}

/// Parameters of a single per-period round trip.
#[derive(Debug, Clone, Copy)]
pub struct SampleRequest<'a> {
    pub dataset: &'a Dataset,
    pub region: &'a RegionSelection,
    pub window: &'a AnalysisPeriod,
    pub period: Period,
}

/// Anything that can resolve one period to a region mean.
#[allow(async_fn_in_trait)]
pub trait SampleSource {
    async fn sample(&self, request: &SampleRequest<'_>) -> Result<PeriodSample, EarthEngineError>;
}

/// Annual and monthly series of one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSeries {
    pub annual: AggregateSeries,
    pub monthly: AggregateSeries,
}

/// The two independently binned monthly series behind the water balance.
///
/// Months without any source imagery are left out of the corresponding
/// series, so joining on `(year, month)` drops them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterBalanceInputs {
    pub precipitation: AggregateSeries,
    pub evapotranspiration: AggregateSeries,
}

/// Drives the per-period round trips against a [`SampleSource`].
pub struct Aggregator<'a, S> {
    source: &'a S,
}

impl<'a, S: SampleSource> Aggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// One entry per calendar year of the window, ascending.
    pub async fn annual_series(
        &self,
        dataset: &Dataset,
        request: &AnalysisRequest,
    ) -> Result<AggregateSeries, EarthEngineError> {
        self.collect(dataset, request, request.window.years(), true)
            .await
    }

    /// One entry per `(year, month)` of the window, chronological.
    pub async fn monthly_series(
        &self,
        dataset: &Dataset,
        request: &AnalysisRequest,
    ) -> Result<AggregateSeries, EarthEngineError> {
        self.collect(dataset, request, request.window.months(), true)
            .await
    }

    /// Annual then monthly series for a variable page.
    pub async fn variable_series(
        &self,
        dataset: &Dataset,
        request: &AnalysisRequest,
    ) -> Result<VariableSeries, EarthEngineError> {
        let annual = self.annual_series(dataset, request).await?;
        let monthly = self.monthly_series(dataset, request).await?;
        Ok(VariableSeries { annual, monthly })
    }

    /// Monthly precipitation and evapotranspiration for the water balance.
    pub async fn water_balance_inputs(
        &self,
        precipitation: &Dataset,
        evapotranspiration: &Dataset,
        request: &AnalysisRequest,
    ) -> Result<WaterBalanceInputs, EarthEngineError> {
        let months = request.window.months();
        let precipitation = self
            .collect(precipitation, request, months.clone(), false)
            .await?;
        let evapotranspiration = self
            .collect(evapotranspiration, request, months, false)
            .await?;
        Ok(WaterBalanceInputs {
            precipitation,
            evapotranspiration,
        })
    }

    async fn collect(
        &self,
        dataset: &Dataset,
        request: &AnalysisRequest,
        periods: Vec<Period>,
        keep_empty_periods: bool,
    ) -> Result<AggregateSeries, EarthEngineError> {
        info!(
            "Aggregating {} for {} over {} periods",
            dataset.collection,
            request.region.label(),
            periods.len()
        );
        let mut series = AggregateSeries::new(dataset.variable);
        for period in periods {
            let sample = self
                .source
                .sample(&SampleRequest {
                    dataset,
                    region: &request.region,
                    window: &request.window,
                    period,
                })
                .await?;
            debug!(
                "{} {}: {} images, value {:?}",
                dataset.variable, period, sample.image_count, sample.value
            );
            if !sample.has_imagery() && !keep_empty_periods {
                warn!("{} has no {} imagery, leaving it out", period, dataset.collection);
                continue;
            }
            let value = sample.recorded_value();
            if value.is_none() {
                warn!("{} {} is absent", dataset.variable, period);
            }
            series.push(period, value);
        }
        Ok(series)
    }
}
