//! Hooks shared by the analysis pages.
//!
//! A run starts when `run_requested` changes. The form is validated before
//! anything remote happens; the region outline and the page's report are
//! then fetched in one spawned task. The result map follows
//! `selected_year` and is recomputed for every year picked.

use crate::auth;
use crate::js_bridge;
use crate::pipeline::{self, RunFailure};
use crate::state::AppState;
use agro_ee::aggregation::AnalysisRequest;
use agro_ee::client::EarthEngineClient;
use agro_ee::dataset::Dataset;
use agro_ee::map::LegendStop;
use dioxus::prelude::*;
use serde_json::Value;
use std::future::Future;

/// DOM id of the region overview map.
pub const OVERVIEW_MAP_ID: &str = "region-overview-map";
/// DOM id of the per-year result map.
pub const RESULT_MAP_ID: &str = "result-map";

/// What the last successful run produced besides the page's report.
#[derive(Clone, Copy)]
pub struct RunContext {
    pub request: Signal<Option<AnalysisRequest>>,
    pub outline: Signal<Option<Value>>,
    pub legend: Signal<Vec<LegendStop>>,
}

/// Load the chart scripts and pick up the sign-in token once.
pub fn use_page_setup(mut state: AppState) {
    use_effect(move || {
        js_bridge::init_charts();
        if let Some(token) = auth::capture_token() {
            state.access_token.set(Some(token));
        }
    });
}

/// Run `analyze` every time the run button is pressed.
///
/// Returns the run context and the report signal; the report is cleared
/// when a new run starts and only set once every remote call succeeded.
pub fn use_analysis<T, F, Fut>(mut state: AppState, analyze: F) -> (RunContext, Signal<Option<T>>)
where
    T: 'static,
    F: Fn(EarthEngineClient, AnalysisRequest) -> Fut + Clone + 'static,
    Fut: Future<Output = Result<T, RunFailure>> + 'static,
{
    let mut context = RunContext {
        request: use_signal(|| None),
        outline: use_signal(|| None),
        legend: use_signal(Vec::new),
    };
    let mut report = use_signal(|| None::<T>);

    use_effect(move || {
        if (state.run_requested)() == 0 {
            return;
        }
        let Some(token) = state.access_token.peek().clone() else {
            state.fail("Entre com sua conta Google antes de executar a análise.".to_string());
            return;
        };
        let selected_state = state.selected_state.peek().clone();
        let selected_municipality = state.selected_municipality.peek().clone();
        let start = state.start_date.peek().clone();
        let end = state.end_date.peek().clone();
        let request =
            match pipeline::build_request(&selected_state, &selected_municipality, &start, &end) {
                Ok(request) => request,
                Err(e) => {
                    state.fail(e);
                    return;
                }
            };

        report.set(None);
        context.request.set(None);
        context.outline.set(None);
        context.legend.set(Vec::new());
        state.map_years.set(Vec::new());
        state.selected_year.set(None);
        state.error_msg.set(None);
        state.loading.set(true);

        let analyze = analyze.clone();
        spawn(async move {
            log::info!(
                "Analysis of {} from {} to {}",
                request.region.label(),
                start,
                end
            );
            let client = pipeline::client(&token);
            let outline = match pipeline::region_outline(&client, &request.region).await {
                Ok(outline) => outline,
                Err(e) => {
                    state.fail_run(e);
                    return;
                }
            };
            context.outline.set(Some(outline));

            match analyze(client, request.clone()).await {
                Ok(result) => {
                    let years = pipeline::map_years(&request);
                    state.selected_year.set(years.first().copied());
                    state.map_years.set(years);
                    context.request.set(Some(request));
                    report.set(Some(result));
                    state.loading.set(false);
                }
                Err(e) => state.fail_run(e),
            }
        });
    });

    // Overview map of the region as soon as its outline is known
    use_effect(move || {
        let Some(outline) = (context.outline)() else {
            js_bridge::destroy_chart(OVERVIEW_MAP_ID);
            return;
        };
        js_bridge::render_region_map(OVERVIEW_MAP_ID, &outline.to_string(), "null");
    });

    (context, report)
}

/// Render the result map of `dataset` for the selected year; the page shows
/// as busy until the map of the latest pick is drawn.
pub fn use_result_map(mut state: AppState, mut context: RunContext, dataset: Dataset) {
    use_effect(move || {
        let Some(year) = (state.selected_year)() else {
            return;
        };
        let Some(request) = (context.request)() else {
            return;
        };
        let Some(outline) = context.outline.peek().clone() else {
            return;
        };
        let Some(token) = state.access_token.peek().clone() else {
            return;
        };
        let dataset = dataset.clone();
        state.loading.set(true);
        spawn(async move {
            let client = pipeline::client(&token);
            let result = pipeline::year_map(&client, &dataset, &request, year).await;
            // a newer year may have been picked while this was in flight
            if *state.selected_year.peek() != Some(year) {
                return;
            }
            match result {
                Ok(map) => {
                    let layer = serde_json::to_string(&map).unwrap_or_else(|_| "null".to_string());
                    js_bridge::render_region_map(RESULT_MAP_ID, &outline.to_string(), &layer);
                    context.legend.set(map.legend);
                    state.loading.set(false);
                }
                Err(e) => state.fail_run(e),
            }
        });
    });
}
