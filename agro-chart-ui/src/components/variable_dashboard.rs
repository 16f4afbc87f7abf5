//! The full single-variable page body: form, maps, charts and statistics.

use crate::analysis::{self, OVERVIEW_MAP_ID, RESULT_MAP_ID};
use crate::catalog::use_catalog;
use crate::charts;
use crate::components::{
    ChartContainer, ChartHeader, DateRangePicker, ErrorDisplay, LoadingSpinner, MapLegend,
    PeriodSelector, RegionSelector, SignIn, StatsTable,
};
use crate::js_bridge;
use crate::pipeline;
use crate::state::AppState;
use agro_ee::dataset::{Dataset, Variable};
use agro_utils::numbers::format_optional;
use dioxus::prelude::*;

const ANNUAL_CHART_ID: &str = "annual-chart";
const SEASONAL_CHART_ID: &str = "seasonal-chart";
const MONTHLY_CHART_ID: &str = "monthly-series-chart";
const BOX_PLOT_ID: &str = "annual-box-plot";

/// How the annual values are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnualChart {
    /// Totals, e.g. precipitation
    Bars,
    /// Means, e.g. temperature
    Line,
}

#[derive(Props, Clone, PartialEq)]
pub struct VariableDashboardProps {
    pub variable: Variable,
    pub annual_chart: AnnualChart,
    /// Wording of the extremes summary, e.g. ("Ano mais chuvoso", "Ano mais seco")
    pub highest_label: String,
    pub lowest_label: String,
}

#[component]
pub fn VariableDashboard(props: VariableDashboardProps) -> Element {
    let state = use_context::<AppState>();
    let dataset = Dataset::for_variable(props.variable).unwrap_or_else(Dataset::chirps_daily);

    analysis::use_page_setup(state);
    use_catalog(state);

    let run_dataset = dataset.clone();
    let (context, report) = analysis::use_analysis(state, move |client, request| {
        let dataset = run_dataset.clone();
        async move { pipeline::run_variable(&client, &dataset, &request).await }
    });
    analysis::use_result_map(state, context, dataset);

    let annual_chart = props.annual_chart;
    use_effect(move || {
        let Some(report) = report.read().clone() else {
            for id in [ANNUAL_CHART_ID, SEASONAL_CHART_ID, MONTHLY_CHART_ID, BOX_PLOT_ID] {
                js_bridge::destroy_chart(id);
            }
            return;
        };
        let annual = match annual_chart {
            AnnualChart::Bars => charts::annual_bars(&report),
            AnnualChart::Line => charts::annual_line(&report),
        };
        match annual_chart {
            AnnualChart::Bars => {
                js_bridge::render_bar_chart(ANNUAL_CHART_ID, &annual.data, &annual.config)
            }
            AnnualChart::Line => {
                js_bridge::render_line_chart(ANNUAL_CHART_ID, &annual.data, &annual.config)
            }
        }
        let seasonal = charts::seasonal_bars(&report);
        js_bridge::render_bar_chart(SEASONAL_CHART_ID, &seasonal.data, &seasonal.config);
        let monthly = charts::monthly_series(&report);
        js_bridge::render_line_chart(MONTHLY_CHART_ID, &monthly.data, &monthly.config);
        let spread = charts::annual_box(&report);
        js_bridge::render_box_plot(BOX_PLOT_ID, &spread.data, &spread.config);
    });

    let signed_in = state.access_token.read().is_some();
    let has_outline = context.outline.read().is_some();
    let legend = context.legend.read().clone();
    let current = report.read().clone();
    let unit = props.variable.unit().to_string();
    let extremes = current.as_ref().and_then(|r| r.extremes.clone()).map(|e| {
        (
            format!("{} ({} {})", e.highest.year, format_optional(Some(e.highest.value), 2), unit),
            format!("{} ({} {})", e.lowest.year, format_optional(Some(e.lowest.value), 2), unit),
        )
    });

    rsx! {
        if !signed_in {
            SignIn {}
        }
        RegionSelector {}
        DateRangePicker {}

        if let Some(err) = (state.error_msg)() {
            ErrorDisplay { message: err }
        }
        if (state.loading)() {
            LoadingSpinner {}
        }

        if has_outline {
            ChartHeader { title: "Região de Interesse".to_string() }
            ChartContainer { id: OVERVIEW_MAP_ID.to_string(), min_height: 450 }
        }

        if let Some(report) = current {
            ChartHeader {
                title: format!("Mapa de {} Anual", report.label),
                unit_description: unit.clone(),
            }
            PeriodSelector {}
            ChartContainer { id: RESULT_MAP_ID.to_string(), min_height: 500 }
            MapLegend { stops: legend, unit: unit.clone() }

            p {
                style: "margin: 8px 0; color: #555;",
                "{report.header.region} · {report.header.start} a {report.header.end}"
            }
            ChartContainer { id: ANNUAL_CHART_ID.to_string() }
            ChartContainer { id: SEASONAL_CHART_ID.to_string() }
            ChartContainer { id: MONTHLY_CHART_ID.to_string() }

            ChartHeader { title: format!("Estatísticas Descritivas de {} Anual", report.label) }
            StatsTable { columns: vec![(report.label.clone(), report.annual_stats.clone())] }

            if let Some((highest, lowest)) = extremes {
                p {
                    strong { "{props.highest_label}: " }
                    "{highest}"
                }
                p {
                    strong { "{props.lowest_label}: " }
                    "{lowest}"
                }
            }
            ChartContainer { id: BOX_PLOT_ID.to_string(), min_height: 360 }
        }
    }
}
