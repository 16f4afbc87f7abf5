//! Evapotranspiration and water balance dashboard
//!
//! Monthly MODIS MOD16A2GF evapotranspiration is paired with CHIRPS pentad
//! precipitation on the (year, month) key; months missing from either
//! source are left out. The page shows grouped annual and seasonal bars
//! of ET and balance, both monthly series with moving averages,
//! statistics of both, the raw monthly table and a per-year ET map.

use agro_chart_ui::analysis::{self, OVERVIEW_MAP_ID, RESULT_MAP_ID};
use agro_chart_ui::catalog::use_catalog;
use agro_chart_ui::charts;
use agro_chart_ui::components::{
    ChartContainer, ChartHeader, DateRangePicker, ErrorDisplay, LoadingSpinner, MapLegend,
    PeriodSelector, RegionSelector, SignIn, StatsTable,
};
use agro_chart_ui::js_bridge;
use agro_chart_ui::pipeline;
use agro_chart_ui::state::AppState;
use agro_ee::dataset::{Dataset, Variable};
use dioxus::prelude::*;

const ANNUAL_CHART_ID: &str = "water-balance-annual-chart";
const SEASONAL_CHART_ID: &str = "water-balance-seasonal-chart";
const ET_SERIES_ID: &str = "evapotranspiration-series-chart";
const BALANCE_SERIES_ID: &str = "balance-series-chart";
const TABLE_ID: &str = "water-balance-table";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("evapotranspiration-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);

    analysis::use_page_setup(state);
    use_catalog(state);
    let (context, report) = analysis::use_analysis(state, |client, request| async move {
        pipeline::run_water_balance(&client, &request).await
    });
    analysis::use_result_map(state, context, Dataset::mod16a2_evapotranspiration());

    // Redraw every chart when a run completes
    use_effect(move || {
        let Some(report) = report.read().clone() else {
            for id in [
                ANNUAL_CHART_ID,
                SEASONAL_CHART_ID,
                ET_SERIES_ID,
                BALANCE_SERIES_ID,
                TABLE_ID,
            ] {
                js_bridge::destroy_chart(id);
            }
            return;
        };
        if report.rows.is_empty() {
            log::warn!("No month has both precipitation and evapotranspiration");
        }

        let annual = charts::water_balance_annual(&report);
        js_bridge::render_grouped_bar_chart(ANNUAL_CHART_ID, &annual.data, &annual.config);
        let seasonal = charts::water_balance_seasonal(&report);
        js_bridge::render_grouped_bar_chart(SEASONAL_CHART_ID, &seasonal.data, &seasonal.config);
        let et = charts::evapotranspiration_series(&report);
        js_bridge::render_line_chart(ET_SERIES_ID, &et.data, &et.config);
        let balance = charts::balance_series(&report);
        js_bridge::render_line_chart(BALANCE_SERIES_ID, &balance.data, &balance.config);
        let table = charts::water_balance_table(&report);
        js_bridge::render_data_table(TABLE_ID, &table.data, &table.config);
    });

    let signed_in = state.access_token.read().is_some();
    let has_outline = context.outline.read().is_some();
    let legend = context.legend.read().clone();
    let current = report.read().clone();

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            ChartHeader {
                title: "Evapotranspiração e Balanço Hídrico".to_string(),
                unit_description: "mm por mês".to_string(),
            }
            p {
                style: "max-width: 860px; color: #444;",
                "A evapotranspiração é a água devolvida à atmosfera pelo solo e pelas plantas. "
                "Subtraída da precipitação do mesmo mês, indica se houve excedente ou déficit "
                "hídrico. Fontes: MODIS MOD16A2GF (evapotranspiração, 500 m) e CHIRPS pêntadas "
                "(precipitação, cerca de 5 km)."
            }

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
                    title: "Mapa de Evapotranspiração Média".to_string(),
                    unit_description: "mm".to_string(),
                }
                PeriodSelector {}
                ChartContainer { id: RESULT_MAP_ID.to_string(), min_height: 500 }
                MapLegend { stops: legend, unit: "mm".to_string() }

                p {
                    style: "margin: 8px 0; color: #555;",
                    "{report.header.region} · {report.header.start} a {report.header.end}"
                }
                ChartContainer { id: ANNUAL_CHART_ID.to_string() }
                ChartContainer { id: SEASONAL_CHART_ID.to_string() }
                ChartContainer { id: ET_SERIES_ID.to_string() }
                ChartContainer { id: BALANCE_SERIES_ID.to_string() }

                ChartHeader { title: "Estatísticas Descritivas".to_string() }
                StatsTable {
                    columns: vec![
                        (
                            format!("{} (ET)", Variable::Evapotranspiration.label()),
                            report.evapotranspiration_stats.clone(),
                        ),
                        (
                            format!("{} (P-ET)", Variable::WaterBalance.label()),
                            report.balance_stats.clone(),
                        ),
                    ],
                }

                ChartHeader { title: "Tabela de Dados Mensais".to_string() }
                ChartContainer { id: TABLE_ID.to_string(), min_height: 300 }
            }
        }
    }
}
