//! Land-surface temperature dashboard
//!
//! Yearly and monthly means of MODIS MOD11A2 daytime land-surface
//! temperature, converted from scaled Kelvin to °C, with a per-year
//! temperature map whose color ramp is stretched to that year's range.

use agro_chart_ui::components::{AnnualChart, ChartHeader, VariableDashboard};
use agro_chart_ui::state::AppState;
use agro_ee::dataset::Variable;
use dioxus::prelude::*;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("temperature-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(AppState::new);

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            ChartHeader {
                title: "Análise de Temperatura da Superfície".to_string(),
                unit_description: "°C, média das composições de 8 dias".to_string(),
            }
            p {
                style: "max-width: 860px; color: #444;",
                "A temperatura da superfície terrestre influencia a evapotranspiração, o estresse "
                "térmico das culturas e o ciclo das pragas. Fonte: MODIS MOD11A2, banda diurna "
                "LST_Day_1km, resolução de 1 km."
            }

            VariableDashboard {
                variable: Variable::Temperature,
                annual_chart: AnnualChart::Line,
                highest_label: "Ano mais quente".to_string(),
                lowest_label: "Ano mais frio".to_string(),
            }
        }
    }
}
