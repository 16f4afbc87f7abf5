//! Precipitation dashboard
//!
//! Yearly and monthly rainfall sums over a municipality from CHIRPS daily
//! data, with a per-year rainfall map, seasonal means, a moving-average
//! time series and descriptive statistics of the annual totals.
//!
//! Data flow:
//! 1. The sign-in redirect leaves an Earth Engine access token in the URL.
//! 2. State and municipality lists are looked up once per session.
//! 3. "Executar análise" validates the form and fetches one value per year
//!    and per month, each from its own Earth Engine round trip.
//! 4. The values are tabulated in an in-memory SQLite database and handed
//!    to D3.js and Leaflet.

use agro_chart_ui::components::{AnnualChart, ChartHeader, VariableDashboard};
use agro_chart_ui::state::AppState;
use agro_ee::dataset::Variable;
use dioxus::prelude::*;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("precipitation-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(AppState::new);

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            ChartHeader {
                title: "Análise de Precipitação".to_string(),
                unit_description: "mm, soma das chuvas diárias no período".to_string(),
            }
            p {
                style: "max-width: 860px; color: #444;",
                "A chuva é a principal entrada do ciclo hidrológico. Acompanhar seus totais anuais, "
                "a sazonalidade e os anos extremos ajuda a planejar safras, abastecimento e a "
                "resposta a secas e enchentes. Fonte: CHIRPS diário, resolução de cerca de 5 km."
            }

            VariableDashboard {
                variable: Variable::Precipitation,
                annual_chart: AnnualChart::Bars,
                highest_label: "Ano mais chuvoso".to_string(),
                lowest_label: "Ano mais seco".to_string(),
            }
        }
    }
}
