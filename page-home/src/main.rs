//! Landing page of the agrometeorological dashboard.
//!
//! Describes the application, lists the Earth Engine datasets behind each
//! page and links to the analysis pages. Nothing here talks to Earth Engine.

use agro_ee::dataset::Dataset;
use dioxus::prelude::*;

/// Analysis pages, relative to the landing page.
const PAGES: [(&str, &str, &str); 3] = [
    ("Precipitação", "precipitation/", "Totais anuais e mensais de chuva"),
    ("Temperatura", "temperature/", "Temperatura média da superfície"),
    (
        "Evapotranspiração e Balanço Hídrico",
        "evapotranspiration/",
        "Evapotranspiração e precipitação menos evapotranspiração",
    ),
];

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("home-root"))
        .launch(App);
}

/// One row of the data-source table.
#[derive(Clone, PartialEq)]
struct SourceRow {
    source: String,
    variable: String,
    temporal: &'static str,
    spatial: String,
}

fn source_rows() -> Vec<SourceRow> {
    [
        (Dataset::chirps_daily(), "Diária, agregada por mês e ano"),
        (Dataset::chirps_pentad(), "Pêntadas, agregadas por mês"),
        (Dataset::mod11a2_temperature(), "8 dias, agregada por mês e ano"),
        (Dataset::mod16a2_evapotranspiration(), "8 dias, agregada por mês"),
    ]
    .into_iter()
    .map(|(dataset, temporal)| SourceRow {
        source: dataset.collection.clone(),
        variable: format!("{} ({})", dataset.variable.label(), dataset.variable.unit()),
        temporal,
        spatial: format!("~{} km", dataset.scale / 1000.0),
    })
    .collect()
}

#[component]
fn App() -> Element {
    let rows = source_rows();
    log::info!("Landing page with {} data sources", rows.len());

    rsx! {
        div {
            style: "padding: 16px; max-width: 960px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            h1 { "Monitoramento Climático e Agrícola" }
            p {
                "Visualização e análise de dados agrometeorológicos calculados no Google Earth "
                "Engine para qualquer município brasileiro: mapas por ano, séries anuais e "
                "mensais, média móvel e estatísticas descritivas."
            }

            h2 { "Como usar" }
            ol {
                li { "Escolha uma das páginas de análise abaixo e entre com sua conta Google." }
                li { "Selecione o estado e depois o município." }
                li { "Informe as datas inicial e final e pressione \"Executar análise\"." }
                li { "Troque o ano do mapa para comparar a distribuição espacial entre anos." }
            }

            h2 { "Páginas" }
            ul {
                for (title, href, summary) in PAGES {
                    li {
                        a { href: "{href}", strong { "{title}" } }
                        ": {summary}"
                    }
                }
            }

            h2 { "Fontes de dados" }
            table {
                style: "border-collapse: collapse; font-size: 14px;",
                thead {
                    tr {
                        for label in ["Coleção", "Variável", "Resolução temporal", "Resolução espacial"] {
                            th {
                                style: "text-align: left; padding: 4px 12px; border-bottom: 2px solid #BDBDBD;",
                                "{label}"
                            }
                        }
                    }
                }
                tbody {
                    for row in rows {
                        tr {
                            td { style: "padding: 4px 12px; border-bottom: 1px solid #EEE;", code { "{row.source}" } }
                            td { style: "padding: 4px 12px; border-bottom: 1px solid #EEE;", "{row.variable}" }
                            td { style: "padding: 4px 12px; border-bottom: 1px solid #EEE;", "{row.temporal}" }
                            td { style: "padding: 4px 12px; border-bottom: 1px solid #EEE;", "{row.spatial}" }
                        }
                    }
                }
            }
        }
    }
}
