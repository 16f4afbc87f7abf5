//! Container for a D3.js chart or Leaflet map.

use dioxus::prelude::*;

/// Props for ChartContainer
#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// The DOM id the chart renders into
    pub id: String,
    #[props(default = false)]
    pub loading: bool,
    #[props(default = 400)]
    pub min_height: u32,
}

/// A container div for D3.js charts with loading overlay.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; position: relative; width: 100%; margin-bottom: 24px;",
        props.min_height
    );
    let inner_style = format!("width: 100%; height: {}px;", props.min_height);

    rsx! {
        div {
            style: "{style}",
            if props.loading {
                div {
                    style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #666; z-index: 1000;",
                    "Carregando..."
                }
            }
            div {
                id: "{props.id}",
                style: "{inner_style}",
            }
        }
    }
}
