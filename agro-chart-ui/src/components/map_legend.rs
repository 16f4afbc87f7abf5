//! Color legend for the result map.

use agro_ee::map::LegendStop;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct MapLegendProps {
    pub stops: Vec<LegendStop>,
    pub unit: String,
    #[props(default = 1)]
    pub decimals: usize,
}

/// Horizontal gradient bar labelled with the stop values.
#[component]
pub fn MapLegend(props: MapLegendProps) -> Element {
    if props.stops.is_empty() {
        return rsx! {};
    }
    let gradient = props
        .stops
        .iter()
        .map(|s| s.color.clone())
        .collect::<Vec<_>>()
        .join(", ");
    let bar_style = format!(
        "height: 12px; border-radius: 2px; border: 1px solid #BDBDBD; background: linear-gradient(to right, {gradient});"
    );
    let decimals = props.decimals;

    rsx! {
        div {
            style: "margin: 4px 0 16px 0; max-width: 480px; font-size: 12px;",
            div { style: "{bar_style}" }
            div {
                style: "display: flex; justify-content: space-between; color: #555;",
                for stop in props.stops.iter() {
                    span { {format!("{:.*}", decimals, stop.value)} }
                }
            }
            div { style: "color: #777;", "{props.unit}" }
        }
    }
}
