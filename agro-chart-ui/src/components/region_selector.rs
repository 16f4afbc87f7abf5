//! State and municipality dropdowns.

use crate::state::AppState;
use dioxus::prelude::*;

/// State dropdown followed by the municipality dropdown of that state.
/// The municipality list is filled by the catalog hook.
#[component]
pub fn RegionSelector() -> Element {
    let mut state = use_context::<AppState>();
    let states = state.states.read().clone();
    let municipalities = state.municipalities.read().clone();
    let selected_state = (state.selected_state)();
    let selected_municipality = (state.selected_municipality)();

    let on_state_change = move |evt: Event<FormData>| {
        state.selected_state.set(evt.value());
    };

    let on_municipality_change = move |evt: Event<FormData>| {
        state.selected_municipality.set(evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 16px; flex-wrap: wrap; align-items: center;",
            label {
                r#for: "state-select",
                style: "font-weight: bold;",
                "Estado: "
            }
            select {
                id: "state-select",
                onchange: on_state_change,
                option { value: "", selected: selected_state.is_empty(), "Selecione um estado" }
                for name in states.iter() {
                    option {
                        value: "{name}",
                        selected: *name == selected_state,
                        "{name}"
                    }
                }
            }
            label {
                r#for: "municipality-select",
                style: "font-weight: bold;",
                "Município: "
            }
            select {
                id: "municipality-select",
                disabled: municipalities.is_empty(),
                onchange: on_municipality_change,
                option { value: "", selected: selected_municipality.is_empty(), "Selecione um município" }
                for name in municipalities.iter() {
                    option {
                        value: "{name}",
                        selected: *name == selected_municipality,
                        "{name}"
                    }
                }
            }
        }
    }
}
