//! Year selector for the result map.

use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn PeriodSelector() -> Element {
    let mut state = use_context::<AppState>();
    let years = state.map_years.read().clone();
    let selected = (state.selected_year)();

    let on_change = move |evt: Event<FormData>| {
        if let Ok(year) = evt.value().parse::<i32>() {
            state.selected_year.set(Some(year));
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "year-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Ano do mapa: "
            }
            select {
                id: "year-select",
                disabled: years.is_empty(),
                onchange: on_change,
                for year in years.iter() {
                    option {
                        value: "{year}",
                        selected: Some(*year) == selected,
                        "{year}"
                    }
                }
            }
        }
    }
}
