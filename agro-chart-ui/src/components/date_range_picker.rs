//! Start/end date inputs with the run button.

use crate::state::AppState;
use dioxus::prelude::*;

/// Date inputs for the analysis window. Nothing runs until the button is
/// pressed; every press starts a fresh analysis.
#[component]
pub fn DateRangePicker() -> Element {
    let mut state = use_context::<AppState>();
    let start = (state.start_date)();
    let end = (state.end_date)();
    let busy = (state.loading)();

    let on_start_change = move |evt: Event<FormData>| {
        state.start_date.set(evt.value());
    };

    let on_end_change = move |evt: Event<FormData>| {
        state.end_date.set(evt.value());
    };

    let on_run = move |_| {
        state.error_msg.set(None);
        *state.run_requested.write() += 1;
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
            label {
                style: "font-weight: bold;",
                "Data inicial: "
                input {
                    r#type: "date",
                    value: "{start}",
                    onchange: on_start_change,
                }
            }
            label {
                style: "font-weight: bold;",
                "Data final: "
                input {
                    r#type: "date",
                    value: "{end}",
                    onchange: on_end_change,
                }
            }
            button {
                disabled: busy,
                style: "padding: 6px 14px; background: #2E7D32; color: white; border: none; border-radius: 4px; cursor: pointer;",
                onclick: on_run,
                "Executar análise"
            }
        }
    }
}
