//! Region catalog hooks.
//!
//! States load once a token is available. Municipalities load whenever the
//! selected state changes and are memoized per state for the session.

use crate::pipeline;
use crate::state::AppState;
use dioxus::prelude::*;

/// Keep `states` and `municipalities` in sync with the token and the
/// selected state.
pub fn use_catalog(mut state: AppState) {
    use_effect(move || {
        let Some(token) = (state.access_token)() else {
            return;
        };
        if !state.states.peek().is_empty() {
            return;
        }
        state.loading.set(true);
        spawn(async move {
            match pipeline::load_states(&pipeline::client(&token)).await {
                Ok(states) => {
                    log::info!("Loaded {} states", states.len());
                    state.states.set(states);
                    state.loading.set(false);
                }
                Err(e) => state.fail_run(e),
            }
        });
    });

    use_effect(move || {
        let selected = (state.selected_state)();
        state.selected_municipality.set(String::new());
        if selected.is_empty() {
            state.municipalities.set(Vec::new());
            return;
        }
        if let Some(cached) = state.municipality_cache.peek().get(&selected).cloned() {
            log::debug!("Municipalities of {} served from cache", selected);
            state.municipalities.set(cached);
            return;
        }
        let Some(token) = state.access_token.peek().clone() else {
            return;
        };
        state.loading.set(true);
        spawn(async move {
            let client = pipeline::client(&token);
            match pipeline::load_municipalities(&client, &selected).await {
                Ok(names) => {
                    state
                        .municipality_cache
                        .write()
                        .insert(selected.clone(), names.clone());
                    // the user may have switched state while this was in flight
                    if *state.selected_state.peek() == selected {
                        state.municipalities.set(names);
                    }
                    state.loading.set(false);
                }
                Err(e) => state.fail_run(e),
            }
        });
    });
}
