//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use crate::auth;
use crate::pipeline::RunFailure;
use dioxus::prelude::*;
use std::collections::HashMap;

pub const DEFAULT_START_DATE: &str = "2010-01-01";
pub const DEFAULT_END_DATE: &str = "2020-12-31";

/// Shared state of one dashboard page.
#[derive(Clone, Copy)]
pub struct AppState {
    /// OAuth access token captured from the sign-in redirect
    pub access_token: Signal<Option<String>>,
    /// Sorted state names
    pub states: Signal<Vec<String>>,
    /// Sorted municipality names of the selected state
    pub municipalities: Signal<Vec<String>>,
    /// Municipality lists already fetched this session, by state
    pub municipality_cache: Signal<HashMap<String, Vec<String>>>,
    pub selected_state: Signal<String>,
    pub selected_municipality: Signal<String>,
    /// `YYYY-MM-DD` as typed in the date inputs
    pub start_date: Signal<String>,
    pub end_date: Signal<String>,
    /// Bumped by the run button; every change starts a new analysis
    pub run_requested: Signal<u32>,
    /// True while a catalog lookup or an analysis is in flight
    pub loading: Signal<bool>,
    pub error_msg: Signal<Option<String>>,
    /// Years offered by the result-map selector
    pub map_years: Signal<Vec<i32>>,
    pub selected_year: Signal<Option<i32>>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            access_token: Signal::new(None),
            states: Signal::new(Vec::new()),
            municipalities: Signal::new(Vec::new()),
            municipality_cache: Signal::new(HashMap::new()),
            selected_state: Signal::new(String::new()),
            selected_municipality: Signal::new(String::new()),
            start_date: Signal::new(DEFAULT_START_DATE.to_string()),
            end_date: Signal::new(DEFAULT_END_DATE.to_string()),
            run_requested: Signal::new(0),
            loading: Signal::new(false),
            error_msg: Signal::new(None),
            map_years: Signal::new(Vec::new()),
            selected_year: Signal::new(None),
        }
    }

    /// Show `message` and stop the busy indicator.
    pub fn fail(&mut self, message: String) {
        log::error!("{}", message);
        self.error_msg.set(Some(message));
        self.loading.set(false);
    }

    /// Like [`AppState::fail`]; a rejected token is also forgotten so the
    /// sign-in link shows again.
    pub fn fail_run(&mut self, failure: RunFailure) {
        if failure.signed_out {
            log::warn!("Access token rejected; signing out");
            auth::clear_token();
            self.access_token.set(None);
        }
        self.fail(failure.message);
    }
}
