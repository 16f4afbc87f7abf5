//! Shared Dioxus components, analysis pipeline and D3.js/Leaflet bridge
//! for the agrometeorological dashboard pages.
//!
//! This crate provides:
//! - `analysis`: hooks running an analysis and its result map
//! - `auth`: browser sign-in and access-token capture
//! - `catalog`: state and municipality lookups as Dioxus hooks
//! - `pipeline`: one analysis run from the form to tabulated reports
//! - `charts`: JSON payloads for the D3.js charts
//! - `js_bridge`: Rust wrappers for the chart and map JS via `js_sys::eval()`
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (selectors, containers, etc.)

pub mod analysis;
pub mod auth;
pub mod catalog;
pub mod charts;
pub mod components;
pub mod js_bridge;
pub mod pipeline;
pub mod state;
