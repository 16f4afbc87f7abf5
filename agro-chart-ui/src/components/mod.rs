//! Reusable Dioxus RSX components for the dashboard pages.

mod chart_container;
mod chart_header;
mod date_range_picker;
mod error_display;
mod loading_spinner;
mod map_legend;
mod period_selector;
mod region_selector;
mod sign_in;
mod stats_table;
mod variable_dashboard;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use date_range_picker::DateRangePicker;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use map_legend::MapLegend;
pub use period_selector::PeriodSelector;
pub use region_selector::RegionSelector;
pub use sign_in::SignIn;
pub use stats_table::StatsTable;
pub use variable_dashboard::{AnnualChart, VariableDashboard};
