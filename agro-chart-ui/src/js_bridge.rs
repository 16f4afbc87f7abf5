//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! D3.js chart functions and the Leaflet map live in `assets/js/*.js` and
//! are evaluated as globals once both libraries are present on the page.
//! Data crosses the boundary as JSON text; each wrapper polls until the
//! scripts and its container element are ready, then calls the global.

static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static BAR_CHART_JS: &str = include_str!("../assets/js/bar-chart.js");
static LINE_CHART_JS: &str = include_str!("../assets/js/line-chart.js");
static GROUPED_BAR_CHART_JS: &str = include_str!("../assets/js/grouped-bar-chart.js");
static BOX_PLOT_JS: &str = include_str!("../assets/js/box-plot.js");
static DATA_TABLE_JS: &str = include_str!("../assets/js/data-table.js");
static REGION_MAP_JS: &str = include_str!("../assets/js/region-map.js");

const D3_URL: &str = "https://cdn.jsdelivr.net/npm/d3@7";
const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";

/// Globals promoted to `window` after the chart scripts are evaluated.
const EXPORTED_FUNCTIONS: [&str; 11] = [
    "initTooltip",
    "showTooltip",
    "hideTooltip",
    "renderBarChart",
    "renderLineChart",
    "renderGroupedBarChart",
    "renderBoxPlot",
    "renderDataTable",
    "renderRegionMap",
    "destroyRegionMap",
    "buildLegendControl",
];

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('[agro] JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// A JS string literal holding `text`.
fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script that adds the D3 and Leaflet tags when the host page has not.
fn library_loader_script() -> String {
    format!(
        r#"
        (function() {{
            function addScript(src) {{
                var s = document.createElement('script');
                s.src = src;
                document.head.appendChild(s);
            }}
            if (typeof d3 === 'undefined' && !document.querySelector('script[src={d3}]')) addScript({d3});
            if (typeof L === 'undefined' && !document.querySelector('script[src={ljs}]')) addScript({ljs});
            if (!document.querySelector('link[href={lcss}]')) {{
                var l = document.createElement('link');
                l.rel = 'stylesheet';
                l.href = {lcss};
                document.head.appendChild(l);
            }}
        }})();
        "#,
        d3 = js_string(D3_URL),
        ljs = js_string(LEAFLET_JS_URL),
        lcss = js_string(LEAFLET_CSS_URL),
    )
}

/// Load D3, Leaflet and the chart scripts. Call once at app startup.
///
/// The chart files declare plain `function`s. They are evaluated at global
/// scope through an indirect `eval` once both libraries are loaded, then
/// promoted to `window.*` explicitly.
pub fn init_charts() {
    call_js(&library_loader_script());

    let all_js = [
        TOOLTIP_JS,
        BAR_CHART_JS,
        LINE_CHART_JS,
        GROUPED_BAR_CHART_JS,
        BOX_PLOT_JS,
        DATA_TABLE_JS,
        REGION_MAP_JS,
    ]
    .join("\n");
    let _ = js_sys::eval(&format!("window.__agroChartScripts = {};", js_string(&all_js)));

    let promote = EXPORTED_FUNCTIONS
        .iter()
        .map(|f| format!("if (typeof {f} !== 'undefined') window.{f} = {f};"))
        .collect::<Vec<_>>()
        .join("\n");
    let init_js = format!(
        r#"
        (function() {{
            if (window.__agroChartsReady || window.__agroChartsPending) return;
            window.__agroChartsPending = true;
            var waitForLibs = setInterval(function() {{
                if (typeof d3 !== 'undefined' && typeof L !== 'undefined') {{
                    clearInterval(waitForLibs);
                    (0, eval)(window.__agroChartScripts);
                    delete window.__agroChartScripts;
                    {promote}
                    window.__agroChartsReady = true;
                    console.log('[agro] charts initialized');
                }}
            }}, 100);
        }})();
        "#
    );
    let _ = js_sys::eval(&init_js);
}

/// Script that waits for the charts and `container_id`, then calls
/// `window.<function>(container_id, ...args)` with every argument passed
/// as a JSON string.
fn ready_call_script(function: &str, container_id: &str, args: &[&str]) -> String {
    let id = js_string(container_id);
    let mut call_args = vec![id.clone()];
    call_args.extend(args.iter().map(|a| js_string(a)));
    let call_args = call_args.join(", ");
    format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__agroChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById({id})) {{
                    clearInterval(poll);
                    try {{
                        window.{function}({call_args});
                    }} catch(e) {{ console.error('[agro] {function} error:', e); }}
                }}
            }}, 100);
        }})();
        "#
    )
}

/// Annual totals or means as vertical bars.
pub fn render_bar_chart(container_id: &str, data_json: &str, config_json: &str) {
    call_js(&ready_call_script(
        "renderBarChart",
        container_id,
        &[data_json, config_json],
    ));
}

/// Monthly series with its dashed three-month moving average.
pub fn render_line_chart(container_id: &str, data_json: &str, config_json: &str) {
    call_js(&ready_call_script(
        "renderLineChart",
        container_id,
        &[data_json, config_json],
    ));
}

/// Side-by-side bars per category, one bar per series.
pub fn render_grouped_bar_chart(container_id: &str, data_json: &str, config_json: &str) {
    call_js(&ready_call_script(
        "renderGroupedBarChart",
        container_id,
        &[data_json, config_json],
    ));
}

/// Distribution of one or more value sets as box-and-whisker plots.
pub fn render_box_plot(container_id: &str, data_json: &str, config_json: &str) {
    call_js(&ready_call_script(
        "renderBoxPlot",
        container_id,
        &[data_json, config_json],
    ));
}

/// Sortable data table.
pub fn render_data_table(container_id: &str, data_json: &str, config_json: &str) {
    call_js(&ready_call_script(
        "renderDataTable",
        container_id,
        &[data_json, config_json],
    ));
}

/// Leaflet map over a hybrid basemap.
///
/// `outline_json` is the GeoJSON of the selected region. `layer_json` is
/// either `null` or a serialized result map (tile layer, view and legend).
pub fn render_region_map(container_id: &str, outline_json: &str, layer_json: &str) {
    call_js(&ready_call_script(
        "renderRegionMap",
        container_id,
        &[outline_json, layer_json],
    ));
}

/// Destroy/clean up a chart or map in the given container.
pub fn destroy_chart(container_id: &str) {
    let id = js_string(container_id);
    call_js(&format!(
        "if (window.destroyRegionMap) window.destroyRegionMap({id}); \
         var el = document.getElementById({id}); if (el) el.innerHTML = '';"
    ));
}
