//! REST client for the Earth Engine `value:compute` and `maps` endpoints.

use crate::aggregation::{SampleRequest, SampleSource};
use crate::auth::TokenProvider;
use crate::dataset::{Dataset, MAP_STATS_SCALE};
use crate::error::EarthEngineError;
use crate::expression::{self, Node};
use crate::map::{Bounds, MapView, ResultMap, TileLayer, VisParams};
use crate::period::{AnalysisPeriod, Period};
use crate::region::{sorted_names, RegionCatalog, RegionSelection};
use crate::series::PeriodSample;
use crate::settings::Settings;
use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Value};

/// Number of entries in a map legend.
const LEGEND_STOPS: usize = 5;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Turn a non-success response into an [`EarthEngineError::Api`], keeping the
/// service's own message when the body carries one.
pub fn parse_error_body(http_status: u16, body: &str) -> EarthEngineError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => EarthEngineError::Api {
            code: parsed.error.code.unwrap_or(http_status),
            status: parsed.error.status,
            message: parsed.error.message,
        },
        Err(_) => EarthEngineError::Api {
            code: http_status,
            status: String::new(),
            message: body.chars().take(200).collect(),
        },
    }
}

/// Pull `result` out of a `value:compute` response.
pub fn parse_compute_result(body: &str) -> Result<Value, EarthEngineError> {
    let mut parsed: Value = serde_json::from_str(body)?;
    match parsed.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(EarthEngineError::MalformedResponse(
            "response has no result field".to_string(),
        )),
    }
}

pub fn parse_names(result: Value) -> Result<Vec<String>, EarthEngineError> {
    let names: Vec<String> = serde_json::from_value(result)?;
    Ok(sorted_names(names))
}

/// `(min, max)` from a `Reducer.minMax` dictionary; `None` if the region has
/// no valid pixel.
pub fn parse_min_max(result: &Value, band: &str) -> Option<(f64, f64)> {
    let min = result.get(format!("{band}_min"))?.as_f64()?;
    let max = result.get(format!("{band}_max"))?.as_f64()?;
    Some((min, max))
}

#[derive(Debug)]
pub struct EarthEngineClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    api_url: String,
    project: String,
    catalog: RegionCatalog,
}

impl EarthEngineClient {
    pub fn new(settings: &Settings, tokens: TokenProvider, http: reqwest::Client) -> Self {
        Self {
            http,
            tokens,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            project: settings.project.clone(),
            catalog: settings.catalog.clone(),
        }
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    fn project_url(&self, method: &str) -> String {
        format!("{}/projects/{}/{}", self.api_url, self.project, method)
    }

    async fn post(&self, url: &str, body: &Value) -> Result<String, EarthEngineError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &text));
        }
        Ok(text)
    }

    /// Evaluate an expression graph and return its JSON result.
    pub async fn compute_value(&self, node: Node) -> Result<Value, EarthEngineError> {
        let body = json!({ "expression": node.into_expression() });
        let text = self.post(&self.project_url("value:compute"), &body).await?;
        parse_compute_result(&text)
    }

    /// Sorted names of every state.
    pub async fn list_states(&self) -> Result<Vec<String>, EarthEngineError> {
        info!("Listing states from {}", self.catalog.states_asset);
        let result = self
            .compute_value(expression::state_names(&self.catalog))
            .await?;
        parse_names(result)
    }

    /// Sorted names of the municipalities of `state`; empty for an unknown state.
    pub async fn list_municipalities(&self, state: &str) -> Result<Vec<String>, EarthEngineError> {
        info!("Listing municipalities of {}", state);
        let result = self
            .compute_value(expression::municipality_names(&self.catalog, state))
            .await?;
        parse_names(result)
    }

    /// GeoJSON geometry of the selected municipality.
    pub async fn region_geojson(
        &self,
        selection: &RegionSelection,
    ) -> Result<Value, EarthEngineError> {
        let result = self
            .compute_value(expression::region_geometry(&self.catalog, selection))
            .await?;
        if result.is_null() || Bounds::from_geojson(&result).is_none() {
            return Err(EarthEngineError::EmptyResult(selection.label()));
        }
        Ok(result)
    }

    /// Center and zoom framing the selected municipality.
    pub async fn region_view(
        &self,
        selection: &RegionSelection,
    ) -> Result<MapView, EarthEngineError> {
        let geojson = self.region_geojson(selection).await?;
        Bounds::from_geojson(&geojson)
            .map(MapView::fit)
            .ok_or_else(|| EarthEngineError::EmptyResult(selection.label()))
    }

    /// Observed min/max of one period aggregate over the region.
    pub async fn min_max(
        &self,
        dataset: &Dataset,
        selection: &RegionSelection,
        window: &AnalysisPeriod,
        period: &Period,
    ) -> Result<Option<(f64, f64)>, EarthEngineError> {
        let geometry = expression::region_geometry(&self.catalog, selection);
        let node = expression::period_min_max(dataset, window, period, geometry, MAP_STATS_SCALE);
        let result = self.compute_value(node).await?;
        Ok(parse_min_max(&result, &dataset.band))
    }

    /// Register a tile map for one period aggregate, stretched to `vis`.
    pub async fn map_tiles(
        &self,
        dataset: &Dataset,
        selection: &RegionSelection,
        window: &AnalysisPeriod,
        period: &Period,
        vis: &VisParams,
    ) -> Result<TileLayer, EarthEngineError> {
        let geometry = expression::region_geometry(&self.catalog, selection);
        let image = expression::period_map_image(dataset, window, period, geometry);
        let body = json!({
            "expression": image.into_expression(),
            "fileFormat": "AUTO_JPEG_PNG",
            "bandIds": [dataset.band],
            "visualizationOptions": {
                "ranges": [{ "min": vis.min, "max": vis.max }],
                "paletteColors": vis.palette_hex(),
            },
        });
        let text = self.post(&self.project_url("maps"), &body).await?;
        let parsed: Value = serde_json::from_str(&text)?;
        let name = parsed["name"].as_str().ok_or_else(|| {
            EarthEngineError::MalformedResponse("maps response has no name".to_string())
        })?;
        debug!("Registered map {}", name);
        let label = format!("{} {}", dataset.variable.label(), period);
        Ok(TileLayer::from_map_name(&self.api_url, name, &label))
    }

    /// Tiles, stretch, legend and framing for one period of the result map.
    pub async fn result_map(
        &self,
        dataset: &Dataset,
        selection: &RegionSelection,
        window: &AnalysisPeriod,
        period: &Period,
    ) -> Result<ResultMap, EarthEngineError> {
        let view = self.region_view(selection).await?;
        let (min, max) = self
            .min_max(dataset, selection, window, period)
            .await?
            .ok_or_else(|| EarthEngineError::EmptyResult(format!("{} {}", dataset.band, period)))?;
        let vis = VisParams {
            min,
            max,
            palette: dataset.palette.clone(),
        };
        let layer = self
            .map_tiles(dataset, selection, window, period, &vis)
            .await?;
        Ok(ResultMap {
            legend: vis.ramp().legend_stops(LEGEND_STOPS),
            layer,
            vis,
            view,
        })
    }
}

impl SampleSource for EarthEngineClient {
    async fn sample(&self, request: &SampleRequest<'_>) -> Result<PeriodSample, EarthEngineError> {
        let geometry = expression::region_geometry(&self.catalog, request.region);
        let node =
            expression::period_sample(request.dataset, request.window, &request.period, geometry);
        let result = self.compute_value(node).await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_service_message() {
        let body = r#"{"error": {"code": 400, "message": "Collection.loadTable: Table not found", "status": "INVALID_ARGUMENT"}}"#;
        match parse_error_body(400, body) {
            EarthEngineError::Api {
                code,
                status,
                message,
            } => {
                assert_eq!(code, 400);
                assert_eq!(status, "INVALID_ARGUMENT");
                assert!(message.contains("Table not found"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn non_json_error_body_falls_back_to_http_status() {
        let err = parse_error_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "o Earth Engine respondeu 502 : <html>Bad Gateway</html>");
    }

    #[test]
    fn compute_result_is_unwrapped() {
        let result = parse_compute_result(r#"{"result": {"image_count": 31, "value": 212.4}}"#)
            .unwrap();
        let sample: PeriodSample = serde_json::from_value(result).unwrap();
        assert_eq!(sample.image_count, 31);
        assert_eq!(sample.value, Some(212.4));

        assert!(matches!(
            parse_compute_result(r#"{"unexpected": 1}"#),
            Err(EarthEngineError::MalformedResponse(_))
        ));
    }

    #[test]
    fn null_value_means_no_valid_pixels() {
        let result = parse_compute_result(r#"{"result": {"image_count": 4, "value": null}}"#)
            .unwrap();
        let sample: PeriodSample = serde_json::from_value(result).unwrap();
        assert_eq!(sample.recorded_value(), None);
    }

    #[test]
    fn names_are_sorted() {
        let names = parse_names(json!(["Goiás", "Acre", "Bahia"])).unwrap();
        assert_eq!(names, vec!["Acre", "Bahia", "Goiás"]);
        assert!(parse_names(json!([])).unwrap().is_empty());
    }

    #[test]
    fn min_max_uses_band_suffixes() {
        let result = json!({"precipitation_min": 980.5, "precipitation_max": 1710.0});
        assert_eq!(parse_min_max(&result, "precipitation"), Some((980.5, 1710.0)));
        let empty = json!({"precipitation_min": null, "precipitation_max": null});
        assert_eq!(parse_min_max(&empty, "precipitation"), None);
    }
}
