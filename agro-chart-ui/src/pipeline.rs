//! One analysis run: validate, query Earth Engine, tabulate.
//!
//! Every function returns a user-facing message on failure; there is no
//! retry and nothing is kept between runs. A failure caused by rejected
//! credentials is flagged so the page can drop the token and offer the
//! sign-in link again.

use crate::auth::PROJECT;
use agro_data::report::{VariableReport, WaterBalanceReport};
use agro_ee::aggregation::{AnalysisRequest, Aggregator};
use agro_ee::auth::TokenProvider;
use agro_ee::client::EarthEngineClient;
use agro_ee::error::EarthEngineError;
use agro_ee::dataset::Dataset;
use agro_ee::map::ResultMap;
use agro_ee::period::Period;
use agro_ee::region::RegionSelection;
use agro_ee::settings::Settings;
use agro_utils::dates::parse_date;
use serde_json::Value;
use std::fmt;

/// A failed step of a run, worded for the error banner.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFailure {
    pub message: String,
    /// The service rejected the access token
    pub signed_out: bool,
}

impl RunFailure {
    fn remote(context: impl fmt::Display, e: EarthEngineError) -> Self {
        let signed_out = e.is_unauthorized();
        let mut message = format!("{context}: {e}");
        if signed_out {
            message.push_str(". A sessão expirou; entre novamente com sua conta Google.");
        }
        Self { message, signed_out }
    }
}

impl From<String> for RunFailure {
    fn from(message: String) -> Self {
        Self {
            message,
            signed_out: false,
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Parse and validate the form; nothing remote happens before this passes.
pub fn build_request(
    state: &str,
    municipality: &str,
    start: &str,
    end: &str,
) -> Result<AnalysisRequest, String> {
    let start = parse_date(start).map_err(|_| format!("data inicial inválida: '{start}'"))?;
    let end = parse_date(end).map_err(|_| format!("data final inválida: '{end}'"))?;
    AnalysisRequest::new(state, municipality, start, end).map_err(|e| e.to_string())
}

/// A client authenticated with the browser's access token.
pub fn client(access_token: &str) -> EarthEngineClient {
    let settings = Settings::default().with_project(PROJECT.unwrap_or_default());
    let http = reqwest::Client::new();
    let tokens = TokenProvider::with_access_token(access_token, http.clone());
    EarthEngineClient::new(&settings, tokens, http)
}

pub async fn load_states(client: &EarthEngineClient) -> Result<Vec<String>, RunFailure> {
    client
        .list_states()
        .await
        .map_err(|e| RunFailure::remote("Falha ao carregar estados", e))
}

pub async fn load_municipalities(
    client: &EarthEngineClient,
    state: &str,
) -> Result<Vec<String>, RunFailure> {
    client
        .list_municipalities(state)
        .await
        .map_err(|e| RunFailure::remote(format!("Falha ao carregar municípios de {state}"), e))
}

/// GeoJSON outline of the selected region.
pub async fn region_outline(
    client: &EarthEngineClient,
    region: &RegionSelection,
) -> Result<Value, RunFailure> {
    client
        .region_geojson(region)
        .await
        .map_err(|e| RunFailure::remote(format!("Falha ao localizar {}", region.label()), e))
}

/// Annual and monthly series of one variable, tabulated.
pub async fn run_variable(
    client: &EarthEngineClient,
    dataset: &Dataset,
    request: &AnalysisRequest,
) -> Result<VariableReport, RunFailure> {
    let series = Aggregator::new(client)
        .variable_series(dataset, request)
        .await
        .map_err(|e| RunFailure::remote("Falha na consulta ao Earth Engine", e))?;
    VariableReport::from_series(&series, request).map_err(|e| RunFailure::from(e.to_string()))
}

/// Monthly precipitation and evapotranspiration joined into a water balance.
pub async fn run_water_balance(
    client: &EarthEngineClient,
    request: &AnalysisRequest,
) -> Result<WaterBalanceReport, RunFailure> {
    let inputs = Aggregator::new(client)
        .water_balance_inputs(
            &Dataset::chirps_pentad(),
            &Dataset::mod16a2_evapotranspiration(),
            request,
        )
        .await
        .map_err(|e| RunFailure::remote("Falha na consulta ao Earth Engine", e))?;
    WaterBalanceReport::from_inputs(&inputs, request).map_err(|e| RunFailure::from(e.to_string()))
}

/// Tiles, stretch and legend for one year of the result map.
pub async fn year_map(
    client: &EarthEngineClient,
    dataset: &Dataset,
    request: &AnalysisRequest,
    year: i32,
) -> Result<ResultMap, RunFailure> {
    client
        .result_map(dataset, &request.region, &request.window, &Period::Year(year))
        .await
        .map_err(|e| RunFailure::remote(format!("Falha ao gerar o mapa de {year}"), e))
}

/// Calendar years offered by the result-map selector.
pub fn map_years(request: &AnalysisRequest) -> Vec<i32> {
    request.window.years().iter().map(|p| p.year()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_validated_locally() {
        let request =
            build_request("Minas Gerais", "Uberlândia", "2015-01-01", "2017-12-31").unwrap();
        assert_eq!(map_years(&request), vec![2015, 2016, 2017]);

        let reversed = build_request("Minas Gerais", "Uberlândia", "2017-01-01", "2015-01-01");
        assert!(reversed.unwrap_err().contains("anterior"));

        let missing = build_request("Minas Gerais", "", "2015-01-01", "2017-01-01");
        assert!(missing.unwrap_err().contains("município"));

        let garbled = build_request("Minas Gerais", "Uberlândia", "01/01/2015", "2017-01-01");
        assert!(garbled.unwrap_err().contains("data inicial"));
    }

    #[test]
    fn rejected_token_signs_the_user_out() {
        let expired = EarthEngineError::Api {
            code: 401,
            status: "UNAUTHENTICATED".to_string(),
            message: "Request had invalid authentication credentials.".to_string(),
        };
        let failure = RunFailure::remote("Falha ao carregar estados", expired);
        assert!(failure.signed_out);
        assert!(failure.message.starts_with("Falha ao carregar estados: "));
        assert!(failure.message.contains("entre novamente"));

        let missing = EarthEngineError::EmptyResult("Uberlândia - Minas Gerais".to_string());
        let failure = RunFailure::remote("Falha ao localizar Uberlândia - Minas Gerais", missing);
        assert!(!failure.signed_out);
        assert!(!failure.message.contains("entre novamente"));

        let local = RunFailure::from("sem dados".to_string());
        assert!(!local.signed_out);
        assert_eq!(local.to_string(), "sem dados");
    }
}
