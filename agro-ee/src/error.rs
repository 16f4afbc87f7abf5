//! Error taxonomy for an analysis run.
//!
//! - [`ValidationError`]: bad user input, reported before any remote call.
//! - [`EarthEngineError`]: a failed remote call; terminal for the current run.
//! - [`AuthError`]: no usable credentials or a failed token exchange.
//!
//! Missing imagery inside an otherwise successful series is not an error; it
//! surfaces as an absent value in the series.

use chrono::NaiveDate;
use thiserror::Error;

/// Input errors detected locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a data inicial ({start}) deve ser anterior à data final ({end})")]
    StartNotBeforeEnd { start: NaiveDate, end: NaiveDate },
    #[error("selecione um estado e um município para prosseguir")]
    NoRegionSelected,
    #[error("mês inválido: {0}")]
    InvalidMonth(u32),
}

/// Errors raised by calls to the Earth Engine service.
#[derive(Debug, Error)]
pub enum EarthEngineError {
    #[error("falha na requisição ao Earth Engine: {0}")]
    Transport(String),
    #[error("o Earth Engine respondeu {code} {status}: {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },
    #[error("resposta inesperada do Earth Engine: {0}")]
    MalformedResponse(String),
    #[error("o Earth Engine não retornou resultado para {0}")]
    EmptyResult(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Credential discovery and token exchange failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("nenhuma credencial do Earth Engine encontrada; defina EE_SERVICE_ACCOUNT_KEY ou execute a autenticação local")]
    NoCredentials,
    #[error("arquivo de credenciais inválido {path}: {reason}")]
    InvalidCredentials { path: String, reason: String },
    #[error("falha na troca do token: {0}")]
    TokenExchange(String),
    #[error("chaves de conta de serviço exigem a feature `service-account`")]
    ServiceAccountUnsupported,
}

impl EarthEngineError {
    /// The credentials were rejected or could not be obtained; signing in
    /// again is the only way forward.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, EarthEngineError::Api { code: 401, .. } | EarthEngineError::Auth(_))
    }
}

impl From<serde_json::Error> for EarthEngineError {
    fn from(e: serde_json::Error) -> Self {
        EarthEngineError::MalformedResponse(e.to_string())
    }
}

#[cfg(feature = "api")]
impl From<reqwest::Error> for EarthEngineError {
    fn from(e: reqwest::Error) -> Self {
        EarthEngineError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        let err = ValidationError::StartNotBeforeEnd {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
        };
        assert!(err.to_string().contains("2020-01-01"));
        assert!(err.to_string().contains("2019-01-01"));
    }

    #[test]
    fn rejected_credentials_are_unauthorized() {
        let expired = EarthEngineError::Api {
            code: 401,
            status: "UNAUTHENTICATED".to_string(),
            message: "Request had invalid authentication credentials.".to_string(),
        };
        assert!(expired.is_unauthorized());
        assert!(EarthEngineError::Auth(AuthError::NoCredentials).is_unauthorized());

        let missing = EarthEngineError::Api {
            code: 404,
            status: "NOT_FOUND".to_string(),
            message: "Asset not found".to_string(),
        };
        assert!(!missing.is_unauthorized());
        assert!(!EarthEngineError::Transport("timeout".to_string()).is_unauthorized());
    }

    #[test]
    fn api_error_includes_status() {
        let err = EarthEngineError::Api {
            code: 404,
            status: "NOT_FOUND".to_string(),
            message: "Asset not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "o Earth Engine respondeu 404 NOT_FOUND: Asset not found"
        );
    }
}
