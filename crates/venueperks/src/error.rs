use crate::config::ConfigError;
use crate::loyalty::money::MoneyError;
use crate::loyalty::service::LoyaltyServiceError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Loyalty(LoyaltyServiceError),
    Money(MoneyError),
    LadderFile(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Loyalty(err) => write!(f, "loyalty error: {}", err),
            AppError::Money(err) => write!(f, "amount error: {}", err),
            AppError::LadderFile(err) => write!(f, "ladder file error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Loyalty(err) => Some(err),
            AppError::Money(err) => Some(err),
            AppError::LadderFile(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Money(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Loyalty(LoyaltyServiceError::UnknownBusiness(_)) => StatusCode::NOT_FOUND,
            AppError::Loyalty(
                LoyaltyServiceError::Amount(_) | LoyaltyServiceError::NegativeReceipt(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Loyalty(LoyaltyServiceError::Directory(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::LadderFile(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<LoyaltyServiceError> for AppError {
    fn from(value: LoyaltyServiceError) -> Self {
        Self::Loyalty(value)
    }
}

impl From<MoneyError> for AppError {
    fn from(value: MoneyError) -> Self {
        Self::Money(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::LadderFile(value)
    }
}
