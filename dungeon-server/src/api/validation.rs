//! Request parsing shared by the handlers
//!
//! Game clients send numbers either as JSON integers or as strings holding
//! an integer, so numeric fields are read from raw `serde_json::Value`s.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::Json;
use serde_json::{Map, Value};
use std::convert::Infallible;

use super::error::ApiError;

pub const PLAYER_ID_HEADER: &str = "x-player-id";
pub const GUEST_PLAYER: &str = "guest";

/// Player the request acts for, from the `x-player-id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerId(pub String);

impl<S> FromRequestParts<S> for PlayerId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(PLAYER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(GUEST_PLAYER);
        Ok(PlayerId(id.to_string()))
    }
}

/// Unwrap a JSON body that must be an object
pub fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Err(ApiError::validation("Request body must be a JSON object.")),
        Err(rejection) => Err(ApiError::validation(format!(
            "Invalid JSON body: {}",
            rejection.body_text()
        ))),
    }
}

/// Unwrap query parameters, turning extractor rejections into JSON errors
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => Err(ApiError::validation(format!(
            "Invalid query string: {}",
            rejection.body_text()
        ))),
    }
}

/// Field that is absent or explicitly `null` counts as missing
pub fn field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

/// Integer from a JSON number or an integer string.
///
/// Floats are accepted only when they have no fractional part.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_non_negative(value: &Value) -> Option<u64> {
    as_int(value).and_then(|n| u64::try_from(n).ok())
}

pub fn as_rooms_cleared(value: &Value) -> Option<u32> {
    as_int(value).and_then(|n| u32::try_from(n).ok())
}

/// `rooms_cleared` query parameter, defaulting to 0
pub fn rooms_cleared_param(raw: Option<&str>) -> Result<u32, ApiError> {
    match raw {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ApiError::validation("rooms_cleared must be a non-negative integer.")),
    }
}
