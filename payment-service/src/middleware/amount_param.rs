//! `amount` request parameter extractor.
//!
//! The parameter may arrive in the query string or in an urlencoded form
//! body. Query values come before form values and only the first occurrence
//! is bound, even when it is blank. Whitespace inside the value is ignored,
//! and a value that is empty once whitespace is removed counts as missing.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};
use service_core::error::AppError;

use crate::models::Amount;

pub const AMOUNT_PARAM: &str = "amount";

/// The bound `amount` parameter.
#[derive(Debug, Clone, Copy)]
pub struct AmountParam(pub Amount);

#[async_trait]
impl<S> FromRequest<S> for AmountParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut raw = req.uri().query().and_then(first_value);

        if raw.is_none() && is_form(req.headers()) {
            let body = Bytes::from_request(req, state).await.map_err(|e| {
                tracing::warn!("Failed to read form body: {}", e);
                AppError::BadRequest(anyhow::anyhow!("Failed to read request body"))
            })?;
            raw = std::str::from_utf8(&body).ok().and_then(first_value);
        }

        let raw = raw.filter(|value| !value.is_empty()).ok_or_else(|| {
            tracing::warn!("Payment request without amount");
            AppError::BadRequest(anyhow::anyhow!(
                "Required request parameter '{}' is not present",
                AMOUNT_PARAM
            ))
        })?;

        let amount = raw.parse::<Amount>().map_err(|e| {
            tracing::warn!(raw = %raw, "Rejected unparseable amount");
            AppError::BadRequest(anyhow::anyhow!(
                "Invalid value for parameter '{}': {}",
                AMOUNT_PARAM,
                e
            ))
        })?;

        Ok(Self(amount))
    }
}

/// First `amount` in an urlencoded string, with whitespace stripped. May be empty.
fn first_value(encoded: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(encoded).ok()?;

    pairs
        .into_iter()
        .find(|(key, _)| key == AMOUNT_PARAM)
        .map(|(_, value)| value.chars().filter(|c| !c.is_whitespace()).collect())
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}
