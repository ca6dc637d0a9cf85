//! Custom Axum Extractors

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use heirswitch_types::Address;

use crate::error::ApiError;

/// Header carrying the authenticated caller's address
///
/// Set by the gateway in front of this service after it has verified the
/// caller's signature.
pub const CALLER_HEADER: &str = "x-caller-address";

/// Address of the caller making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or(ApiError::MissingCaller)?
            .to_str()
            .map_err(|_| ApiError::InvalidAddress("caller header is not ASCII".to_string()))?;
        parse_address(raw).map(Caller)
    }
}

/// Parse a path or body address, rejecting the zero address
pub fn parse_address(raw: &str) -> Result<Address, ApiError> {
    let address: Address = raw
        .trim()
        .parse()
        .map_err(|e| ApiError::InvalidAddress(format!("{raw}: {e}")))?;
    if address.is_zero() {
        return Err(ApiError::InvalidAddress("zero address".to_string()));
    }
    Ok(address)
}
