//! API error handling
//!
//! Domain errors keep their kind on the wire; transport problems get their
//! own codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use heirswitch_core::ContentError;
use heirswitch_ledger::LedgerError;
use heirswitch_types::{ErrorKind, SwitchError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Request Errors (-1000 to -1099)
    // =========================================================================
    #[error("Missing caller identity")]
    MissingCaller,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Switch(#[from] SwitchError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl ApiError {
    pub fn error_code(&self) -> i32 {
        match self {
            // Request (-1000 to -1099)
            Self::MissingCaller => -1001,
            Self::InvalidAddress(_) => -1002,
            Self::InvalidParameter(_) => -1003,
            Self::NotFound(_) => -1004,

            // Switch (-2000 to -2099)
            Self::Switch(err) => match err {
                SwitchError::Unauthorized { .. } => -2001,
                SwitchError::AlreadyActive { .. } => -2010,
                SwitchError::NoActiveSwitch { .. } => -2011,
                SwitchError::SettlementInProgress { .. } => -2012,
                SwitchError::InvalidBeneficiary { .. } => -2020,
                SwitchError::InvalidAmount => -2021,
                SwitchError::InvalidTimeout => -2022,
                SwitchError::InvalidOwner { .. } => -2023,
                SwitchError::NotClaimable { .. } => -2030,
                SwitchError::TransferFailed { .. } => -2040,
            },

            // Ledger (-3000 to -3099)
            Self::Ledger(err) => match err {
                LedgerError::InsufficientBalance { .. } => -3001,
                LedgerError::InsufficientAllowance { .. } => -3002,
                LedgerError::InvalidAmount { .. } => -3003,
                LedgerError::InvalidAccount { .. } => -3004,
                LedgerError::Rejected { .. } => -3005,
            },

            // Content (-4000 to -4099)
            Self::Content(err) => match err {
                ContentError::Empty => -4001,
                ContentError::TooLarge { .. } => -4002,
                ContentError::NotFound { .. } => -4003,
                ContentError::Backend { .. } => -4004,
            },
        }
    }

    /// Error category reported to clients
    pub fn kind(&self) -> String {
        match self {
            Self::Switch(err) => err.kind().to_string(),
            Self::Ledger(_) => "LedgerError".to_string(),
            Self::Content(_) => "ContentError".to_string(),
            Self::MissingCaller
            | Self::InvalidAddress(_)
            | Self::InvalidParameter(_)
            | Self::NotFound(_) => "RequestError".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCaller => StatusCode::UNAUTHORIZED,
            Self::InvalidAddress(_) | Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::Switch(err) => match err.kind() {
                ErrorKind::AuthorizationError => StatusCode::FORBIDDEN,
                ErrorKind::StateError | ErrorKind::NotClaimableError => StatusCode::CONFLICT,
                ErrorKind::PreconditionError => StatusCode::BAD_REQUEST,
                ErrorKind::TransferFailed => StatusCode::PAYMENT_REQUIRED,
            },

            Self::Ledger(err) => match err {
                LedgerError::InvalidAmount { .. } | LedgerError::InvalidAccount { .. } => {
                    StatusCode::BAD_REQUEST
                }
                LedgerError::InsufficientBalance { .. }
                | LedgerError::InsufficientAllowance { .. }
                | LedgerError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            },

            Self::Content(err) => match err {
                ContentError::Empty => StatusCode::BAD_REQUEST,
                ContentError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                ContentError::NotFound { .. } => StatusCode::NOT_FOUND,
                ContentError::Backend { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

/// Error body returned on every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub kind: String,
    pub msg: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.error_code(),
            kind: err.kind(),
            msg: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heirswitch_types::{Address, ClaimRejection};

    #[test]
    fn test_switch_error_status_by_kind() {
        let owner = Address::repeat_byte(1);
        let cases = [
            (SwitchError::AlreadyActive { owner }, StatusCode::CONFLICT),
            (SwitchError::InvalidAmount, StatusCode::BAD_REQUEST),
            (
                SwitchError::NotClaimable {
                    cause: ClaimRejection::Inactive,
                },
                StatusCode::CONFLICT,
            ),
            (
                SwitchError::TransferFailed {
                    reason: "x".into(),
                },
                StatusCode::PAYMENT_REQUIRED,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_not_claimable_hides_cause() {
        let err = ApiError::from(SwitchError::NotClaimable {
            cause: ClaimRejection::NotBeneficiary,
        });
        let body = ErrorResponse::from(&err);
        assert_eq!(body.kind, "NotClaimableError");
        assert_eq!(body.msg, "The switch is not claimable at the moment");
    }

    #[test]
    fn test_request_errors() {
        assert_eq!(ApiError::MissingCaller.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MissingCaller.kind(), "RequestError");
        assert_eq!(
            ApiError::from(ContentError::Empty).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
