// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # Error
//!
//! Errors that can occur while the STS processes a request.
use thiserror::Error;

use crate::auth::AuthenticationError;
use crate::authority::{TokenAuthorityError, TokenValidationError};
use crate::identity::error::PrincipalDiscoveryError;
use crate::token::TokenSpecError;

/// STS error.
///
/// Every variant maps to a WS-Trust fault category via [`StsError::fault`].
/// A semantically invalid token presented for validation is not an error: it
/// is reported as [`ValidationOutcome::Invalid`](crate::authority::ValidationOutcome).
#[derive(Debug, Error)]
pub enum StsError {
    /// Authentication failed for a reason other than bad credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Structure builder error.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// The tenant configuration could not be obtained.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The requester could not be authenticated.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The request is syntactically fine but not acceptable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The WS-Security header is missing required elements or is inconsistent.
    #[error("invalid security header: {0}")]
    InvalidSecurityHeader(String),

    /// A signature could not be verified.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The requested token lifetime is not acceptable.
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    /// The tenant is not known.
    #[error("no such identity provider: {0}")]
    NoSuchIdp(String),

    /// Identity store error.
    #[error(transparent)]
    PrincipalDiscovery {
        /// The source of the error.
        #[from]
        source: PrincipalDiscoveryError,
    },

    /// The request lifetime does not contain the current time.
    #[error("request expired: {0}")]
    RequestExpired(String),

    /// The request is malformed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Token specification error.
    #[error(transparent)]
    TokenSpec {
        /// The source of the error.
        #[from]
        source: TokenSpecError,
    },

    /// The token cannot be renewed.
    #[error("unable to renew: {0}")]
    UnableToRenew(String),

    /// The security token used for authentication is not supported.
    #[error("unsupported security token: {0}")]
    UnsupportedSecurityToken(String),
}

impl From<AuthenticationError> for StsError {
    fn from(value: AuthenticationError) -> Self {
        match value {
            AuthenticationError::InvalidCredentials(msg) => Self::InvalidCredentials(msg),
            AuthenticationError::InvalidSignature(msg) => Self::InvalidSignature(msg),
            AuthenticationError::UnsupportedSecurityToken(msg) => {
                Self::UnsupportedSecurityToken(msg)
            }
            AuthenticationError::Failed(msg) => Self::AuthenticationFailed(msg),
        }
    }
}

impl From<TokenAuthorityError> for StsError {
    fn from(value: TokenAuthorityError) -> Self {
        match value {
            TokenAuthorityError::Delegation(msg) => Self::InvalidRequest(msg),
            TokenAuthorityError::Renew(msg) => Self::UnableToRenew(msg),
            TokenAuthorityError::UnsupportedTokenLifetime(msg) => Self::InvalidTimeRange(msg),
        }
    }
}

impl From<TokenValidationError> for StsError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::InvalidSignature(msg) => Self::InvalidSignature(msg),
        }
    }
}

/// WS-Trust / WS-Security fault category of an [`StsError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKey {
    /// `wst:FailedAuthentication`.
    FailedAuthentication,
    /// `wsse:InvalidSecurity`.
    InvalidSecurity,
    /// `wst:InvalidRequest`.
    InvalidRequest,
    /// `wst:InvalidTimeRange`.
    InvalidTimeRange,
    /// `wsse:MessageExpired`.
    MessageExpired,
    /// The tenant does not exist; transports usually answer with "not found".
    NoSuchIdp,
    /// `wst:RequestFailed`.
    RequestFailed,
    /// Receiver side failure.
    ServerError,
    /// `wst:UnableToRenew`.
    UnableToRenew,
    /// `wsse:UnsupportedSecurityToken`.
    UnsupportedSecurityToken,
}

impl FaultKey {
    /// Qualified fault code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FailedAuthentication => "wst:FailedAuthentication",
            Self::InvalidSecurity => "wsse:InvalidSecurity",
            Self::InvalidRequest => "wst:InvalidRequest",
            Self::InvalidTimeRange => "wst:InvalidTimeRange",
            Self::MessageExpired => "wsse:MessageExpired",
            Self::NoSuchIdp => "NoSuchIdP",
            Self::RequestFailed => "wst:RequestFailed",
            Self::ServerError => "Receiver",
            Self::UnableToRenew => "wst:UnableToRenew",
            Self::UnsupportedSecurityToken => "wsse:UnsupportedSecurityToken",
        }
    }
}

impl StsError {
    /// Fault category a transport should report for this error.
    pub fn fault(&self) -> FaultKey {
        match self {
            Self::AuthenticationFailed(_)
            | Self::InvalidCredentials(_)
            | Self::InvalidSignature(_) => FaultKey::FailedAuthentication,
            Self::InvalidSecurityHeader(_) => FaultKey::InvalidSecurity,
            Self::InvalidRequest(_) => FaultKey::InvalidRequest,
            Self::InvalidTimeRange(_) => FaultKey::InvalidTimeRange,
            Self::NoSuchIdp(_) => FaultKey::NoSuchIdp,
            Self::RequestExpired(_) => FaultKey::MessageExpired,
            Self::RequestFailed(_) | Self::TokenSpec { .. } => FaultKey::RequestFailed,
            Self::UnableToRenew(_) => FaultKey::UnableToRenew,
            Self::UnsupportedSecurityToken(_) => FaultKey::UnsupportedSecurityToken,
            Self::Builder { .. } | Self::Configuration(_) | Self::PrincipalDiscovery { .. } => {
                FaultKey::ServerError
            }
        }
    }
}

/// Builder error.
///
/// Returned by the `build()` functions generated with `derive_builder`.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required field was not set.
    #[error("field `{0}` must be initialized")]
    UninitializedField(&'static str),

    /// Custom validation failed.
    #[error("{0}")]
    Validation(String),
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    fn from(value: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(value.field_name())
    }
}

impl From<String> for BuilderError {
    fn from(value: String) -> Self {
        Self::Validation(value)
    }
}
