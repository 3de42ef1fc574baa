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
//! STS responses.
use derive_builder::Builder;

use crate::common::TimePeriod;
use crate::error::BuilderError;
use crate::token::{ConfirmationType, SignatureAlgorithm};

/// Token type of issued SAML 2.0 tokens.
pub const SAML2_TOKEN_TYPE: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// Token type of validation responses.
pub const VALIDATE_STATUS_TOKEN_TYPE: &str =
    "http://docs.oasis-open.org/ws-sx/ws-trust/200512/RSTR/Status";

/// Outcome of a validate request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidateStatus {
    Valid,
    /// Carries the reason the token was rejected.
    Invalid(String),
}

impl ValidateStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Valid => "http://docs.oasis-open.org/ws-sx/ws-trust/200512/status/valid",
            Self::Invalid(_) => "http://docs.oasis-open.org/ws-sx/ws-trust/200512/status/invalid",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// `wst:RequestSecurityTokenResponse`.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct RequestSecurityTokenResponse {
    /// Context of the request.
    #[builder(default)]
    pub context: Option<String>,

    pub token_type: String,

    /// Confirmation type of the issued token.
    #[builder(default)]
    pub key_type: Option<ConfirmationType>,

    /// Validity of the issued token.
    #[builder(default)]
    pub lifetime: Option<TimePeriod>,

    #[builder(default)]
    pub signature_algorithm: Option<SignatureAlgorithm>,

    #[builder(default)]
    pub delegatable: bool,

    #[builder(default)]
    pub renewable: bool,

    /// The issued token.
    #[builder(default)]
    pub requested_security_token: Option<String>,

    /// Status of a validate request.
    #[builder(default)]
    pub status: Option<ValidateStatus>,

    /// Final negotiation blob of a completed challenge.
    #[builder(default)]
    pub binary_exchange: Option<String>,
}

/// Follow-up round of a negotiation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChallengeRequest {
    /// Context of the negotiation.
    pub context: String,
    /// Base64 client blob.
    pub binary_exchange: Option<String>,
}

/// Result of a negotiation round.
#[derive(Clone, Debug, PartialEq)]
pub enum ChallengeResponse {
    /// The client must send another blob.
    Continue {
        context: String,
        /// Base64 server blob.
        binary_exchange: String,
    },
    /// Authentication completed and the token was issued.
    Issued(Box<RequestSecurityTokenResponse>),
}
