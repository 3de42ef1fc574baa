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
//! Token authority types.
use chrono::{DateTime, Utc};
use derive_builder::Builder;

use crate::common::{PrincipalId, TimePeriod};
use crate::error::BuilderError;
use crate::token::types::{
    Advice, AuthnMethod, Confirmation, ConfirmationType, SignatureAlgorithm, TokenDelegate,
};

/// A token received from a client, parsed by the transport but not yet
/// trusted by the STS.
///
/// It is either the token to validate or renew, the token the requester
/// authenticated with, or the token an ActAs request delegates.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ValidatableToken {
    /// Assertion ID.
    #[builder(default)]
    pub id: String,
    /// Token subject.
    pub subject: PrincipalId,
    /// Issue instant.
    #[builder(default = "Utc::now()")]
    pub issued_at: DateTime<Utc>,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
    /// Subject confirmation.
    #[builder(default)]
    pub confirmation: Confirmation,
    /// Authentication method recorded in the token.
    #[builder(default)]
    pub authn_method: AuthnMethod,
    /// Authentication instant recorded in the token.
    #[builder(default = "Utc::now()")]
    pub authn_time: DateTime<Utc>,
    /// Authentication session index.
    #[builder(default)]
    pub session_index: Option<String>,
    /// Delegates of the token in delegation order.
    #[builder(default)]
    pub delegation_chain: Vec<TokenDelegate>,
    /// Remaining delegations recorded in the token. Tokens that were never
    /// delegated carry none.
    #[builder(default)]
    pub remaining_delegations: Option<u32>,
    /// Whether the token may be delegated.
    #[builder(default)]
    pub delegable: bool,
    /// Whether the token may be renewed.
    #[builder(default)]
    pub renewable: bool,
    /// Remaining renewals recorded in the token.
    #[builder(default)]
    pub remaining_renewals: u32,
    /// Audience restriction.
    #[builder(default)]
    pub audience: Vec<String>,
    /// Advice carried by the token.
    #[builder(default)]
    pub advice: Vec<Advice>,
}

impl ValidatableToken {
    /// The principal currently holding the token: the last delegate of a
    /// delegated token, otherwise the subject.
    pub fn holder(&self) -> &PrincipalId {
        self.delegation_chain
            .last()
            .map_or(&self.subject, |delegate| &delegate.principal)
    }

    pub fn is_bearer(&self) -> bool {
        self.confirmation.r#type() == ConfirmationType::Bearer
    }
}

/// Token produced and signed by the token authority.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct SignedToken {
    /// Serialized, signed assertion.
    pub assertion: String,
    /// Validity of the issued token.
    pub lifespan: TimePeriod,
    /// Confirmation type of the issued token.
    pub confirmation_type: ConfirmationType,
    /// Algorithm used to sign the token.
    pub signature_algorithm: SignatureAlgorithm,
    /// Whether the issued token may be delegated.
    #[builder(default)]
    pub delegable: bool,
    /// Whether the issued token may be renewed.
    #[builder(default)]
    pub renewable: bool,
}

/// Result of validating a token that passed cryptographic verification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationOutcome {
    /// The token is valid.
    Valid,
    /// The token is semantically invalid (expired, not yet valid, wrong
    /// audience, ...). Carries the reason.
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}
