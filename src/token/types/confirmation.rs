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
//! Subject confirmation of an issued token.
use std::fmt;
use std::str::FromStr;

use crate::common::Certificate;
use crate::token::error::TokenSpecError;

/// How the presenter of a token proves it is entitled to use it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ConfirmationType {
    /// Anyone holding the token may use it.
    #[default]
    Bearer,
    /// The presenter must prove possession of the confirmation key.
    HolderOfKey,
}

impl ConfirmationType {
    pub const BEARER_URI: &'static str = "http://docs.oasis-open.org/ws-sx/ws-trust/200512/Bearer";
    pub const HOLDER_OF_KEY_URI: &'static str = "http://docs.oasis-open.org/ws-sx/ws-trust/200512/PublicKey";

    /// WS-Trust key type URI.
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Bearer => Self::BEARER_URI,
            Self::HolderOfKey => Self::HOLDER_OF_KEY_URI,
        }
    }
}

impl fmt::Display for ConfirmationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

impl FromStr for ConfirmationType {
    type Err = TokenSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::BEARER_URI => Ok(Self::Bearer),
            Self::HOLDER_OF_KEY_URI => Ok(Self::HolderOfKey),
            other => Err(TokenSpecError::UnsupportedKeyType(other.to_string())),
        }
    }
}

/// Subject confirmation data.
///
/// Holder-of-key confirmations always carry a certificate, bearer
/// confirmations never do.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Confirmation {
    r#type: ConfirmationType,
    in_response_to: Option<String>,
    recipient: Option<String>,
    certificate: Option<Certificate>,
}

impl Confirmation {
    pub fn new(
        r#type: ConfirmationType,
        in_response_to: Option<String>,
        recipient: Option<String>,
        certificate: Option<Certificate>,
    ) -> Result<Self, TokenSpecError> {
        match (r#type, &certificate) {
            (ConfirmationType::HolderOfKey, None) => {
                Err(TokenSpecError::HolderOfKeyWithoutCertificate)
            }
            (ConfirmationType::Bearer, Some(_)) => Err(TokenSpecError::BearerWithCertificate),
            _ => Ok(Self {
                r#type,
                in_response_to,
                recipient,
                certificate,
            }),
        }
    }

    /// Bearer confirmation.
    pub fn bearer(in_response_to: Option<String>, recipient: Option<String>) -> Self {
        Self {
            r#type: ConfirmationType::Bearer,
            in_response_to,
            recipient,
            certificate: None,
        }
    }

    /// Holder-of-key confirmation bound to `certificate`.
    pub fn holder_of_key(certificate: Certificate) -> Self {
        Self {
            r#type: ConfirmationType::HolderOfKey,
            in_response_to: None,
            recipient: None,
            certificate: Some(certificate),
        }
    }

    pub fn r#type(&self) -> ConfirmationType {
        self.r#type
    }

    pub fn in_response_to(&self) -> Option<&str> {
        self.in_response_to.as_deref()
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }
}
