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
//! Authentication statement data.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::common::PrincipalId;
use crate::error::BuilderError;

/// Method used to authenticate the token subject.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum AuthnMethod {
    /// Username and password.
    #[default]
    Password,
    /// Kerberos ticket.
    Kerberos,
    /// XML signature with a certificate.
    XmlDsig,
    /// NTLM negotiation.
    Ntlm,
    /// A previously issued assertion.
    Assertion,
    /// TLS client certificate.
    TlsClient,
    /// Time synchronised one-time token (RSA SecurID).
    TimeSyncToken,
    /// Smartcard.
    Smartcard,
}

/// Who was authenticated, when and how.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct AuthenticationData {
    /// The authenticated principal and subject of the token.
    pub principal: PrincipalId,
    /// Instant of the authentication.
    pub authn_time: DateTime<Utc>,
    /// Authentication method.
    pub authn_method: AuthnMethod,
    /// Name of the attribute carrying the subject identity.
    pub identity_attr_name: String,
    /// Session index of the authentication session.
    #[builder(default)]
    pub session_index: Option<String>,
    /// Expiration of the authentication session.
    #[builder(default)]
    pub session_expires: Option<DateTime<Utc>>,
}
