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
//! WS-Security header contents.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use secrecy::SecretString;

use crate::common::Certificate;
use crate::error::BuilderError;

/// `wsu:Timestamp` of the request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timestamp {
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// `wsse:UsernameToken`.
#[derive(Clone, Debug)]
pub struct UsernameToken {
    pub username: String,
    pub password: Option<SecretString>,
}

/// `wsse:BinarySecurityToken`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinarySecurityToken {
    /// Value type URI (X.509 certificate, GSS token, ...).
    pub value_type: String,
    /// Base64 encoded value.
    pub value: String,
}

/// WS-Security header of the request.
#[derive(Builder, Clone, Debug, Default)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct SecurityHeader {
    /// Request timestamp.
    #[builder(default)]
    pub timestamp: Option<Timestamp>,

    /// Ids of the `ds:Signature` elements present in the header.
    #[builder(default)]
    pub signature_ids: Vec<String>,

    #[builder(default)]
    pub username_token: Option<UsernameToken>,

    #[builder(default)]
    pub binary_security_token: Option<BinarySecurityToken>,
}

impl SecurityHeader {
    /// Whether the header carries a signature with the given id.
    pub fn has_signature(&self, id: &str) -> bool {
        self.signature_ids.iter().any(|x| x == id)
    }
}

/// Where the certificate that signed the request was found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CertificateLocation {
    /// A `wsse:BinarySecurityToken` in the header.
    BinarySecurityToken,
    /// The confirmation key of the assertion in the header.
    Assertion,
}

/// Verified signature of the request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signature {
    /// Certificate the request is signed with.
    pub certificate: Certificate,
    pub location: CertificateLocation,
}
