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
//! # Requests and responses
//!
//! Transport independent representation of WS-Trust messages. The SOAP layer
//! parses the envelope, verifies the WS-Security signature and fills these
//! structures in.
use derive_builder::Builder;

pub mod header;
pub mod response;
pub mod rst;

pub use header::*;
pub use response::*;
pub use rst::*;

use crate::authority::ValidatableToken;
use crate::error::BuilderError;

/// Token request with its security context.
#[derive(Builder, Clone, Debug, Default)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Request {
    /// WS-Security header.
    #[builder(default)]
    pub header: SecurityHeader,

    #[builder(default)]
    pub rst: RequestSecurityToken,

    /// Verified signature of the request, if signed.
    #[builder(default)]
    pub signature: Option<Signature>,

    /// The token to validate or renew, or the token the requester
    /// authenticates with on issue.
    #[builder(default)]
    pub token: Option<ValidatableToken>,
}
