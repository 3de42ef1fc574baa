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
//! Token authority errors.

use thiserror::Error;

/// The token authority refused to issue a token for the given specification.
#[derive(Error, Debug)]
pub enum TokenAuthorityError {
    /// The delegation part of the specification is not acceptable.
    #[error("delegation rejected: {0}")]
    Delegation(String),

    /// The renewal part of the specification is not acceptable.
    #[error("renewal rejected: {0}")]
    Renew(String),

    /// The requested lifetime is not acceptable.
    #[error("unsupported token lifetime: {0}")]
    UnsupportedTokenLifetime(String),
}

/// Cryptographic verification of a token failed.
#[derive(Error, Debug)]
pub enum TokenValidationError {
    /// The token signature does not verify against a trusted key.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}
