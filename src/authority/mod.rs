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
//! # Token authority
//!
//! Interfaces of the components that sign issued tokens and verify presented
//! ones. Signing keys, XML serialization and signature algorithms live behind
//! these traits.
use async_trait::async_trait;

pub mod error;
pub mod types;

pub use error::{TokenAuthorityError, TokenValidationError};
pub use types::*;

use crate::token::SamlTokenSpec;

/// Produces signed tokens from token specifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenAuthority: Send + Sync {
    /// Issue and sign a token according to `spec`.
    async fn issue_token(&self, spec: &SamlTokenSpec) -> Result<SignedToken, TokenAuthorityError>;
}

/// Verifies tokens presented to the STS.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate `token`.
    ///
    /// A token that fails cryptographic verification is an error; any other
    /// reason for rejection is reported as [`ValidationOutcome::Invalid`].
    async fn validate(
        &self,
        token: &ValidatableToken,
    ) -> Result<ValidationOutcome, TokenValidationError>;
}
