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
//! # Provider manager
//!
//! Bundles the external collaborators an STS works with. Passing the bundle
//! down keeps the STS wiring in one place and allows an easy injection of
//! mocked collaborators.
use std::sync::Arc;

use derive_builder::Builder;

use crate::auth::{AuthenticationContextFactory, Authenticator};
use crate::authority::{TokenAuthority, TokenValidator};
use crate::identity::PrincipalDiscovery;

/// Collaborators of a single tenant STS.
#[derive(Builder, Clone)]
// It is necessary to use the owned pattern since otherwise builder invokes clone which immediately
// confuses mockall used in tests
#[builder(pattern = "owned")]
pub struct Provider {
    /// Authenticates the requester.
    authenticator: Arc<dyn Authenticator>,
    /// Signs issued tokens.
    token_authority: Arc<dyn TokenAuthority>,
    /// Verifies presented tokens.
    token_validator: Arc<dyn TokenValidator>,
    /// Identity store lookups.
    principal_discovery: Arc<dyn PrincipalDiscovery>,
    /// Native negotiation contexts.
    context_factory: Arc<dyn AuthenticationContextFactory>,
}

impl Provider {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        token_authority: Arc<dyn TokenAuthority>,
        token_validator: Arc<dyn TokenValidator>,
        principal_discovery: Arc<dyn PrincipalDiscovery>,
        context_factory: Arc<dyn AuthenticationContextFactory>,
    ) -> Self {
        Self {
            authenticator,
            token_authority,
            token_validator,
            principal_discovery,
            context_factory,
        }
    }

    /// Get the authenticator.
    pub fn get_authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    /// Get the token authority.
    pub fn get_token_authority(&self) -> &dyn TokenAuthority {
        self.token_authority.as_ref()
    }

    /// Get the token validator.
    pub fn get_token_validator(&self) -> Arc<dyn TokenValidator> {
        self.token_validator.clone()
    }

    /// Get the principal discovery.
    pub fn get_principal_discovery(&self) -> Arc<dyn PrincipalDiscovery> {
        self.principal_discovery.clone()
    }

    /// Get the negotiation context factory.
    pub fn get_context_factory(&self) -> &dyn AuthenticationContextFactory {
        self.context_factory.as_ref()
    }
}

#[cfg(test)]
impl Provider {
    pub fn mocked_builder() -> ProviderBuilder {
        let authenticator_mock = crate::auth::MockAuthenticator::default();
        let token_authority_mock = crate::authority::MockTokenAuthority::default();
        let token_validator_mock = crate::authority::MockTokenValidator::default();
        let principal_discovery_mock = crate::identity::MockPrincipalDiscovery::default();
        let context_factory_mock = crate::auth::negotiation::MockAuthenticationContextFactory::default();

        ProviderBuilder::default()
            .authenticator(Arc::new(authenticator_mock))
            .token_authority(Arc::new(token_authority_mock))
            .token_validator(Arc::new(token_validator_mock))
            .principal_discovery(Arc::new(principal_discovery_mock))
            .context_factory(Arc::new(context_factory_mock))
    }
}
