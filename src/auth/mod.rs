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
//! Authentication of token requests.
//!
//! Every authentication method (password, certificate, assertion, ...) is a
//! separate [`Authenticator`]. [`AuthenticatorChain`] dispatches a request to
//! the first authenticator that supports the credentials it carries.
//! Multi-round methods (Kerberos, NTLM) go through an
//! [`AuthenticationContext`] owned by a [`NegotiationSession`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use thiserror::Error;
use tracing::{debug, warn};

pub mod negotiation;

pub use negotiation::{
    AuthStatus, AuthenticationContext, AuthenticationContextFactory, NegotiationSession,
};

use crate::common::{Certificate, PrincipalId};
use crate::error::BuilderError;
use crate::request::Request;
use crate::token::AuthnMethod;

#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// Authentication failed for a reason unrelated to the credentials.
    #[error("authentication failed: {0}")]
    Failed(String),

    /// Wrong credentials.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Signature of the request or the presented token does not verify.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// No authenticator understands the presented credentials.
    #[error("unsupported security token: {0}")]
    UnsupportedSecurityToken(String),
}

/// Information about successful authentication.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into, strip_option))]
pub struct AuthResult {
    /// Authenticated principal.
    pub principal: PrincipalId,

    /// Authentication method.
    pub authn_method: AuthnMethod,

    /// Authentication instant.
    #[builder(default = "Utc::now()")]
    pub authn_instant: DateTime<Utc>,

    /// Authentication session index.
    #[builder(default)]
    pub session_index: Option<String>,

    /// Certificate the requester proved possession of while authenticating
    /// (i.e. a solution user certificate). Becomes the confirmation key of
    /// the issued token when nothing else is requested.
    #[builder(default)]
    pub holder_certificate: Option<Certificate>,
}

impl AuthResult {
    pub fn builder() -> AuthResultBuilder {
        AuthResultBuilder::default()
    }
}

/// Authentication method.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Whether the request carries credentials this authenticator handles.
    fn supports(&self, request: &Request) -> bool;

    /// Authenticate the requester.
    async fn authenticate(&self, request: &Request) -> Result<AuthResult, AuthenticationError>;
}

/// Dispatches requests to the first supporting authentication method.
#[derive(Clone, Default)]
pub struct AuthenticatorChain {
    methods: Vec<Arc<dyn Authenticator>>,
}

impl AuthenticatorChain {
    pub fn new(methods: Vec<Arc<dyn Authenticator>>) -> Self {
        Self { methods }
    }

    /// Register an additional authentication method.
    pub fn with_method(mut self, method: Arc<dyn Authenticator>) -> Self {
        self.methods.push(method);
        self
    }
}

#[async_trait]
impl Authenticator for AuthenticatorChain {
    fn supports(&self, request: &Request) -> bool {
        self.methods.iter().any(|method| method.supports(request))
    }

    #[tracing::instrument(level = "debug", skip(self, request))]
    async fn authenticate(&self, request: &Request) -> Result<AuthResult, AuthenticationError> {
        let Some(method) = self.methods.iter().find(|method| method.supports(request)) else {
            warn!("No authentication method accepts the presented credentials");
            return Err(AuthenticationError::UnsupportedSecurityToken(
                "the security header carries no supported credentials".into(),
            ));
        };
        let result = method.authenticate(request).await?;
        debug!(
            "Authenticated {} using {:?}",
            result.principal, result.authn_method
        );
        Ok(result)
    }
}
