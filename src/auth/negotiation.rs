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
//! Multi-round negotiated authentication (SSPI: Kerberos, NTLM).
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::auth::AuthenticationError;
use crate::common::PrincipalId;
use crate::request::Request;
use crate::token::AuthnMethod;

/// State of an [`AuthenticationContext`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AuthStatus {
    /// No round was processed yet.
    #[default]
    Initial,
    /// The client must send another blob.
    ContinueNeeded,
    /// The principal is authenticated.
    Complete,
    /// The negotiation failed.
    Error,
}

/// Native negotiation context.
///
/// Holds OS resources until [`release`](AuthenticationContext::release) is
/// called.
#[cfg_attr(test, mockall::automock)]
pub trait AuthenticationContext: Send {
    /// Current state.
    fn status(&self) -> AuthStatus;

    /// Process one client blob and return the blob to send back (possibly
    /// empty).
    fn accept(&mut self, token: &[u8]) -> Result<Vec<u8>, AuthenticationError>;

    /// Authenticated principal once the status is [`AuthStatus::Complete`].
    fn principal(&self) -> Option<PrincipalId>;

    /// Negotiated authentication method.
    fn authn_method(&self) -> AuthnMethod;

    /// Free native resources.
    fn release(&mut self);
}

/// Creates native negotiation contexts.
#[cfg_attr(test, mockall::automock)]
pub trait AuthenticationContextFactory: Send + Sync {
    fn create_context(&self) -> Result<Box<dyn AuthenticationContext>, AuthenticationError>;
}

/// Result of feeding one blob into the negotiation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NegotiationRound {
    pub status: AuthStatus,
    pub output: Vec<u8>,
    pub principal: Option<PrincipalId>,
    pub authn_method: AuthnMethod,
}

/// An in-flight negotiated authentication.
///
/// Owned by the caller between rounds, never by the STS. The native context
/// is released exactly once: when the negotiation completes or fails, when
/// the session expires, or when the session is dropped.
pub struct NegotiationSession {
    tenant: String,
    context_id: String,
    started_at: DateTime<Utc>,
    initial_request: Request,
    context: Option<Box<dyn AuthenticationContext>>,
}

impl NegotiationSession {
    pub(crate) fn new<T, C>(
        tenant: T,
        context_id: C,
        initial_request: Request,
        context: Box<dyn AuthenticationContext>,
    ) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        Self {
            tenant: tenant.into(),
            context_id: context_id.into(),
            started_at: Utc::now(),
            initial_request,
            context: Some(context),
        }
    }

    /// Tenant the negotiation was opened for.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// WS-Trust context correlating the rounds.
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Status of the native context, `None` once released.
    pub fn status(&self) -> Option<AuthStatus> {
        self.context.as_ref().map(|context| context.status())
    }

    pub fn is_released(&self) -> bool {
        self.context.is_none()
    }

    /// Whether the session outlived `timeout` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: TimeDelta) -> bool {
        now - self.started_at >= timeout
    }

    /// The request that opened the negotiation.
    pub fn initial_request(&self) -> &Request {
        &self.initial_request
    }

    /// Feed a client blob into the native context.
    pub(crate) fn step(&mut self, token: &[u8]) -> Result<NegotiationRound, AuthenticationError> {
        let Some(context) = self.context.as_mut() else {
            return Err(AuthenticationError::InvalidCredentials(format!(
                "negotiation {} is already closed",
                self.context_id
            )));
        };
        let output = context.accept(token)?;
        let status = context.status();
        let principal = match status {
            AuthStatus::Complete => context.principal(),
            _ => None,
        };
        Ok(NegotiationRound {
            status,
            output,
            principal,
            authn_method: context.authn_method(),
        })
    }

    /// Release the native context. Further calls are no-ops.
    pub fn release(&mut self) {
        if let Some(mut context) = self.context.take() {
            context.release();
            debug!("Released authentication context of negotiation {}", self.context_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_started_at(&mut self, started_at: DateTime<Utc>) {
        self.started_at = started_at;
    }
}

impl Drop for NegotiationSession {
    fn drop(&mut self) {
        self.release();
    }
}
