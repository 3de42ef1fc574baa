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
//! # Multi tenant STS
//!
//! Entry point of the transport layer. Resolves the tenant STS and forwards
//! the request to it. Signature verification failures are reported as
//! invalid credentials at this boundary.
use tracing::debug;

pub mod cache;

pub use cache::{DefaultStsFactory, StsCache, StsFactory};

use crate::auth::NegotiationSession;
use crate::error::StsError;
use crate::request::{
    ChallengeRequest, ChallengeResponse, Request, RequestSecurityTokenResponse, SecurityHeader,
};

/// STS serving all tenants.
#[derive(Clone)]
pub struct MultiTenantSts {
    cache: StsCache,
}

impl MultiTenantSts {
    pub fn new(cache: StsCache) -> Self {
        Self { cache }
    }

    /// Tenant STS cache.
    pub fn cache(&self) -> &StsCache {
        &self.cache
    }

    pub async fn issue(
        &self,
        tenant: &str,
        request: &Request,
    ) -> Result<RequestSecurityTokenResponse, StsError> {
        let sts = self.cache.get_sts(tenant).await?;
        sts.issue(request).await.map_err(hide_signature_failure)
    }

    pub async fn validate(
        &self,
        tenant: &str,
        request: &Request,
    ) -> Result<RequestSecurityTokenResponse, StsError> {
        let sts = self.cache.get_sts(tenant).await?;
        sts.validate(request).await.map_err(hide_signature_failure)
    }

    pub async fn renew(
        &self,
        tenant: &str,
        request: &Request,
    ) -> Result<RequestSecurityTokenResponse, StsError> {
        let sts = self.cache.get_sts(tenant).await?;
        sts.renew(request).await.map_err(hide_signature_failure)
    }

    pub async fn open_negotiation(
        &self,
        tenant: &str,
        request: Request,
    ) -> Result<(NegotiationSession, ChallengeResponse), StsError> {
        let sts = self.cache.get_sts(tenant).await?;
        sts.open_negotiation(request)
            .await
            .map_err(hide_signature_failure)
    }

    pub async fn challenge(
        &self,
        tenant: &str,
        session: &mut NegotiationSession,
        challenge: &ChallengeRequest,
        header: &SecurityHeader,
    ) -> Result<ChallengeResponse, StsError> {
        let sts = self.cache.get_sts(tenant).await?;
        sts.challenge(session, challenge, header)
            .await
            .map_err(hide_signature_failure)
    }
}

fn hide_signature_failure(err: StsError) -> StsError {
    match err {
        StsError::InvalidSignature(msg) => {
            debug!("Signature verification failed: {}", msg);
            StsError::InvalidCredentials(msg)
        }
        other => other,
    }
}
