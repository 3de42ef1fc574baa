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
//! # Single tenant STS
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::auth::{AuthResult, AuthStatus, NegotiationSession};
use crate::authority::ValidationOutcome;
use crate::common::TimePeriod;
use crate::config::{ConfigExtractor, StsConfiguration};
use crate::error::StsError;
use crate::provider::Provider;
use crate::request::{
    ChallengeRequest, ChallengeResponse, Request, RequestSecurityTokenResponse, SecurityHeader,
};
use crate::sts::delegation::DelegationParser;
use crate::sts::response::{token_response, validate_response};
use crate::sts::spec_builder::TokenSpecFactory;

/// Issues, validates and renews tokens of one tenant.
///
/// Keeps no per request state. Negotiations in progress are owned by the
/// caller as [`NegotiationSession`]s.
pub struct SingleTenantSts {
    tenant: String,
    provider: Provider,
    config_extractor: Arc<dyn ConfigExtractor>,
    spec_factory: TokenSpecFactory,
}

impl SingleTenantSts {
    pub fn new<T: Into<String>>(
        tenant: T,
        provider: Provider,
        config_extractor: Arc<dyn ConfigExtractor>,
    ) -> Self {
        let spec_factory = TokenSpecFactory::new(
            DelegationParser::new(provider.get_principal_discovery()),
            provider.get_token_validator(),
        );
        Self {
            tenant: tenant.into(),
            provider,
            config_extractor,
            spec_factory,
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Issue a token to the requester.
    #[tracing::instrument(level = "info", skip_all, fields(tenant = %self.tenant))]
    pub async fn issue(&self, request: &Request) -> Result<RequestSecurityTokenResponse, StsError> {
        let config = self.config_extractor.get_config().await?;
        let now = Utc::now();
        validate_request_lifetime(&request.header, &config, now)?;
        DelegationParser::check_unambiguous(&request.rst)?;
        if request.rst.binary_exchange.is_some() {
            return Err(StsError::RequestFailed(
                "negotiated authentication must be performed with a challenge".into(),
            ));
        }

        let authn = self
            .provider
            .get_authenticator()
            .authenticate(request)
            .await?;
        self.issue_authenticated(request, &authn, &config, now)
            .await
    }

    /// Validate the token carried by the request.
    ///
    /// A token that is not valid is reported in the response status. Only a
    /// token whose signature does not verify is an error.
    #[tracing::instrument(level = "info", skip_all, fields(tenant = %self.tenant))]
    pub async fn validate(
        &self,
        request: &Request,
    ) -> Result<RequestSecurityTokenResponse, StsError> {
        let config = self.config_extractor.get_config().await?;
        validate_request_lifetime(&request.header, &config, Utc::now())?;
        let Some(token) = &request.token else {
            return Err(StsError::RequestFailed(
                "the request carries no token to validate".into(),
            ));
        };

        let outcome = self
            .provider
            .get_token_validator()
            .validate(token)
            .await?;
        if let ValidationOutcome::Invalid(reason) = &outcome {
            info!("Token {} of {} is not valid: {}", token.id, token.subject, reason);
        }
        validate_response(request.rst.context.as_deref(), outcome)
    }

    /// Renew the token carried by the request.
    #[tracing::instrument(level = "info", skip_all, fields(tenant = %self.tenant))]
    pub async fn renew(&self, request: &Request) -> Result<RequestSecurityTokenResponse, StsError> {
        let config = self.config_extractor.get_config().await?;
        let now = Utc::now();
        validate_request_lifetime(&request.header, &config, now)?;
        let Some(token) = &request.token else {
            return Err(StsError::RequestFailed(
                "the request carries no token to renew".into(),
            ));
        };

        let authn = self
            .provider
            .get_authenticator()
            .authenticate(request)
            .await?;
        if authn.principal != token.subject && authn.principal != *token.holder() {
            warn!(
                "{} attempted to renew token {} of {}",
                authn.principal, token.id, token.subject
            );
            return Err(StsError::InvalidRequest(format!(
                "{} may not renew a token of {}",
                authn.principal, token.subject
            )));
        }

        if let ValidationOutcome::Invalid(reason) = self
            .provider
            .get_token_validator()
            .validate(token)
            .await?
        {
            return Err(StsError::UnableToRenew(format!(
                "the token is not valid: {reason}"
            )));
        }
        if !token.renewable {
            return Err(StsError::UnableToRenew("the token is not renewable".into()));
        }
        if token.remaining_renewals == 0 {
            return Err(StsError::UnableToRenew(
                "the token was renewed the maximum number of times".into(),
            ));
        }

        let spec = self.spec_factory.renew_spec(request, token, &config, now)?;
        let signed = self
            .provider
            .get_token_authority()
            .issue_token(&spec)
            .await?;
        debug!(
            "Renewed token {} of {}, {} renewals left",
            token.id,
            token.subject,
            spec.renew_spec().remaining_renewals
        );
        token_response(request.rst.context.as_deref(), signed)
    }

    /// Start a negotiated authentication with the first client blob.
    ///
    /// The returned session must be passed to every following
    /// [`challenge`](Self::challenge). Dropping it abandons the negotiation.
    #[tracing::instrument(level = "info", skip_all, fields(tenant = %self.tenant))]
    pub async fn open_negotiation(
        &self,
        request: Request,
    ) -> Result<(NegotiationSession, ChallengeResponse), StsError> {
        let config = self.config_extractor.get_config().await?;
        let now = Utc::now();
        validate_request_lifetime(&request.header, &config, now)?;
        DelegationParser::check_unambiguous(&request.rst)?;
        let Some(context_id) = request.rst.context.clone().filter(|x| !x.is_empty()) else {
            return Err(StsError::RequestFailed(
                "a negotiation requires a request context".into(),
            ));
        };
        let Some(blob) = request.rst.binary_exchange.clone() else {
            return Err(StsError::InvalidSecurityHeader(
                "the request carries no BinaryExchange".into(),
            ));
        };

        let context = self.provider.get_context_factory().create_context()?;
        let mut session = NegotiationSession::new(self.tenant.clone(), context_id, request, context);
        debug!("Opened negotiation {}", session.context_id());
        let response = self.negotiate(&mut session, &blob, &config, now).await?;
        Ok((session, response))
    }

    /// Process the next round of a negotiation.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(tenant = %self.tenant, context = %challenge.context)
    )]
    pub async fn challenge(
        &self,
        session: &mut NegotiationSession,
        challenge: &ChallengeRequest,
        header: &SecurityHeader,
    ) -> Result<ChallengeResponse, StsError> {
        let config = self.config_extractor.get_config().await?;
        let now = Utc::now();
        validate_request_lifetime(header, &config, now)?;
        if session.tenant() != self.tenant || session.context_id() != challenge.context {
            return Err(StsError::InvalidCredentials(format!(
                "unknown negotiation context {}",
                challenge.context
            )));
        }
        if session.is_expired(now, config.negotiation_timeout) {
            session.release();
            warn!(
                "Negotiation {} started at {} timed out",
                session.context_id(),
                session.started_at()
            );
            return Err(StsError::RequestExpired(format!(
                "negotiation {} timed out",
                challenge.context
            )));
        }
        let Some(blob) = &challenge.binary_exchange else {
            session.release();
            return Err(StsError::InvalidSecurityHeader(
                "the challenge carries no BinaryExchange".into(),
            ));
        };

        self.negotiate(session, blob, &config, now).await
    }

    /// Feed one blob into the session. The session is released when the
    /// negotiation completes or fails.
    async fn negotiate(
        &self,
        session: &mut NegotiationSession,
        blob: &str,
        config: &StsConfiguration,
        now: DateTime<Utc>,
    ) -> Result<ChallengeResponse, StsError> {
        let input = match STANDARD.decode(blob) {
            Ok(input) => input,
            Err(err) => {
                session.release();
                return Err(StsError::InvalidSecurityHeader(format!(
                    "malformed BinaryExchange: {err}"
                )));
            }
        };
        let round = match session.step(&input) {
            Ok(round) => round,
            Err(err) => {
                session.release();
                return Err(err.into());
            }
        };

        match round.status {
            AuthStatus::ContinueNeeded => {
                debug!("Negotiation {} continues", session.context_id());
                Ok(ChallengeResponse::Continue {
                    context: session.context_id().to_string(),
                    binary_exchange: STANDARD.encode(&round.output),
                })
            }
            AuthStatus::Complete => {
                session.release();
                let Some(principal) = round.principal else {
                    return Err(StsError::InvalidCredentials(
                        "the negotiation completed without a principal".into(),
                    ));
                };
                let authn = AuthResult::builder()
                    .principal(principal)
                    .authn_method(round.authn_method)
                    .authn_instant(now)
                    .build()?;
                let request = session.initial_request().clone();
                let mut response = self
                    .issue_authenticated(&request, &authn, config, now)
                    .await?;
                if !round.output.is_empty() {
                    response.binary_exchange = Some(STANDARD.encode(&round.output));
                }
                Ok(ChallengeResponse::Issued(Box::new(response)))
            }
            AuthStatus::Initial | AuthStatus::Error => {
                session.release();
                warn!("Negotiation {} failed", session.context_id());
                Err(StsError::InvalidCredentials(format!(
                    "negotiation {} failed",
                    session.context_id()
                )))
            }
        }
    }

    async fn issue_authenticated(
        &self,
        request: &Request,
        authn: &AuthResult,
        config: &StsConfiguration,
        now: DateTime<Utc>,
    ) -> Result<RequestSecurityTokenResponse, StsError> {
        let spec = self
            .spec_factory
            .issue_spec(request, authn, config, now)
            .await?;
        let token = self
            .provider
            .get_token_authority()
            .issue_token(&spec)
            .await?;
        debug!(
            "Issued {} token to {} valid {}",
            token.confirmation_type, authn.principal, token.lifespan
        );
        token_response(request.rst.context.as_deref(), token)
    }
}

/// The request lifetime widened by the clock tolerance must contain `now`.
fn validate_request_lifetime(
    header: &SecurityHeader,
    config: &StsConfiguration,
    now: DateTime<Utc>,
) -> Result<(), StsError> {
    let Some(timestamp) = header.timestamp else {
        return Err(StsError::InvalidSecurityHeader(
            "the security header carries no timestamp".into(),
        ));
    };
    let lifetime = TimePeriod::new(Some(timestamp.created), Some(timestamp.expires))
        .map_err(|err| StsError::InvalidSecurityHeader(format!("invalid timestamp: {err}")))?;
    if !lifetime.expand(config.clock_tolerance).contains(now) {
        error!(
            "Request lifetime {} does not contain the current time {} with a clock tolerance of {} ms. Check that the clocks of the client and the STS are synchronized.",
            lifetime,
            now.to_rfc3339(),
            config.clock_tolerance.num_milliseconds()
        );
        return Err(StsError::RequestExpired(format!(
            "request lifetime {lifetime} does not contain the current time"
        )));
    }
    Ok(())
}
