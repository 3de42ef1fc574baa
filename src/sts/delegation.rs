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
//! # Token delegation
//!
//! A token request may either ask for the issued token to be delegated to
//! another principal (`DelegateTo`) or present a token of someone else that
//! the requester wants to act as (`ActAs`). ActAs extends the delegation
//! chain of the presented token by the requester and consumes one of the
//! remaining delegations.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::authority::ValidatableToken;
use crate::common::PrincipalId;
use crate::config::StsConfiguration;
use crate::error::StsError;
use crate::identity::{PrincipalDiscovery, PrincipalDiscoveryError};
use crate::request::RequestSecurityToken;
use crate::token::{DelegationHistory, DelegationSpec, TokenDelegate};

/// Builds the delegation part of the token specification.
#[derive(Clone)]
pub struct DelegationParser {
    principal_discovery: Arc<dyn PrincipalDiscovery>,
}

impl DelegationParser {
    pub fn new(principal_discovery: Arc<dyn PrincipalDiscovery>) -> Self {
        Self {
            principal_discovery,
        }
    }

    /// ActAs and DelegateTo are mutually exclusive.
    pub fn check_unambiguous(rst: &RequestSecurityToken) -> Result<(), StsError> {
        if rst.act_as.is_some() && rst.delegate_to.is_some() {
            return Err(StsError::RequestFailed(
                "the request is ambiguous: both DelegateTo and ActAs are present".into(),
            ));
        }
        Ok(())
    }

    /// Build the delegation specification of a token issued to `requester`.
    #[tracing::instrument(level = "debug", skip_all, fields(requester = %requester))]
    pub async fn parse(
        &self,
        rst: &RequestSecurityToken,
        requester: &PrincipalId,
        config: &StsConfiguration,
        now: DateTime<Utc>,
    ) -> Result<DelegationSpec, StsError> {
        Self::check_unambiguous(rst)?;

        if let Some(act_as) = &rst.act_as {
            self.check_act_as_permission(requester, &config.act_as_group)
                .await?;
            let history = Self::delegation_history(act_as, requester, config, now)?;
            debug!(
                "{} acts as {} with {} remaining delegations",
                requester,
                history.token_subject(),
                history.remaining_delegations()
            );
            return Ok(DelegationSpec::with_history(
                Some(requester.clone()),
                rst.delegatable,
                history,
            ));
        }

        Ok(DelegationSpec::new(rst.delegate_to.clone(), rst.delegatable))
    }

    async fn check_act_as_permission(
        &self,
        requester: &PrincipalId,
        group: &str,
    ) -> Result<(), StsError> {
        match self
            .principal_discovery
            .is_member_of_system_group(requester, group)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(
                    "{} is not a member of {} and may not act as another principal",
                    requester, group
                );
                Err(StsError::InvalidRequest(format!(
                    "{requester} is not authorized to request ActAs tokens"
                )))
            }
            Err(PrincipalDiscoveryError::InvalidPrincipal(_)) => Err(StsError::InvalidRequest(
                format!("the authenticated principal {requester} is no longer accessible"),
            )),
            Err(err) => Err(err.into()),
        }
    }

    fn delegation_history(
        act_as: &ValidatableToken,
        requester: &PrincipalId,
        config: &StsConfiguration,
        now: DateTime<Utc>,
    ) -> Result<DelegationHistory, StsError> {
        let chain_len = u32::try_from(act_as.delegation_chain.len()).unwrap_or(u32::MAX);
        let by_policy = config.max_delegation_count.saturating_sub(chain_len);
        let available = act_as
            .remaining_delegations
            .map_or(by_policy, |recorded| recorded.min(by_policy));
        let Some(remaining) = available.checked_sub(1) else {
            return Err(StsError::InvalidRequest(format!(
                "the token of {} cannot be delegated any further",
                act_as.subject
            )));
        };

        let delegated_token_expires = now
            .checked_add_signed(config.max_delegation_lifetime)
            .map_or(act_as.expires_at, |limit| limit.min(act_as.expires_at));

        let mut delegates = act_as.delegation_chain.clone();
        delegates.push(TokenDelegate::new(requester.clone(), now));

        Ok(DelegationHistory::new(
            act_as.subject.clone(),
            delegates,
            remaining,
            delegated_token_expires,
        ))
    }
}
