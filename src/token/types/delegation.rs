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
//! Token delegation data.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::PrincipalId;

/// A principal the token was delegated to.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TokenDelegate {
    /// Delegate principal.
    pub principal: PrincipalId,
    /// Instant of the delegation.
    pub delegated_at: DateTime<Utc>,
}

impl TokenDelegate {
    pub fn new(principal: PrincipalId, delegated_at: DateTime<Utc>) -> Self {
        Self {
            principal,
            delegated_at,
        }
    }
}

/// Delegation chain of an ActAs token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegationHistory {
    token_subject: PrincipalId,
    delegates: Vec<TokenDelegate>,
    remaining_delegations: u32,
    delegated_token_expires: DateTime<Utc>,
}

impl DelegationHistory {
    pub fn new(
        token_subject: PrincipalId,
        delegates: Vec<TokenDelegate>,
        remaining_delegations: u32,
        delegated_token_expires: DateTime<Utc>,
    ) -> Self {
        Self {
            token_subject,
            delegates,
            remaining_delegations,
            delegated_token_expires,
        }
    }

    /// Subject of the original token.
    pub fn token_subject(&self) -> &PrincipalId {
        &self.token_subject
    }

    /// Delegates in delegation order, the most recent one last.
    pub fn delegates(&self) -> &[TokenDelegate] {
        &self.delegates
    }

    /// How many further delegations are permitted.
    pub fn remaining_delegations(&self) -> u32 {
        self.remaining_delegations
    }

    pub fn delegated_token_expires(&self) -> DateTime<Utc> {
        self.delegated_token_expires
    }
}

/// Delegation part of a token specification.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DelegationSpec {
    delegate: Option<PrincipalId>,
    delegable: bool,
    history: Option<DelegationHistory>,
}

impl DelegationSpec {
    pub fn new(delegate: Option<PrincipalId>, delegable: bool) -> Self {
        Self {
            delegate,
            delegable,
            history: None,
        }
    }

    pub fn with_history(
        delegate: Option<PrincipalId>,
        delegable: bool,
        history: DelegationHistory,
    ) -> Self {
        Self {
            delegate,
            delegable,
            history: Some(history),
        }
    }

    /// Principal the token is delegated to.
    pub fn delegate(&self) -> Option<&PrincipalId> {
        self.delegate.as_ref()
    }

    /// Whether the issued token may be delegated further.
    pub fn is_delegable(&self) -> bool {
        self.delegable
    }

    pub fn history(&self) -> Option<&DelegationHistory> {
        self.history.as_ref()
    }
}
