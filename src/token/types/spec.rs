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
//! SAML token specification.
//!
//! Everything the token authority needs to produce and sign a token.
use std::collections::HashSet;

use crate::common::TimePeriod;
use crate::token::types::{
    Advice, AuthenticationData, Confirmation, DelegationSpec, RenewSpec, SignatureAlgorithm,
};

/// Token specification handed to the token authority.
///
/// Only constructed through [`SamlTokenSpecBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamlTokenSpec {
    lifespan: TimePeriod,
    confirmation: Confirmation,
    authentication_data: AuthenticationData,
    attribute_names: Vec<String>,
    signature_algorithm: Option<SignatureAlgorithm>,
    delegation_spec: DelegationSpec,
    renew_spec: RenewSpec,
    audience: HashSet<String>,
    requested_advice: Vec<Advice>,
    present_advice: Vec<Advice>,
}

impl SamlTokenSpec {
    pub fn lifespan(&self) -> TimePeriod {
        self.lifespan
    }

    pub fn confirmation(&self) -> &Confirmation {
        &self.confirmation
    }

    pub fn authentication_data(&self) -> &AuthenticationData {
        &self.authentication_data
    }

    /// Names of the attributes to include into the token.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Requested signature algorithm; the authority picks one when absent.
    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        self.signature_algorithm
    }

    pub fn delegation_spec(&self) -> &DelegationSpec {
        &self.delegation_spec
    }

    pub fn renew_spec(&self) -> RenewSpec {
        self.renew_spec
    }

    pub fn audience(&self) -> &HashSet<String> {
        &self.audience
    }

    /// Advice requested in the token request.
    pub fn requested_advice(&self) -> &[Advice] {
        &self.requested_advice
    }

    /// Advice already present in the token used for delegation.
    pub fn present_advice(&self) -> &[Advice] {
        &self.present_advice
    }

    /// Whether the authenticated principal is also the subject of the issued
    /// token, i.e. this is not an ActAs delegation on behalf of someone else.
    pub fn requester_is_token_owner(&self) -> bool {
        self.delegation_spec
            .history()
            .is_none_or(|history| *history.token_subject() == self.authentication_data.principal)
    }
}

/// Builder of [`SamlTokenSpec`].
#[derive(Clone, Debug)]
pub struct SamlTokenSpecBuilder {
    spec: SamlTokenSpec,
}

impl SamlTokenSpecBuilder {
    pub fn new<I, S>(
        lifespan: Option<TimePeriod>,
        confirmation: Confirmation,
        authentication_data: AuthenticationData,
        attribute_names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            spec: SamlTokenSpec {
                lifespan: lifespan.unwrap_or_default(),
                confirmation,
                authentication_data,
                attribute_names: attribute_names.into_iter().map(Into::into).collect(),
                signature_algorithm: None,
                delegation_spec: DelegationSpec::default(),
                renew_spec: RenewSpec::default(),
                audience: HashSet::new(),
                requested_advice: Vec::new(),
                present_advice: Vec::new(),
            },
        }
    }

    pub fn signature_algorithm(&mut self, value: SignatureAlgorithm) -> &mut Self {
        self.spec.signature_algorithm = Some(value);
        self
    }

    pub fn delegation_spec(&mut self, value: DelegationSpec) -> &mut Self {
        self.spec.delegation_spec = value;
        self
    }

    pub fn renew_spec(&mut self, value: RenewSpec) -> &mut Self {
        self.spec.renew_spec = value;
        self
    }

    pub fn add_audience<S: Into<String>>(&mut self, value: S) -> &mut Self {
        self.spec.audience.insert(value.into());
        self
    }

    pub fn add_requested_advice(&mut self, value: Advice) -> &mut Self {
        self.spec.requested_advice.push(value);
        self
    }

    pub fn add_present_advice(&mut self, value: Advice) -> &mut Self {
        self.spec.present_advice.push(value);
        self
    }

    /// Snapshot of the current builder state.
    pub fn create_spec(&self) -> SamlTokenSpec {
        self.spec.clone()
    }
}
