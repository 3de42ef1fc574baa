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
//! # Effective tenant configuration
use async_trait::async_trait;
use chrono::TimeDelta;
use derive_builder::Builder;

use crate::config::sts::{StsSection, TenantSection};
use crate::error::{BuilderError, StsError};

/// Configuration a single tenant STS works with.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(default, setter(into))]
pub struct StsConfiguration {
    /// Tolerated clock difference between the STS and its clients.
    pub clock_tolerance: TimeDelta,
    /// How many times a token may be delegated.
    pub max_delegation_count: u32,
    /// Maximum lifetime of a delegated token.
    pub max_delegation_lifetime: TimeDelta,
    /// How many times a token may be renewed.
    pub max_renew_count: u32,
    /// Lifetime of issued tokens when the request does not ask for one.
    pub default_lifetime: TimeDelta,
    /// Time after which an unfinished negotiation is abandoned.
    pub negotiation_timeout: TimeDelta,
    /// Name of the attribute carrying the subject identity.
    pub identity_attribute: String,
    /// Attributes included into issued tokens.
    pub attribute_names: Vec<String>,
    /// System group whose members may request ActAs tokens.
    pub act_as_group: String,
}

impl Default for StsConfiguration {
    fn default() -> Self {
        Self::from(&StsSection::default())
    }
}

impl From<&StsSection> for StsConfiguration {
    fn from(value: &StsSection) -> Self {
        Self {
            clock_tolerance: value.clock_tolerance,
            max_delegation_count: value.max_delegation_count,
            max_delegation_lifetime: value.max_delegation_lifetime,
            max_renew_count: value.max_renew_count,
            default_lifetime: value.default_lifetime,
            negotiation_timeout: value.negotiation_timeout,
            identity_attribute: value.identity_attribute.clone(),
            attribute_names: value.attribute_names.clone(),
            act_as_group: value.act_as_group.clone(),
        }
    }
}

impl StsConfiguration {
    /// Apply tenant overrides.
    pub fn with_overrides(mut self, overrides: &TenantSection) -> Self {
        if let Some(val) = overrides.clock_tolerance {
            self.clock_tolerance = val;
        }
        if let Some(val) = overrides.max_delegation_count {
            self.max_delegation_count = val;
        }
        if let Some(val) = overrides.max_delegation_lifetime {
            self.max_delegation_lifetime = val;
        }
        if let Some(val) = overrides.max_renew_count {
            self.max_renew_count = val;
        }
        if let Some(val) = overrides.default_lifetime {
            self.default_lifetime = val;
        }
        if let Some(val) = overrides.negotiation_timeout {
            self.negotiation_timeout = val;
        }
        if let Some(val) = &overrides.identity_attribute {
            self.identity_attribute.clone_from(val);
        }
        if let Some(val) = &overrides.attribute_names {
            self.attribute_names.clone_from(val);
        }
        if let Some(val) = &overrides.act_as_group {
            self.act_as_group.clone_from(val);
        }
        self
    }
}

/// Source of the tenant configuration.
///
/// Asked once per request so that configuration changes take effect without
/// rebuilding the STS.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigExtractor: Send + Sync {
    async fn get_config(&self) -> Result<StsConfiguration, StsError>;
}

/// Configuration that never changes.
#[derive(Clone, Debug, Default)]
pub struct StaticConfigExtractor {
    config: StsConfiguration,
}

impl StaticConfigExtractor {
    pub fn new(config: StsConfiguration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigExtractor for StaticConfigExtractor {
    async fn get_config(&self) -> Result<StsConfiguration, StsError> {
        Ok(self.config.clone())
    }
}
