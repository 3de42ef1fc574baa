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
//! # STS configuration
//!
//! The `[sts]` section holds the defaults of every tenant, `[tenant.<name>]`
//! sections override them per tenant.
use chrono::TimeDelta;
use serde::Deserialize;

use crate::config::common::*;

/// Name of the system group whose members may request ActAs tokens.
pub const DEFAULT_ACT_AS_GROUP: &str = "ActAsUsers";

/// Default name of the attribute carrying the subject identity.
pub const DEFAULT_IDENTITY_ATTRIBUTE: &str = "http://rsa.com/schemas/attr-names/2009/01/UPN";

/// STS defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct StsSection {
    /// Tenants served in addition to the ones with a `[tenant.<name>]`
    /// section.
    #[serde(default, deserialize_with = "csv")]
    pub tenants: Vec<String>,
    /// Tolerated clock difference between the STS and its clients (in
    /// milliseconds).
    #[serde(
        default = "default_clock_tolerance",
        deserialize_with = "timedelta_from_millis"
    )]
    pub clock_tolerance: TimeDelta,
    /// How many times a token may be delegated.
    #[serde(default = "default_max_delegation_count")]
    pub max_delegation_count: u32,
    /// Maximum lifetime of a delegated token (in seconds).
    #[serde(
        default = "default_max_delegation_lifetime",
        deserialize_with = "timedelta_from_seconds"
    )]
    pub max_delegation_lifetime: TimeDelta,
    /// How many times a token may be renewed.
    #[serde(default = "default_max_renew_count")]
    pub max_renew_count: u32,
    /// Lifetime of issued tokens when the request does not ask for one (in
    /// seconds).
    #[serde(
        default = "default_token_lifetime",
        deserialize_with = "timedelta_from_seconds"
    )]
    pub default_lifetime: TimeDelta,
    /// Time after which an unfinished negotiation is abandoned (in seconds).
    #[serde(
        default = "default_negotiation_timeout",
        deserialize_with = "timedelta_from_seconds"
    )]
    pub negotiation_timeout: TimeDelta,
    /// Name of the attribute carrying the subject identity.
    #[serde(default = "default_identity_attribute")]
    pub identity_attribute: String,
    /// Attributes included into issued tokens.
    #[serde(default, deserialize_with = "csv")]
    pub attribute_names: Vec<String>,
    /// System group whose members may request ActAs tokens.
    #[serde(default = "default_act_as_group")]
    pub act_as_group: String,
}

impl Default for StsSection {
    fn default() -> Self {
        Self {
            tenants: Vec::new(),
            clock_tolerance: default_clock_tolerance(),
            max_delegation_count: default_max_delegation_count(),
            max_delegation_lifetime: default_max_delegation_lifetime(),
            max_renew_count: default_max_renew_count(),
            default_lifetime: default_token_lifetime(),
            negotiation_timeout: default_negotiation_timeout(),
            identity_attribute: default_identity_attribute(),
            attribute_names: Vec::new(),
            act_as_group: default_act_as_group(),
        }
    }
}

/// Per tenant overrides of [`StsSection`].
#[derive(Debug, Default, Deserialize, Clone)]
pub struct TenantSection {
    #[serde(default, deserialize_with = "optional_timedelta_from_millis")]
    pub clock_tolerance: Option<TimeDelta>,
    #[serde(default)]
    pub max_delegation_count: Option<u32>,
    #[serde(default, deserialize_with = "optional_timedelta_from_seconds")]
    pub max_delegation_lifetime: Option<TimeDelta>,
    #[serde(default)]
    pub max_renew_count: Option<u32>,
    #[serde(default, deserialize_with = "optional_timedelta_from_seconds")]
    pub default_lifetime: Option<TimeDelta>,
    #[serde(default, deserialize_with = "optional_timedelta_from_seconds")]
    pub negotiation_timeout: Option<TimeDelta>,
    #[serde(default)]
    pub identity_attribute: Option<String>,
    #[serde(default, deserialize_with = "optional_csv")]
    pub attribute_names: Option<Vec<String>>,
    #[serde(default)]
    pub act_as_group: Option<String>,
}

fn default_clock_tolerance() -> TimeDelta {
    TimeDelta::minutes(10)
}

fn default_max_delegation_count() -> u32 {
    10
}

fn default_max_delegation_lifetime() -> TimeDelta {
    TimeDelta::days(1)
}

fn default_max_renew_count() -> u32 {
    10
}

fn default_token_lifetime() -> TimeDelta {
    TimeDelta::minutes(30)
}

fn default_negotiation_timeout() -> TimeDelta {
    TimeDelta::minutes(5)
}

fn default_identity_attribute() -> String {
    DEFAULT_IDENTITY_ATTRIBUTE.into()
}

fn default_act_as_group() -> String {
    DEFAULT_ACT_AS_GROUP.into()
}
