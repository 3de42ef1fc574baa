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
//! # STS configuration file
//!
//! ```ini
//! [sts]
//! clock_tolerance = 600000
//! attribute_names = http://rsa.com/schemas/attr-names/2009/01/UPN,http://rsa.com/schemas/attr-names/2009/01/GroupIdentity
//! tenants = vsphere.local
//!
//! [tenant.acme]
//! max_delegation_count = 3
//! ```
use std::collections::HashMap;
use std::path::PathBuf;

use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use serde::Deserialize;

pub mod common;
pub mod extractor;
pub mod sts;

pub use extractor::{
    ConfigExtractor, StaticConfigExtractor, StsConfiguration, StsConfigurationBuilder,
};
pub use sts::{StsSection, TenantSection};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Defaults of all tenants.
    #[serde(default)]
    pub sts: StsSection,

    /// Tenant specific overrides.
    #[serde(default)]
    pub tenant: HashMap<String, TenantSection>,
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        builder.try_into()
    }

    /// Whether the tenant is served.
    pub fn has_tenant(&self, tenant: &str) -> bool {
        self.tenant_overrides(tenant).is_some()
            || self
                .sts
                .tenants
                .iter()
                .any(|x| x.eq_ignore_ascii_case(tenant))
    }

    /// Effective configuration of a tenant, `None` when the tenant is not
    /// served.
    pub fn tenant_configuration(&self, tenant: &str) -> Option<StsConfiguration> {
        if !self.has_tenant(tenant) {
            return None;
        }
        let config = StsConfiguration::from(&self.sts);
        Some(match self.tenant_overrides(tenant) {
            Some(overrides) => config.with_overrides(overrides),
            None => config,
        })
    }

    fn tenant_overrides(&self, tenant: &str) -> Option<&TenantSection> {
        self.tenant
            .get(tenant)
            .or_else(|| self.tenant.get(&tenant.to_lowercase()))
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let builder = builder.set_default("sts.act_as_group", sts::DEFAULT_ACT_AS_GROUP)?;

        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}
