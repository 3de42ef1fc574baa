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
//! # Tenant STS cache
//!
//! Each tenant STS is constructed lazily on first use and shared by all
//! following requests. Concurrent first requests of a tenant wait for a
//! single construction and receive the same instance.
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::{Config, StaticConfigExtractor};
use crate::error::StsError;
use crate::provider::Provider;
use crate::sts::SingleTenantSts;

/// Creates the STS of a tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StsFactory: Send + Sync {
    /// Construct the STS of `tenant`, [`StsError::NoSuchIdp`] when the tenant
    /// is not served.
    async fn create_sts(&self, tenant: &str) -> Result<SingleTenantSts, StsError>;
}

/// Factory wiring every tenant with the same collaborators and the tenant
/// configuration from the configuration file.
#[derive(Clone)]
pub struct DefaultStsFactory {
    config: Config,
    provider: Provider,
}

impl DefaultStsFactory {
    pub fn new(config: Config, provider: Provider) -> Self {
        Self { config, provider }
    }
}

#[async_trait]
impl StsFactory for DefaultStsFactory {
    async fn create_sts(&self, tenant: &str) -> Result<SingleTenantSts, StsError> {
        let Some(config) = self.config.tenant_configuration(tenant) else {
            return Err(StsError::NoSuchIdp(tenant.to_string()));
        };
        debug!("Creating STS of tenant {}", tenant);
        Ok(SingleTenantSts::new(
            tenant,
            self.provider.clone(),
            Arc::new(StaticConfigExtractor::new(config)),
        ))
    }
}

/// Tenant name to STS cache.
///
/// Tenant names are case insensitive. A construction that fails is not
/// cached and is retried by the next request.
#[derive(Clone)]
pub struct StsCache {
    factory: Arc<dyn StsFactory>,
    entries: Arc<DashMap<String, Arc<OnceCell<Arc<SingleTenantSts>>>>>,
}

impl StsCache {
    pub fn new(factory: Arc<dyn StsFactory>) -> Self {
        Self {
            factory,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Get the STS of `tenant`, constructing it on first use.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_sts(&self, tenant: &str) -> Result<Arc<SingleTenantSts>, StsError> {
        let key = tenant.to_lowercase();
        // The shard lock must not be held across the construction.
        let cell = self.entries.entry(key.clone()).or_default().clone();
        match cell
            .get_or_try_init(|| async {
                self.factory.create_sts(tenant).await.map(Arc::new)
            })
            .await
        {
            Ok(sts) => Ok(sts.clone()),
            Err(err) => {
                self.entries.remove_if(&key, |_, cell| !cell.initialized());
                Err(err)
            }
        }
    }

    /// Number of tenants with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tenant has an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the STS of `tenant` is constructed.
    pub fn contains(&self, tenant: &str) -> bool {
        self.entries
            .get(&tenant.to_lowercase())
            .is_some_and(|cell| cell.initialized())
    }

    /// Drop the STS of `tenant`. Requests in flight keep their instance.
    pub fn evict(&self, tenant: &str) -> bool {
        let evicted = self.entries.remove(&tenant.to_lowercase()).is_some();
        if evicted {
            debug!("Evicted STS of tenant {}", tenant);
        }
        evicted
    }

    /// Drop all tenant STS instances.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
