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
//! # Identity store lookups
//!
//! The STS only needs group membership checks of authenticated principals
//! against the tenant's system groups (e.g. `ActAsUsers`).
use async_trait::async_trait;

pub mod error;

pub use error::PrincipalDiscoveryError;

use crate::common::PrincipalId;

/// Identity store interface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalDiscovery: Send + Sync {
    /// Whether `principal` is a member of the system group `group`.
    async fn is_member_of_system_group<'a>(
        &self,
        principal: &PrincipalId,
        group: &'a str,
    ) -> Result<bool, PrincipalDiscoveryError>;
}
