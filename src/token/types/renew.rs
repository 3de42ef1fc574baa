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

/// Renewal part of a token specification.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct RenewSpec {
    /// The issued token may be renewed.
    pub renewable: bool,
    /// The specification is for a renewal of an existing token.
    pub renew: bool,
    /// How many further renewals are permitted.
    pub remaining_renewals: u32,
}

impl RenewSpec {
    pub fn new(renewable: bool, renew: bool, remaining_renewals: u32) -> Self {
        Self {
            renewable,
            renew,
            remaining_renewals,
        }
    }
}
