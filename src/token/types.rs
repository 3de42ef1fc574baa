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
//! Token specification types.

pub mod advice;
pub mod authentication;
pub mod confirmation;
pub mod delegation;
pub mod renew;
pub mod signature;
pub mod spec;

pub use advice::{Advice, AdviceAttribute};
pub use authentication::{AuthenticationData, AuthenticationDataBuilder, AuthnMethod};
pub use confirmation::{Confirmation, ConfirmationType};
pub use delegation::{DelegationHistory, DelegationSpec, TokenDelegate};
pub use renew::RenewSpec;
pub use signature::SignatureAlgorithm;
pub use spec::{SamlTokenSpec, SamlTokenSpecBuilder};
