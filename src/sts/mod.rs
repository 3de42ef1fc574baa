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
//! # Security token service
//!
//! Request processing of a single tenant:
//!
//! - `issue`: check the request lifetime against the clock tolerance, reject
//!   ambiguous delegation, authenticate the requester, resolve ActAs
//!   delegation, assemble the [`SamlTokenSpec`](crate::token::SamlTokenSpec)
//!   and have the token authority sign it.
//! - `validate`: verify a presented token. Semantic invalidity is reported in
//!   the response status, a signature that does not verify is an error.
//! - `renew`: re-issue a renewable token with one renewal less.
//! - `open_negotiation` / `challenge`: multi-round negotiated
//!   authentication. The [`NegotiationSession`](crate::auth::NegotiationSession)
//!   is owned by the caller between rounds.

pub mod delegation;
pub mod hok;
mod response;
pub mod single_tenant;
pub mod spec_builder;

pub use delegation::DelegationParser;
pub use single_tenant::SingleTenantSts;
pub use spec_builder::TokenSpecFactory;
