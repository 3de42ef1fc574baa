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

//! # WS-Trust Security Token Service
//!
//! Core of a multi-tenant Security Token Service issuing, validating and
//! renewing SAML tokens, including multi-round negotiated authentication
//! (Kerberos, NTLM).
//!
//! The crate decides *whether* and *what* to issue. Everything around that
//! decision is a collaborator behind a trait:
//!
//! - [`auth::Authenticator`] authenticates the requester (password,
//!   certificate, assertion, ...).
//! - [`authority::TokenAuthority`] serializes and signs the token described
//!   by a [`token::SamlTokenSpec`].
//! - [`authority::TokenValidator`] verifies presented tokens.
//! - [`identity::PrincipalDiscovery`] answers group membership questions.
//! - [`auth::AuthenticationContextFactory`] creates native negotiation
//!   contexts.
//!
//! The transport layer (SOAP/HTTP) parses requests into [`request::Request`]
//! and calls [`multi_tenant::MultiTenantSts`], which lazily constructs one
//! [`sts::SingleTenantSts`] per tenant and shares it between requests.
//!
//! ```ini
//! [sts]
//! clock_tolerance = 600000
//! tenants = vsphere.local
//!
//! [tenant.acme]
//! max_delegation_count = 3
//! ```

pub mod auth;
pub mod authority;
pub mod common;
pub mod config;
pub mod error;
pub mod identity;
pub mod multi_tenant;
pub mod provider;
pub mod request;
pub mod sts;
pub mod token;
