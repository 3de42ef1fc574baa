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
//! # Token specification.
//!
//! The STS never produces token XML itself. It decides *what* the issued
//! token says (subject, lifetime, confirmation key, delegation chain,
//! renewal allowance, audience and advice) and hands that decision to the
//! token authority as a [`SamlTokenSpec`]. All types here are immutable
//! values; invariants are checked at construction.

pub mod error;
pub mod types;

pub use error::TokenSpecError;
pub use types::*;
