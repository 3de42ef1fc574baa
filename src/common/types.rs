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
//! # Common types
use std::fmt;
use std::hash::{Hash, Hasher};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Principal identifier (`name@domain`).
///
/// Domains are compared case-insensitively, names exactly.
#[derive(Clone, Debug, Deserialize, Eq, Serialize, Validate)]
pub struct PrincipalId {
    /// Principal name.
    #[validate(length(min = 1))]
    name: String,
    /// Domain the principal belongs to.
    #[validate(length(min = 1))]
    domain: String,
}

impl PrincipalId {
    /// Create a principal id. Both parts must be non-empty.
    pub fn new<N, D>(name: N, domain: D) -> Result<Self, ValidationErrors>
    where
        N: Into<String>,
        D: Into<String>,
    {
        let principal = Self {
            name: name.into(),
            domain: domain.into(),
        };
        principal.validate()?;
        Ok(principal)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// User principal name.
    pub fn upn(&self) -> String {
        format!("{}@{}", self.name, self.domain)
    }
}

impl PartialEq for PrincipalId {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.domain.eq_ignore_ascii_case(&other.domain)
    }
}

impl Hash for PrincipalId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.domain.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.domain)
    }
}

/// The start of a [`TimePeriod`] is not before its end.
#[derive(Debug, Error, PartialEq)]
#[error("start time {start} must be before end time {end}")]
pub struct InvalidTimePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Half-open time interval `[start, end)`. A missing bound is unbounded.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TimePeriod {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TimePeriod {
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, InvalidTimePeriod> {
        if let (Some(start), Some(end)) = (start, end)
            && start >= end
        {
            return Err(InvalidTimePeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Period starting at `start` and lasting `duration`.
    pub fn starting_at(start: DateTime<Utc>, duration: TimeDelta) -> Result<Self, InvalidTimePeriod> {
        Self::new(Some(start), start.checked_add_signed(duration))
    }

    /// Period without bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Whether `instant` lies within `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| start <= instant) && self.end.is_none_or(|end| instant < end)
    }

    /// Widen both ends of the period by `tolerance`.
    ///
    /// A bound that would overflow the representable range becomes unbounded.
    pub fn expand(&self, tolerance: TimeDelta) -> Self {
        Self {
            start: self.start.and_then(|start| start.checked_sub_signed(tolerance)),
            end: self.end.and_then(|end| end.checked_add_signed(tolerance)),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_bound = |bound: Option<DateTime<Utc>>| {
            bound.map_or_else(|| "unbounded".to_string(), |x| x.to_rfc3339())
        };
        write!(f, "[{}, {})", fmt_bound(self.start), fmt_bound(self.end))
    }
}

/// X.509 certificate in DER encoding.
///
/// The STS never parses certificates; it only binds them to tokens.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    pub fn new<D: Into<Vec<u8>>>(der: D) -> Self {
        Self { der: der.into() }
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Certificate")
            .field(&STANDARD.encode(&self.der))
            .finish()
    }
}
