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
use std::fmt;
use std::str::FromStr;

use crate::token::error::TokenSpecError;

/// Algorithm the token authority signs the issued token with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    RsaSha1,
    RsaSha256,
    RsaSha512,
}

impl SignatureAlgorithm {
    /// XML-DSig algorithm URI.
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::RsaSha1 => "http://www.w3.org/2000/09/xmldsig#rsa-sha1",
            Self::RsaSha256 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
            Self::RsaSha512 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = TokenSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::RsaSha1, Self::RsaSha256, Self::RsaSha512]
            .into_iter()
            .find(|alg| alg.uri() == s)
            .ok_or_else(|| TokenSpecError::UnsupportedSignatureAlgorithm(s.to_string()))
    }
}
