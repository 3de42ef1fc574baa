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
//! Token specification errors.

use thiserror::Error;

use crate::common::InvalidTimePeriod;

/// Invalid argument while building a token specification.
#[derive(Error, Debug)]
pub enum TokenSpecError {
    /// Bearer confirmation with a certificate.
    #[error("bearer confirmation must not carry a certificate")]
    BearerWithCertificate,

    /// Holder-of-key confirmation without a certificate.
    #[error("holder-of-key confirmation requires a certificate")]
    HolderOfKeyWithoutCertificate,

    /// Time period error.
    #[error(transparent)]
    InvalidTimePeriod {
        /// The source of the error.
        #[from]
        source: InvalidTimePeriod,
    },

    /// Unknown signature algorithm URI.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedSignatureAlgorithm(String),

    /// Unknown confirmation or key type URI.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Structure validation error.
    #[error(transparent)]
    Validation {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },
}
