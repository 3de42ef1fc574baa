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
//! Response construction.
use crate::authority::{SignedToken, ValidationOutcome};
use crate::error::StsError;
use crate::request::{
    RequestSecurityTokenResponse, RequestSecurityTokenResponseBuilder, SAML2_TOKEN_TYPE,
    VALIDATE_STATUS_TOKEN_TYPE, ValidateStatus,
};

/// Response carrying an issued or renewed token.
pub(super) fn token_response(
    context: Option<&str>,
    token: SignedToken,
) -> Result<RequestSecurityTokenResponse, StsError> {
    let mut builder = RequestSecurityTokenResponseBuilder::default();
    builder
        .token_type(SAML2_TOKEN_TYPE)
        .key_type(token.confirmation_type)
        .lifetime(token.lifespan)
        .signature_algorithm(token.signature_algorithm)
        .delegatable(token.delegable)
        .renewable(token.renewable)
        .requested_security_token(token.assertion);
    if let Some(context) = context {
        builder.context(context);
    }
    Ok(builder.build()?)
}

/// Response of a validate request.
pub(super) fn validate_response(
    context: Option<&str>,
    outcome: ValidationOutcome,
) -> Result<RequestSecurityTokenResponse, StsError> {
    let status = match outcome {
        ValidationOutcome::Valid => ValidateStatus::Valid,
        ValidationOutcome::Invalid(reason) => ValidateStatus::Invalid(reason),
    };
    let mut builder = RequestSecurityTokenResponseBuilder::default();
    builder
        .token_type(VALIDATE_STATUS_TOKEN_TYPE)
        .status(status);
    if let Some(context) = context {
        builder.context(context);
    }
    Ok(builder.build()?)
}
