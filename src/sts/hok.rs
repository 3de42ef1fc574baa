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
//! # Holder-of-key conditions
//!
//! Decides which certificate, if any, the issued token is bound to. The
//! candidates are the certificate the request is signed with and the
//! certificate the authentication step bound the requester to (the
//! delegate certificate). The request key type, the `UseKey` reference and
//! the confirmation type of the token used to authenticate must agree.
use tracing::debug;

use crate::authority::ValidatableToken;
use crate::common::Certificate;
use crate::error::StsError;
use crate::request::{KeyType, Request};

fn contradictory(reason: &str) -> StsError {
    StsError::InvalidRequest(format!("contradictory holder-of-key conditions: {reason}"))
}

/// Certificate the issued token is confirmed with, `None` for a bearer token.
pub fn signing_certificate(
    request: &Request,
    delegate_certificate: Option<&Certificate>,
    authn_token: Option<&ValidatableToken>,
) -> Result<Option<Certificate>, StsError> {
    let rst = &request.rst;
    let request_certificate = request.signature.as_ref().map(|x| &x.certificate);
    let bearer_authn_token = authn_token.is_some_and(ValidatableToken::is_bearer);

    if let Some(use_key) = &rst.use_key {
        if request_certificate.is_none() {
            return Err(StsError::InvalidSecurityHeader(format!(
                "UseKey references signature {use_key}, but the request is not signed"
            )));
        }
        if !request.header.has_signature(use_key) {
            return Err(StsError::InvalidSecurityHeader(format!(
                "no signature with id {use_key} found in the security header"
            )));
        }
    }

    if rst.key_type == Some(KeyType::Bearer) {
        if delegate_certificate.is_some() || rst.act_as.is_some() {
            return Err(contradictory(
                "a bearer token is requested by a requester bound to a key",
            ));
        }
        debug!("Issuing a bearer token");
        return Ok(None);
    }

    if rst.use_key.is_some() {
        if delegate_certificate.is_some() {
            return Err(contradictory(
                "UseKey is present, but the requester is already bound to a key",
            ));
        }
        if bearer_authn_token {
            return match rst.key_type {
                Some(KeyType::PublicKey) => Err(contradictory(
                    "a holder-of-key token is requested with a bearer token",
                )),
                _ => Ok(None),
            };
        }
        return Ok(request_certificate.cloned());
    }

    if let Some(delegate_certificate) = delegate_certificate {
        if bearer_authn_token {
            return Err(contradictory(
                "the requester is bound to a key, but authenticated with a bearer token",
            ));
        }
        return Ok(Some(delegate_certificate.clone()));
    }

    match rst.key_type {
        Some(KeyType::PublicKey) => match request_certificate {
            Some(certificate) if !bearer_authn_token => Ok(Some(certificate.clone())),
            _ => Err(contradictory(
                "a holder-of-key token is requested, but no signing key is available",
            )),
        },
        _ if bearer_authn_token => Ok(None),
        _ => Ok(request_certificate.cloned()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::authority::ValidatableTokenBuilder;
    use crate::common::PrincipalId;
    use crate::request::{
        CertificateLocation, RequestBuilder, RequestSecurityTokenBuilder, SecurityHeaderBuilder,
        Signature,
    };
    use crate::token::Confirmation;

    const SIGNATURE_ID: &str = "_sig-1";

    fn signing_cert() -> Certificate {
        Certificate::new(b"signing".to_vec())
    }

    fn solution_cert() -> Certificate {
        Certificate::new(b"solution".to_vec())
    }

    fn token(confirmation: Confirmation) -> ValidatableToken {
        ValidatableTokenBuilder::default()
            .subject(PrincipalId::new("user", "example.com").unwrap())
            .expires_at(Utc::now() + TimeDelta::hours(1))
            .confirmation(confirmation)
            .build()
            .unwrap()
    }

    fn bearer_token() -> ValidatableToken {
        token(Confirmation::default())
    }

    fn hok_token() -> ValidatableToken {
        token(Confirmation::holder_of_key(signing_cert()))
    }

    fn request(
        key_type: Option<KeyType>,
        use_key: Option<&str>,
        header_signature: Option<&str>,
        certificate: Option<Certificate>,
    ) -> Request {
        let mut rst = RequestSecurityTokenBuilder::default();
        if let Some(key_type) = key_type {
            rst.key_type(key_type);
        }
        if let Some(use_key) = use_key {
            rst.use_key(use_key);
        }
        let mut header = SecurityHeaderBuilder::default();
        if let Some(id) = header_signature {
            header.signature_ids(vec![id.to_string()]);
        }
        let mut request = RequestBuilder::default();
        request
            .rst(rst.build().unwrap())
            .header(header.build().unwrap());
        if let Some(certificate) = certificate {
            request.signature(Signature {
                certificate,
                location: CertificateLocation::BinarySecurityToken,
            });
        }
        request.build().unwrap()
    }

    fn is_contradictory(res: Result<Option<Certificate>, StsError>) -> bool {
        matches!(res, Err(StsError::InvalidRequest(msg)) if msg.contains("contradictory"))
    }

    #[test]
    fn test_use_key_without_certificate() {
        let req = request(Some(KeyType::Bearer), Some(SIGNATURE_ID), Some(SIGNATURE_ID), None);
        assert!(matches!(
            signing_certificate(&req, None, None),
            Err(StsError::InvalidSecurityHeader(..))
        ));
    }

    #[test]
    fn test_use_key_signature_not_in_header() {
        let cert = Some(signing_cert());
        for header_signature in [None, Some("_other")] {
            let req = request(None, Some(SIGNATURE_ID), header_signature, cert.clone());
            assert!(matches!(
                signing_certificate(&req, None, None),
                Err(StsError::InvalidSecurityHeader(..))
            ));
        }
    }

    #[test]
    fn test_bearer() {
        let req = request(
            Some(KeyType::Bearer),
            Some(SIGNATURE_ID),
            Some(SIGNATURE_ID),
            Some(signing_cert()),
        );
        assert_eq!(None, signing_certificate(&req, None, None).unwrap());

        let req = request(Some(KeyType::Bearer), None, None, Some(signing_cert()));
        assert!(is_contradictory(signing_certificate(
            &req,
            Some(&solution_cert()),
            None
        )));
    }

    #[test]
    fn test_bearer_act_as() {
        let mut req = request(Some(KeyType::Bearer), None, None, None);
        req.rst.act_as = Some(hok_token());
        assert!(is_contradictory(signing_certificate(&req, None, None)));
    }

    #[test]
    fn test_use_key_with_delegate() {
        let req = request(
            Some(KeyType::PublicKey),
            Some(SIGNATURE_ID),
            Some(SIGNATURE_ID),
            Some(signing_cert()),
        );
        assert!(is_contradictory(signing_certificate(
            &req,
            Some(&solution_cert()),
            None
        )));
    }

    #[test]
    fn test_no_key_type_with_use_key() {
        let req = request(None, Some(SIGNATURE_ID), Some(SIGNATURE_ID), Some(signing_cert()));
        assert_eq!(
            Some(signing_cert()),
            signing_certificate(&req, None, None).unwrap()
        );
        assert_eq!(
            None,
            signing_certificate(&req, None, Some(&bearer_token())).unwrap()
        );
        assert_eq!(
            Some(signing_cert()),
            signing_certificate(&req, None, Some(&hok_token())).unwrap()
        );
    }

    #[test]
    fn test_no_key_type_no_use_key_no_delegate() {
        let req = request(None, None, None, Some(signing_cert()));
        assert_eq!(
            Some(signing_cert()),
            signing_certificate(&req, None, None).unwrap()
        );
        assert_eq!(
            None,
            signing_certificate(&req, None, Some(&bearer_token())).unwrap()
        );
        assert_eq!(
            Some(signing_cert()),
            signing_certificate(&req, None, Some(&hok_token())).unwrap()
        );

        let req = request(None, None, None, None);
        assert_eq!(None, signing_certificate(&req, None, None).unwrap());
    }

    #[test]
    fn test_no_use_key_with_delegate() {
        for cert in [None, Some(signing_cert())] {
            for key_type in [None, Some(KeyType::PublicKey)] {
                let req = request(key_type, None, None, cert.clone());
                assert_eq!(
                    Some(solution_cert()),
                    signing_certificate(&req, Some(&solution_cert()), None).unwrap()
                );
                assert_eq!(
                    Some(solution_cert()),
                    signing_certificate(&req, Some(&solution_cert()), Some(&hok_token())).unwrap()
                );
                assert!(is_contradictory(signing_certificate(
                    &req,
                    Some(&solution_cert()),
                    Some(&bearer_token())
                )));
            }
        }
    }

    #[test]
    fn test_holder_of_key_with_signature() {
        let req = request(
            Some(KeyType::PublicKey),
            Some(SIGNATURE_ID),
            Some(SIGNATURE_ID),
            Some(signing_cert()),
        );
        assert_eq!(
            Some(signing_cert()),
            signing_certificate(&req, None, None).unwrap()
        );
        assert!(is_contradictory(signing_certificate(
            &req,
            None,
            Some(&bearer_token())
        )));
        assert_eq!(
            Some(signing_cert()),
            signing_certificate(&req, None, Some(&hok_token())).unwrap()
        );
    }

    #[test]
    fn test_holder_of_key_without_any_key() {
        let req = request(Some(KeyType::PublicKey), None, None, None);
        assert!(is_contradictory(signing_certificate(&req, None, None)));
        assert!(is_contradictory(signing_certificate(
            &req,
            None,
            Some(&hok_token())
        )));
        let req = request(Some(KeyType::PublicKey), None, None, Some(signing_cert()));
        assert!(is_contradictory(signing_certificate(
            &req,
            None,
            Some(&bearer_token())
        )));
    }
}
