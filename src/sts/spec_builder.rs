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
//! # Token specification assembly
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::auth::AuthResult;
use crate::authority::{TokenValidator, ValidatableToken, ValidationOutcome};
use crate::common::TimePeriod;
use crate::config::StsConfiguration;
use crate::error::StsError;
use crate::request::Request;
use crate::sts::delegation::DelegationParser;
use crate::sts::hok;
use crate::token::{
    AuthenticationData, AuthenticationDataBuilder, Confirmation, DelegationHistory,
    DelegationSpec, RenewSpec, SamlTokenSpec, SamlTokenSpecBuilder,
};

/// Builds the specification of the token to issue from a request.
#[derive(Clone)]
pub struct TokenSpecFactory {
    delegation_parser: DelegationParser,
    token_validator: Arc<dyn TokenValidator>,
}

impl TokenSpecFactory {
    pub fn new(delegation_parser: DelegationParser, token_validator: Arc<dyn TokenValidator>) -> Self {
        Self {
            delegation_parser,
            token_validator,
        }
    }

    /// Specification of a token issued to an authenticated requester.
    #[tracing::instrument(level = "debug", skip_all, fields(principal = %authn.principal))]
    pub async fn issue_spec(
        &self,
        request: &Request,
        authn: &AuthResult,
        config: &StsConfiguration,
        now: DateTime<Utc>,
    ) -> Result<SamlTokenSpec, StsError> {
        let rst = &request.rst;
        if let Some(act_as) = &rst.act_as {
            self.check_act_as_token(act_as).await?;
        }
        let delegation_spec = self
            .delegation_parser
            .parse(rst, &authn.principal, config, now)
            .await?;

        let lifespan = lifespan(rst.lifetime.as_ref(), delegation_spec.history(), config, now)?;
        let certificate = hok::signing_certificate(
            request,
            authn.holder_certificate.as_ref(),
            request.token.as_ref(),
        )?;
        let confirmation = certificate.map_or_else(Confirmation::default, Confirmation::holder_of_key);

        let mut authn_data = AuthenticationDataBuilder::default();
        authn_data
            .principal(authn.principal.clone())
            .authn_time(authn.authn_instant)
            .authn_method(authn.authn_method)
            .identity_attr_name(config.identity_attribute.clone());
        if let Some(session_index) = &authn.session_index {
            authn_data.session_index(session_index.clone());
        }

        let mut builder = SamlTokenSpecBuilder::new(
            Some(lifespan),
            confirmation,
            authn_data.build()?,
            config.attribute_names.iter().cloned(),
        );
        builder
            .delegation_spec(delegation_spec)
            .renew_spec(RenewSpec::new(
                rst.renewing.is_none_or(|renewing| renewing.allow),
                false,
                config.max_renew_count,
            ));
        if let Some(signature_algorithm) = rst.signature_algorithm {
            builder.signature_algorithm(signature_algorithm);
        }
        if let Some(applies_to) = &rst.applies_to {
            builder.add_audience(applies_to.clone());
        }
        for advice in &rst.advice {
            builder.add_requested_advice(advice.clone());
        }
        if let Some(act_as) = &rst.act_as {
            for advice in &act_as.advice {
                builder.add_present_advice(advice.clone());
            }
        }

        let spec = builder.create_spec();
        debug!(
            "Token spec for {} with lifespan {} and {} confirmation",
            authn.principal,
            spec.lifespan(),
            spec.confirmation().r#type()
        );
        Ok(spec)
    }

    /// Specification of the renewal of `token`.
    ///
    /// The caller ensures the token may be renewed.
    pub fn renew_spec(
        &self,
        request: &Request,
        token: &ValidatableToken,
        config: &StsConfiguration,
        now: DateTime<Utc>,
    ) -> Result<SamlTokenSpec, StsError> {
        let history = (!token.delegation_chain.is_empty()).then(|| {
            let delegated_token_expires = now
                .checked_add_signed(config.max_delegation_lifetime)
                .map_or(token.expires_at, |limit| limit.min(token.expires_at));
            DelegationHistory::new(
                token.subject.clone(),
                token.delegation_chain.clone(),
                token.remaining_delegations.unwrap_or_default(),
                delegated_token_expires,
            )
        });
        let lifespan = lifespan(request.rst.lifetime.as_ref(), history.as_ref(), config, now)?;
        let authn_data = AuthenticationData {
            principal: token.subject.clone(),
            authn_time: token.authn_time,
            authn_method: token.authn_method,
            identity_attr_name: config.identity_attribute.clone(),
            session_index: token.session_index.clone(),
            session_expires: None,
        };

        let delegation_spec = match history {
            Some(history) => DelegationSpec::with_history(
                Some(token.holder().clone()),
                token.delegable,
                history,
            ),
            None => DelegationSpec::new(None, token.delegable),
        };

        let mut builder = SamlTokenSpecBuilder::new(
            Some(lifespan),
            token.confirmation.clone(),
            authn_data,
            config.attribute_names.iter().cloned(),
        );
        builder.delegation_spec(delegation_spec).renew_spec(RenewSpec::new(
            true,
            true,
            token.remaining_renewals.saturating_sub(1),
        ));
        if let Some(signature_algorithm) = request.rst.signature_algorithm {
            builder.signature_algorithm(signature_algorithm);
        }
        for audience in &token.audience {
            builder.add_audience(audience.clone());
        }
        for advice in &token.advice {
            builder.add_present_advice(advice.clone());
        }
        Ok(builder.create_spec())
    }

    async fn check_act_as_token(&self, act_as: &ValidatableToken) -> Result<(), StsError> {
        match self.token_validator.validate(act_as).await? {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(reason) => Err(StsError::InvalidRequest(format!(
                "the ActAs token is not valid: {reason}"
            ))),
        }
    }
}

/// Lifespan of the token to issue: the requested one, starting now when the
/// request leaves the start open and lasting the default lifetime when it
/// leaves the end open. Delegated tokens never outlive their history.
fn lifespan(
    requested: Option<&TimePeriod>,
    history: Option<&DelegationHistory>,
    config: &StsConfiguration,
    now: DateTime<Utc>,
) -> Result<TimePeriod, StsError> {
    let start = requested.and_then(TimePeriod::start).unwrap_or(now);
    let mut end = requested
        .and_then(TimePeriod::end)
        .or_else(|| start.checked_add_signed(config.default_lifetime));
    if let Some(history) = history {
        let limit = history.delegated_token_expires();
        end = Some(end.map_or(limit, |end| end.min(limit)));
    }
    TimePeriod::new(Some(start), end).map_err(|err| StsError::InvalidTimeRange(err.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::authority::{MockTokenValidator, TokenValidationError, ValidatableTokenBuilder};
    use crate::common::{Certificate, PrincipalId};
    use crate::config::StsConfigurationBuilder;
    use crate::identity::MockPrincipalDiscovery;
    use crate::request::{
        CertificateLocation, Renewing, RequestBuilder, RequestSecurityTokenBuilder, Signature,
    };
    use crate::token::{
        Advice, AdviceAttribute, AuthnMethod, ConfirmationType, SignatureAlgorithm, TokenDelegate,
    };

    fn principal(name: &str) -> PrincipalId {
        PrincipalId::new(name, "example.com").unwrap()
    }

    fn config() -> StsConfiguration {
        StsConfigurationBuilder::default()
            .default_lifetime(TimeDelta::minutes(30))
            .max_renew_count(5u32)
            .max_delegation_lifetime(TimeDelta::hours(1))
            .identity_attribute("upn")
            .attribute_names(vec!["upn".to_string(), "groups".to_string()])
            .build()
            .unwrap()
    }

    fn authn(name: &str) -> AuthResult {
        AuthResult::builder()
            .principal(principal(name))
            .authn_method(AuthnMethod::Password)
            .session_index("_s1")
            .build()
            .unwrap()
    }

    fn advice(source: &str) -> Advice {
        Advice::new(
            source,
            vec![AdviceAttribute {
                name: "role".into(),
                friendly_name: None,
                values: vec!["admin".into()],
            }],
        )
        .unwrap()
    }

    fn factory(validator: MockTokenValidator, discovery: MockPrincipalDiscovery) -> TokenSpecFactory {
        TokenSpecFactory::new(
            DelegationParser::new(Arc::new(discovery)),
            Arc::new(validator),
        )
    }

    fn no_membership_check() -> MockPrincipalDiscovery {
        let mut discovery = MockPrincipalDiscovery::default();
        discovery.expect_is_member_of_system_group().never();
        discovery
    }

    #[tokio::test]
    async fn test_issue_spec_defaults() {
        let mut validator = MockTokenValidator::default();
        validator.expect_validate().never();
        let sot = factory(validator, no_membership_check());
        let now = Utc::now();
        let request = RequestBuilder::default()
            .rst(
                RequestSecurityTokenBuilder::default()
                    .applies_to("urn:vc")
                    .signature_algorithm(SignatureAlgorithm::RsaSha512)
                    .advice(vec![advice("urn:requested")])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let spec = sot
            .issue_spec(&request, &authn("user"), &config(), now)
            .await
            .unwrap();
        assert_eq!(
            TimePeriod::starting_at(now, TimeDelta::minutes(30)).unwrap(),
            spec.lifespan()
        );
        assert_eq!(&Confirmation::default(), spec.confirmation());
        assert_eq!(principal("user"), spec.authentication_data().principal);
        assert_eq!("upn", spec.authentication_data().identity_attr_name);
        assert_eq!(
            Some("_s1".to_string()),
            spec.authentication_data().session_index
        );
        assert_eq!(&["upn".to_string(), "groups".to_string()], spec.attribute_names());
        assert_eq!(RenewSpec::new(true, false, 5), spec.renew_spec());
        assert!(spec.audience().contains("urn:vc"));
        assert_eq!(&[advice("urn:requested")], spec.requested_advice());
        assert!(spec.present_advice().is_empty());
        assert_eq!(Some(SignatureAlgorithm::RsaSha512), spec.signature_algorithm());
        assert!(!spec.delegation_spec().is_delegable());
        assert!(spec.requester_is_token_owner());
    }

    #[tokio::test]
    async fn test_issue_spec_requested_lifetime_and_renewing() {
        let sot = factory(MockTokenValidator::default(), no_membership_check());
        let now = Utc::now();
        let requested = TimePeriod::new(None, Some(now + TimeDelta::minutes(5))).unwrap();
        let request = RequestBuilder::default()
            .rst(
                RequestSecurityTokenBuilder::default()
                    .lifetime(requested)
                    .renewing(Renewing {
                        allow: false,
                        ok: false,
                    })
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let spec = sot
            .issue_spec(&request, &authn("user"), &config(), now)
            .await
            .unwrap();
        assert_eq!(Some(now), spec.lifespan().start());
        assert_eq!(Some(now + TimeDelta::minutes(5)), spec.lifespan().end());
        assert!(!spec.renew_spec().renewable);
    }

    #[tokio::test]
    async fn test_issue_spec_expired_lifetime() {
        let sot = factory(MockTokenValidator::default(), no_membership_check());
        let now = Utc::now();
        let requested = TimePeriod::new(None, Some(now - TimeDelta::minutes(5))).unwrap();
        let request = RequestBuilder::default()
            .rst(
                RequestSecurityTokenBuilder::default()
                    .lifetime(requested)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert!(matches!(
            sot.issue_spec(&request, &authn("user"), &config(), now).await,
            Err(StsError::InvalidTimeRange(..))
        ));
    }

    #[tokio::test]
    async fn test_issue_spec_holder_of_key() {
        let sot = factory(MockTokenValidator::default(), no_membership_check());
        let cert = Certificate::new(b"cert".to_vec());
        let request = RequestBuilder::default()
            .signature(Signature {
                certificate: cert.clone(),
                location: CertificateLocation::BinarySecurityToken,
            })
            .build()
            .unwrap();
        let spec = sot
            .issue_spec(&request, &authn("user"), &config(), Utc::now())
            .await
            .unwrap();
        assert_eq!(ConfirmationType::HolderOfKey, spec.confirmation().r#type());
        assert_eq!(Some(&cert), spec.confirmation().certificate());
    }

    #[tokio::test]
    async fn test_issue_spec_act_as() {
        let mut validator = MockTokenValidator::default();
        validator
            .expect_validate()
            .times(1)
            .returning(|_| Ok(ValidationOutcome::Valid));
        let mut discovery = MockPrincipalDiscovery::default();
        discovery
            .expect_is_member_of_system_group()
            .returning(|_, _| Ok(true));
        let sot = factory(validator, discovery);
        let now = Utc::now();
        let act_as = ValidatableTokenBuilder::default()
            .subject(principal("owner"))
            .expires_at(now + TimeDelta::days(1))
            .delegation_chain(vec![TokenDelegate::new(principal("first"), now)])
            .remaining_delegations(4u32)
            .advice(vec![advice("urn:present")])
            .build()
            .unwrap();
        let request = RequestBuilder::default()
            .rst(
                RequestSecurityTokenBuilder::default()
                    .act_as(act_as)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let spec = sot
            .issue_spec(&request, &authn("solution"), &config(), now)
            .await
            .unwrap();
        assert!(!spec.requester_is_token_owner());
        let history = spec.delegation_spec().history().unwrap();
        assert_eq!(3, history.remaining_delegations());
        assert_eq!(2, history.delegates().len());
        assert_eq!(&[advice("urn:present")], spec.present_advice());
        // default lifetime is shorter than the delegation limit
        assert_eq!(Some(now + TimeDelta::minutes(30)), spec.lifespan().end());
    }

    #[tokio::test]
    async fn test_issue_spec_act_as_lifespan_capped() {
        let mut validator = MockTokenValidator::default();
        validator
            .expect_validate()
            .returning(|_| Ok(ValidationOutcome::Valid));
        let mut discovery = MockPrincipalDiscovery::default();
        discovery
            .expect_is_member_of_system_group()
            .returning(|_, _| Ok(true));
        let sot = factory(validator, discovery);
        let now = Utc::now();
        let act_as = ValidatableTokenBuilder::default()
            .subject(principal("owner"))
            .expires_at(now + TimeDelta::minutes(10))
            .build()
            .unwrap();
        let request = RequestBuilder::default()
            .rst(
                RequestSecurityTokenBuilder::default()
                    .act_as(act_as)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let spec = sot
            .issue_spec(&request, &authn("solution"), &config(), now)
            .await
            .unwrap();
        assert_eq!(Some(now + TimeDelta::minutes(10)), spec.lifespan().end());
    }

    #[tokio::test]
    async fn test_issue_spec_invalid_act_as_token() {
        let mut validator = MockTokenValidator::default();
        validator
            .expect_validate()
            .returning(|_| Ok(ValidationOutcome::Invalid("expired".into())));
        let sot = factory(validator, no_membership_check());
        let now = Utc::now();
        let act_as = ValidatableTokenBuilder::default()
            .subject(principal("owner"))
            .expires_at(now - TimeDelta::minutes(1))
            .build()
            .unwrap();
        let request = RequestBuilder::default()
            .rst(
                RequestSecurityTokenBuilder::default()
                    .act_as(act_as.clone())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert!(matches!(
            sot.issue_spec(&request, &authn("solution"), &config(), now).await,
            Err(StsError::InvalidRequest(..))
        ));

        let mut validator = MockTokenValidator::default();
        validator
            .expect_validate()
            .returning(|_| Err(TokenValidationError::InvalidSignature("digest".into())));
        let sot = factory(validator, no_membership_check());
        assert!(matches!(
            sot.issue_spec(&request, &authn("solution"), &config(), now).await,
            Err(StsError::InvalidSignature(..))
        ));
    }

    #[test]
    fn test_renew_spec() {
        let sot = factory(MockTokenValidator::default(), no_membership_check());
        let now = Utc::now();
        let cert = Certificate::new(b"cert".to_vec());
        let token = ValidatableTokenBuilder::default()
            .subject(principal("owner"))
            .expires_at(now + TimeDelta::minutes(1))
            .confirmation(Confirmation::holder_of_key(cert))
            .authn_method(AuthnMethod::Kerberos)
            .delegation_chain(vec![TokenDelegate::new(principal("solution"), now)])
            .remaining_delegations(2u32)
            .delegable(true)
            .renewable(true)
            .remaining_renewals(3u32)
            .audience(vec!["urn:vc".to_string()])
            .build()
            .unwrap();
        let request = RequestBuilder::default().build().unwrap();

        let spec = sot.renew_spec(&request, &token, &config(), now).unwrap();
        assert_eq!(RenewSpec::new(true, true, 2), spec.renew_spec());
        assert_eq!(&token.confirmation, spec.confirmation());
        assert_eq!(principal("owner"), spec.authentication_data().principal);
        assert_eq!(AuthnMethod::Kerberos, spec.authentication_data().authn_method);
        assert_eq!(Some(token.expires_at), spec.lifespan().end());
        assert!(spec.audience().contains("urn:vc"));
        let delegation = spec.delegation_spec();
        assert_eq!(Some(&principal("solution")), delegation.delegate());
        assert!(delegation.is_delegable());
        assert_eq!(2, delegation.history().unwrap().remaining_delegations());
        assert_eq!(
            token.expires_at,
            delegation.history().unwrap().delegated_token_expires()
        );
    }

    #[test]
    fn test_renew_spec_delegated_lifetime_limit() {
        let sot = factory(MockTokenValidator::default(), no_membership_check());
        let now = Utc::now();
        let token = ValidatableTokenBuilder::default()
            .subject(principal("owner"))
            .expires_at(now + TimeDelta::hours(3))
            .delegation_chain(vec![TokenDelegate::new(principal("solution"), now)])
            .renewable(true)
            .remaining_renewals(3u32)
            .build()
            .unwrap();
        let request = RequestBuilder::default()
            .rst(
                RequestSecurityTokenBuilder::default()
                    .lifetime(TimePeriod::starting_at(now, TimeDelta::hours(8)).unwrap())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let spec = sot.renew_spec(&request, &token, &config(), now).unwrap();
        assert_eq!(Some(now + TimeDelta::hours(1)), spec.lifespan().end());
        assert_eq!(
            now + TimeDelta::hours(1),
            spec.delegation_spec()
                .history()
                .unwrap()
                .delegated_token_expires()
        );
    }

    #[test]
    fn test_renew_spec_undelegated_not_capped() {
        let sot = factory(MockTokenValidator::default(), no_membership_check());
        let now = Utc::now();
        let token = ValidatableTokenBuilder::default()
            .subject(principal("owner"))
            .expires_at(now + TimeDelta::minutes(1))
            .renewable(true)
            .remaining_renewals(3u32)
            .build()
            .unwrap();
        let request = RequestBuilder::default().build().unwrap();

        let spec = sot.renew_spec(&request, &token, &config(), now).unwrap();
        assert_eq!(Some(now + TimeDelta::minutes(30)), spec.lifespan().end());
        assert!(spec.delegation_spec().history().is_none());
    }
}
