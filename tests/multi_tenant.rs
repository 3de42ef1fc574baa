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
//! End to end requests through the multi tenant STS with in-memory
//! collaborators.
use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use tempfile::tempdir;

use wstrust_sts::auth::{
    AuthResult, AuthStatus, AuthenticationContext, AuthenticationContextFactory,
    AuthenticationError, Authenticator,
};
use wstrust_sts::authority::{
    SignedToken, TokenAuthority, TokenAuthorityError, TokenValidationError, TokenValidator,
    ValidatableToken, ValidatableTokenBuilder, ValidationOutcome,
};
use wstrust_sts::common::PrincipalId;
use wstrust_sts::config::Config;
use wstrust_sts::error::{FaultKey, StsError};
use wstrust_sts::identity::{PrincipalDiscovery, PrincipalDiscoveryError};
use wstrust_sts::multi_tenant::{DefaultStsFactory, MultiTenantSts, StsCache};
use wstrust_sts::provider::Provider;
use wstrust_sts::request::{
    ChallengeRequest, ChallengeResponse, Request, RequestBuilder, RequestSecurityTokenBuilder,
    SecurityHeader, SecurityHeaderBuilder, Timestamp, UsernameToken, ValidateStatus,
};
use wstrust_sts::token::{AuthnMethod, ConfirmationType, SamlTokenSpec, SignatureAlgorithm};

const DOMAIN: &str = "acme.com";

struct PasswordAuthenticator;

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    fn supports(&self, request: &Request) -> bool {
        request.header.username_token.is_some()
    }

    async fn authenticate(&self, request: &Request) -> Result<AuthResult, AuthenticationError> {
        let Some(token) = &request.header.username_token else {
            return Err(AuthenticationError::UnsupportedSecurityToken(
                "no username token".into(),
            ));
        };
        if token
            .password
            .as_ref()
            .is_none_or(|password| password.expose_secret() != "secret")
        {
            return Err(AuthenticationError::InvalidCredentials(format!(
                "wrong password of {}",
                token.username
            )));
        }
        Ok(AuthResult::builder()
            .principal(PrincipalId::new(token.username.clone(), DOMAIN).unwrap())
            .authn_method(AuthnMethod::Password)
            .build()
            .unwrap())
    }
}

#[derive(Default)]
struct CountingAuthority {
    issued: AtomicUsize,
}

#[async_trait]
impl TokenAuthority for CountingAuthority {
    async fn issue_token(&self, spec: &SamlTokenSpec) -> Result<SignedToken, TokenAuthorityError> {
        self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(SignedToken {
            assertion: format!(
                "<saml2:Assertion><saml2:Subject>{}</saml2:Subject></saml2:Assertion>",
                spec.authentication_data().principal
            ),
            lifespan: spec.lifespan(),
            confirmation_type: spec.confirmation().r#type(),
            signature_algorithm: spec
                .signature_algorithm()
                .unwrap_or(SignatureAlgorithm::RsaSha256),
            delegable: spec.delegation_spec().is_delegable(),
            renewable: spec.renew_spec().renewable,
        })
    }
}

/// Tokens with a `_forged` id fail verification, expired ones are invalid.
struct ExpiryValidator;

#[async_trait]
impl TokenValidator for ExpiryValidator {
    async fn validate(
        &self,
        token: &ValidatableToken,
    ) -> Result<ValidationOutcome, TokenValidationError> {
        if token.id.starts_with("_forged") {
            return Err(TokenValidationError::InvalidSignature(token.id.clone()));
        }
        if token.expires_at <= Utc::now() {
            return Ok(ValidationOutcome::Invalid("the token expired".into()));
        }
        Ok(ValidationOutcome::Valid)
    }
}

struct StaticGroups {
    act_as_users: Vec<PrincipalId>,
}

#[async_trait]
impl PrincipalDiscovery for StaticGroups {
    async fn is_member_of_system_group<'a>(
        &self,
        principal: &PrincipalId,
        group: &'a str,
    ) -> Result<bool, PrincipalDiscoveryError> {
        if group != "ActAsUsers" {
            return Err(PrincipalDiscoveryError::GroupNotFound(group.into()));
        }
        Ok(self.act_as_users.contains(principal))
    }
}

/// Two round negotiation: "hello" is answered with a challenge, "response"
/// completes it.
struct TwoRoundContext {
    rounds: VecDeque<(&'static str, AuthStatus)>,
    status: AuthStatus,
    released: Arc<AtomicUsize>,
}

impl AuthenticationContext for TwoRoundContext {
    fn status(&self) -> AuthStatus {
        self.status
    }

    fn accept(&mut self, _token: &[u8]) -> Result<Vec<u8>, AuthenticationError> {
        let (output, status) = self
            .rounds
            .pop_front()
            .ok_or_else(|| AuthenticationError::InvalidCredentials("no more rounds".into()))?;
        self.status = status;
        Ok(output.as_bytes().to_vec())
    }

    fn principal(&self) -> Option<PrincipalId> {
        PrincipalId::new("kerberos-user", DOMAIN).ok()
    }

    fn authn_method(&self) -> AuthnMethod {
        AuthnMethod::Kerberos
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct TwoRoundFactory {
    released: Arc<AtomicUsize>,
}

impl AuthenticationContextFactory for TwoRoundFactory {
    fn create_context(&self) -> Result<Box<dyn AuthenticationContext>, AuthenticationError> {
        Ok(Box::new(TwoRoundContext {
            rounds: VecDeque::from([
                ("challenge", AuthStatus::ContinueNeeded),
                ("", AuthStatus::Complete),
            ]),
            status: AuthStatus::Initial,
            released: self.released.clone(),
        }))
    }
}

struct Fixture {
    sts: MultiTenantSts,
    authority: Arc<CountingAuthority>,
    released: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("sts.conf");
    let mut file = File::create(&file_path).unwrap();
    write!(
        file,
        r#"
[sts]
clock_tolerance = 0
default_lifetime = 600

[tenant.acme]
max_delegation_count = 3
"#
    )
    .unwrap();
    let config = Config::new(file_path).unwrap();

    let authority = Arc::new(CountingAuthority::default());
    let released = Arc::new(AtomicUsize::new(0));
    let provider = Provider::new(
        Arc::new(PasswordAuthenticator),
        authority.clone(),
        Arc::new(ExpiryValidator),
        Arc::new(StaticGroups {
            act_as_users: vec![PrincipalId::new("solution", DOMAIN).unwrap()],
        }),
        Arc::new(TwoRoundFactory {
            released: released.clone(),
        }),
    );
    let cache = StsCache::new(Arc::new(DefaultStsFactory::new(config, provider)));
    Fixture {
        sts: MultiTenantSts::new(cache),
        authority,
        released,
    }
}

fn header(username: &str, password: &str) -> SecurityHeader {
    let now = Utc::now();
    SecurityHeaderBuilder::default()
        .timestamp(Timestamp {
            created: now,
            expires: now + TimeDelta::minutes(5),
        })
        .username_token(UsernameToken {
            username: username.into(),
            password: Some(SecretString::from(password.to_string())),
        })
        .build()
        .unwrap()
}

fn token(id: &str, subject: &str, expires_in: TimeDelta) -> ValidatableToken {
    ValidatableTokenBuilder::default()
        .id(id)
        .subject(PrincipalId::new(subject, DOMAIN).unwrap())
        .expires_at(Utc::now() + expires_in)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_issue_with_password() {
    let fixture = fixture();
    let request = RequestBuilder::default()
        .header(header("user", "secret"))
        .rst(
            RequestSecurityTokenBuilder::default()
                .context("ctx-issue")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let rstr = fixture.sts.issue("acme", &request).await.unwrap();
    assert_eq!(Some("ctx-issue".to_string()), rstr.context);
    assert_eq!(Some(ConfirmationType::Bearer), rstr.key_type);
    let lifetime = rstr.lifetime.unwrap();
    assert_eq!(
        Some(TimeDelta::minutes(10)),
        lifetime.end().zip(lifetime.start()).map(|(end, start)| end - start)
    );
    assert!(
        rstr.requested_security_token
            .unwrap()
            .contains("user@acme.com")
    );
    assert_eq!(1, fixture.authority.issued.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_issue_with_wrong_password() {
    let fixture = fixture();
    let request = RequestBuilder::default()
        .header(header("user", "guess"))
        .build()
        .unwrap();
    let err = fixture.sts.issue("acme", &request).await.unwrap_err();
    assert!(matches!(err, StsError::InvalidCredentials(..)));
    assert_eq!(FaultKey::FailedAuthentication, err.fault());
    assert_eq!(0, fixture.authority.issued.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_unknown_tenant() {
    let fixture = fixture();
    let request = RequestBuilder::default()
        .header(header("user", "secret"))
        .build()
        .unwrap();
    let err = fixture.sts.issue("initech", &request).await.unwrap_err();
    assert_eq!(FaultKey::NoSuchIdp, err.fault());
}

#[tokio::test]
async fn test_validate() {
    let fixture = fixture();
    let expired = RequestBuilder::default()
        .header(header("user", "secret"))
        .token(token("_t1", "user", TimeDelta::minutes(-1)))
        .build()
        .unwrap();
    let rstr = fixture.sts.validate("acme", &expired).await.unwrap();
    assert_eq!(
        Some(ValidateStatus::Invalid("the token expired".into())),
        rstr.status
    );

    let forged = RequestBuilder::default()
        .header(header("user", "secret"))
        .token(token("_forged", "user", TimeDelta::minutes(5)))
        .build()
        .unwrap();
    assert!(matches!(
        fixture.sts.validate("acme", &forged).await,
        Err(StsError::InvalidCredentials(..))
    ));
}

#[tokio::test]
async fn test_act_as() {
    let fixture = fixture();
    let request = |username: &str| {
        RequestBuilder::default()
            .header(header(username, "secret"))
            .rst(
                RequestSecurityTokenBuilder::default()
                    .act_as(token("_owner", "owner", TimeDelta::hours(1)))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    };

    assert!(matches!(
        fixture.sts.issue("acme", &request("user")).await,
        Err(StsError::InvalidRequest(..))
    ));
    let rstr = fixture
        .sts
        .issue("acme", &request("solution"))
        .await
        .unwrap();
    assert!(rstr.requested_security_token.is_some());
}

#[tokio::test]
async fn test_negotiation() {
    let fixture = fixture();
    let now = Utc::now();
    let timestamp = Timestamp {
        created: now,
        expires: now + TimeDelta::minutes(5),
    };
    let request = RequestBuilder::default()
        .header(
            SecurityHeaderBuilder::default()
                .timestamp(timestamp)
                .build()
                .unwrap(),
        )
        .rst(
            RequestSecurityTokenBuilder::default()
                .context("ctx-kerberos")
                .binary_exchange("aGVsbG8=")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let (mut session, response) = fixture
        .sts
        .open_negotiation("acme", request)
        .await
        .unwrap();
    assert!(matches!(response, ChallengeResponse::Continue { .. }));

    let challenge = ChallengeRequest {
        context: "ctx-kerberos".into(),
        binary_exchange: Some("cmVzcG9uc2U=".into()),
    };
    let header = SecurityHeaderBuilder::default()
        .timestamp(timestamp)
        .build()
        .unwrap();
    let response = fixture
        .sts
        .challenge("acme", &mut session, &challenge, &header)
        .await
        .unwrap();
    let ChallengeResponse::Issued(rstr) = response else {
        panic!("token expected");
    };
    assert!(
        rstr.requested_security_token
            .unwrap()
            .contains("kerberos-user@acme.com")
    );
    assert_eq!(1, fixture.released.load(Ordering::SeqCst));
    drop(session);
    assert_eq!(1, fixture.released.load(Ordering::SeqCst));
}
