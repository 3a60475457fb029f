//! Integration tests for crypto-core token handling
//!
//! Covers cross-token tampering and the interaction between password
//! verification and token issuance as the login path uses them.
use chrono::{Duration, Utc};
use crypto_core::{hash_password, verify_password, TokenError, TokenService};

const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

fn tokens() -> TokenService {
    TokenService::new(TEST_SECRET, Duration::minutes(30)).expect("valid test secret")
}

#[test]
fn test_spliced_signature_is_rejected() {
    let tokens = tokens();
    let alice = tokens.issue("alice@x.com").unwrap();
    let mallory = tokens.issue("mallory@x.com").unwrap();

    let alice_parts: Vec<&str> = alice.split('.').collect();
    let mallory_parts: Vec<&str> = mallory.split('.').collect();
    let forged = format!(
        "{}.{}.{}",
        mallory_parts[0], mallory_parts[1], alice_parts[2]
    );

    assert_eq!(
        tokens.validate(&forged).unwrap_err(),
        TokenError::SignatureMismatch
    );
}

#[test]
fn test_token_from_other_secret_is_rejected() {
    let other = TokenService::new(b"a-completely-different-secret-value!!", Duration::minutes(30))
        .unwrap();
    let token = other.issue("a@x.com").unwrap();

    assert_eq!(
        tokens().validate(&token).unwrap_err(),
        TokenError::SignatureMismatch
    );
}

#[test]
fn test_truncated_token_is_malformed() {
    let token = tokens().issue("a@x.com").unwrap();
    let truncated = token.rsplit_once('.').map(|(head, _)| head).unwrap();

    assert_eq!(
        tokens().validate(truncated).unwrap_err(),
        TokenError::Malformed
    );
}

#[test]
fn test_short_ttl_expires() {
    let tokens = tokens();
    let issued = Utc::now() - Duration::minutes(5);
    let token = tokens
        .issue_at("a@x.com", Duration::minutes(1), issued)
        .unwrap();

    assert_eq!(tokens.validate(&token).unwrap_err(), TokenError::Expired);
}

#[test]
fn test_login_flow_primitives() {
    let stored = hash_password("pw1").unwrap();
    assert!(verify_password("pw1", &stored));

    let tokens = tokens();
    let token = tokens.issue("a@x.com").unwrap();
    let claims = tokens.validate(&token).unwrap();
    assert_eq!(claims.sub, "a@x.com");
    assert!(claims.exp > claims.iat);
}
