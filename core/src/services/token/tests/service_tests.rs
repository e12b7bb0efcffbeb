//! Unit tests for token service

use std::sync::Arc;
use std::time::Duration as StdDuration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{ManualClock, TokenService, TokenServiceConfig, MAX_TOKEN_LIFETIME};

const SECRET: &str = "0123456789abcdef0123456789abcdef";
const OTHER_SECRET: &str = "fedcba9876543210fedcba9876543210";

fn start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn create_test_service(lifetime_ms: u64) -> (TokenService<Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let config = TokenServiceConfig::new(SECRET, StdDuration::from_millis(lifetime_ms));
    let service = TokenService::with_clock(config, Arc::clone(&clock))
        .expect("Failed to create token service");
    (service, clock)
}

fn token_error(result: Result<impl std::fmt::Debug, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(err)) => err,
        other => panic!("expected token error, got {:?}", other),
    }
}

fn decode_segment(segment: &str) -> serde_json::Value {
    let bytes = URL_SAFE_NO_PAD.decode(segment).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn test_issue_and_read_back_subject() {
    let (service, _) = create_test_service(60_000);

    for subject in ["alice", "user@example.com", "김철수", "a b c"] {
        let token = service.issue(subject).unwrap();
        assert!(service.verify(&token));
        assert_eq!(service.subject_of(&token).unwrap(), subject);
    }
}

#[test]
fn test_token_wire_format() {
    let (service, _) = create_test_service(60_000);
    let token = service.issue("alice").unwrap();

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);
    assert!(segments.iter().all(|s| !s.is_empty()));

    let header = decode_segment(segments[0]);
    assert_eq!(header["alg"], "HS256");

    let payload = decode_segment(segments[1]);
    assert_eq!(
        payload,
        serde_json::json!({
            "sub": "alice",
            "iat": 1_700_000_000,
            "exp": 1_700_000_060,
        })
    );
}

#[test]
fn test_expiration_equals_issued_at_plus_lifetime() {
    let (service, _) = create_test_service(15 * 60 * 1000);
    let claims = service.try_parse(&service.issue("alice").unwrap()).unwrap();

    assert_eq!(claims.exp, claims.iat + 15 * 60);
}

#[test]
fn test_lifetime_scenario() {
    let (service, clock) = create_test_service(1000);
    let token = service.issue("alice").unwrap();

    clock.advance(Duration::milliseconds(500));
    assert!(service.verify(&token));
    assert_eq!(service.subject_of(&token).unwrap(), "alice");

    clock.advance(Duration::milliseconds(1000));
    assert!(!service.verify(&token));
}

#[test]
fn test_late_in_second_issuance_expires_early() {
    // iat and exp are floored to the second: issued at +600 ms, exp is start + 1s
    let (service, clock) = create_test_service(1000);
    clock.set(start() + Duration::milliseconds(600));
    let token = service.issue("alice").unwrap();

    clock.advance(Duration::milliseconds(399));
    assert!(service.verify(&token));

    clock.advance(Duration::milliseconds(101));
    assert!(!service.verify(&token));
    assert_eq!(token_error(service.subject_of(&token)), TokenError::TokenExpired);
}

#[test]
fn test_expired_exactly_at_lifetime() {
    let (service, clock) = create_test_service(1000);
    let token = service.issue("alice").unwrap();

    clock.advance(Duration::milliseconds(999));
    assert!(service.verify(&token));

    clock.advance(Duration::milliseconds(1));
    assert!(!service.verify(&token));
}

#[test]
fn test_valid_immediately_when_issued_mid_second() {
    let (service, clock) = create_test_service(1000);
    clock.set(start() + Duration::milliseconds(999));

    let token = service.issue("alice").unwrap();
    assert!(service.verify(&token));
}

#[test]
fn test_expired_token_error() {
    let (service, clock) = create_test_service(1000);
    let token = service.issue("alice").unwrap();

    clock.advance(Duration::seconds(5));

    assert_eq!(token_error(service.try_parse(&token)), TokenError::TokenExpired);
    assert_eq!(token_error(service.subject_of(&token)), TokenError::TokenExpired);
}

#[test]
fn test_tampered_signature_rejected() {
    let (service, _) = create_test_service(60_000);
    let token = service.issue("alice").unwrap();

    let signature_start = token.rfind('.').unwrap() + 1;
    let mut chars: Vec<char> = token.chars().collect();
    chars[signature_start] = if chars[signature_start] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    assert_ne!(tampered, token);
    assert!(!service.verify(&tampered));
    assert_eq!(token_error(service.try_parse(&tampered)), TokenError::InvalidSignature);
}

#[test]
fn test_swapped_payload_rejected() {
    let (service, _) = create_test_service(60_000);
    let token = service.issue("alice").unwrap();
    let segments: Vec<&str> = token.split('.').collect();

    let forged_payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({"sub": "mallory", "iat": 1_700_000_000, "exp": 1_700_000_060})
            .to_string(),
    );
    let forged = format!("{}.{}.{}", segments[0], forged_payload, segments[2]);

    assert!(!service.verify(&forged));
    assert_eq!(token_error(service.subject_of(&forged)), TokenError::InvalidSignature);
}

#[test]
fn test_token_from_other_key_rejected() {
    let (service, _) = create_test_service(60_000);
    let other = TokenService::with_clock(
        TokenServiceConfig::new(OTHER_SECRET, StdDuration::from_secs(60)),
        Arc::new(ManualClock::new(start())),
    )
    .unwrap();

    let token = other.issue("alice").unwrap();
    assert!(other.verify(&token));
    assert!(!service.verify(&token));
    assert_eq!(token_error(service.subject_of(&token)), TokenError::InvalidSignature);
}

#[test]
fn test_malformed_tokens_rejected() {
    let (service, _) = create_test_service(60_000);

    for token in ["", "not.a.token", "abc", "a.b", "a.b.c.d", "..", "eyJhbGciOiJIUzI1NiJ9.."] {
        assert!(!service.verify(token), "accepted {:?}", token);
        assert!(service.subject_of(token).is_err());
    }

    assert_eq!(token_error(service.try_parse("")), TokenError::InvalidTokenFormat);
    assert_eq!(token_error(service.try_parse("not.a.token")), TokenError::InvalidTokenFormat);
}

#[test]
fn test_unaccepted_algorithm_rejected() {
    let (service, _) = create_test_service(60_000);
    let claims = Claims::new_access_token("alice", start(), Duration::seconds(60));

    // A 32-byte key is too short for HS512, so the service never accepts it
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(!service.verify(&token));
    assert_eq!(token_error(service.try_parse(&token)), TokenError::UnsupportedAlgorithm);
}

#[test]
fn test_longer_key_accepts_weaker_variant() {
    let secret = "k".repeat(64);
    let service = TokenService::with_clock(
        TokenServiceConfig::new(secret.clone(), StdDuration::from_secs(60)),
        Arc::new(ManualClock::new(start())),
    )
    .unwrap();
    assert_eq!(service.algorithm(), Algorithm::HS512);

    let claims = Claims::new_access_token("alice", start(), Duration::seconds(60));
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    assert_eq!(service.subject_of(&token).unwrap(), "alice");
}

#[test]
fn test_missing_expiration_rejected() {
    let (service, _) = create_test_service(60_000);
    let token = encode(
        &Header::new(Algorithm::HS256),
        &serde_json::json!({"sub": "alice", "iat": 1_700_000_000}),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(!service.verify(&token));
    // Either the required-claim check or payload deserialization trips first
    assert!(matches!(
        token_error(service.try_parse(&token)),
        TokenError::MissingClaim { .. } | TokenError::InvalidTokenFormat
    ));
}

#[test]
fn test_empty_subject_claim_rejected() {
    let (service, _) = create_test_service(60_000);
    let token = encode(
        &Header::new(Algorithm::HS256),
        &serde_json::json!({"sub": "", "iat": 1_700_000_000, "exp": 1_700_000_060}),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(
        token_error(service.try_parse(&token)),
        TokenError::MissingClaim { claim: "sub".to_string() }
    );
}

#[test]
fn test_blank_subject_not_issued() {
    let (service, _) = create_test_service(60_000);

    assert!(matches!(service.issue(""), Err(DomainError::Validation { .. })));
    assert!(matches!(service.issue("   "), Err(DomainError::Validation { .. })));
}

#[test]
fn test_weak_secret_fails_at_construction() {
    let result = TokenService::new(TokenServiceConfig::new("too-short", StdDuration::from_secs(60)));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_sub_second_lifetime_fails_at_construction() {
    for millis in [0, 1, 999] {
        let result = TokenService::new(TokenServiceConfig::new(SECRET, StdDuration::from_millis(millis)));
        assert!(matches!(result, Err(DomainError::Configuration { .. })), "lifetime {} ms", millis);
    }
}

#[test]
fn test_overlong_lifetime_fails_at_construction() {
    let result = TokenService::new(TokenServiceConfig::new(
        SECRET,
        StdDuration::from_millis(10_000_000_000_000_000),
    ));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));

    let result = TokenService::new(TokenServiceConfig::new(SECRET, MAX_TOKEN_LIFETIME + StdDuration::from_secs(1)));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_longest_lifetime_issues_tokens() {
    let clock = Arc::new(ManualClock::new(start()));
    let config = TokenServiceConfig::new(SECRET, MAX_TOKEN_LIFETIME);
    let service = TokenService::with_clock(config, Arc::clone(&clock)).unwrap();

    let token = service.issue("alice").unwrap();
    assert_eq!(service.subject_of(&token).unwrap(), "alice");
}

#[test]
fn test_expiry_past_time_range_fails_at_construction() {
    let clock = ManualClock::new(DateTime::<Utc>::MAX_UTC - Duration::days(1));
    let config = TokenServiceConfig::new(SECRET, StdDuration::from_secs(2 * 24 * 60 * 60));

    let result = TokenService::with_clock(config, clock);
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_debug_hides_secret() {
    let (service, _) = create_test_service(60_000);
    let config = TokenServiceConfig::new(SECRET, StdDuration::from_secs(60));

    assert!(!format!("{:?}", service).contains(SECRET));
    assert!(!format!("{:?}", config).contains(SECRET));
}

#[test]
fn test_lifetime_accessor() {
    let (service, _) = create_test_service(90_000);
    assert_eq!(service.lifetime(), StdDuration::from_secs(90));
}
