// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the store, limiter and validator working together.

use std::net::IpAddr;
use std::time::{Duration, Instant};
use paladin_chat::{
    config::{RateLimitConfig, StoreConfig, ValidationConfig},
    limiter::{RateLimitResult, RateLimiter},
    store::{Database, MessageStore},
    validator::{MessageValidator, ValidationError},
};
use tokio_test::assert_ok;

#[tokio::test]
async fn test_full_submission_flow() {
    let limiter = RateLimiter::new(RateLimitConfig::default());
    let validator = MessageValidator::new(ValidationConfig::default());
    let db = assert_ok!(Database::in_memory().await);

    let ip: IpAddr = "192.168.1.100".parse().unwrap();

    // Check rate limit
    let rate_result = limiter.check(ip).await;
    assert!(matches!(rate_result, RateLimitResult::Allowed { remaining: 19, .. }));

    // Validate request
    assert!(validator.validate(Some("alice"), Some("first post")).is_valid());

    let created = assert_ok!(db.append("alice", "first post").await);
    let history = assert_ok!(db.list(50).await);
    assert_eq!(history, vec![created]);
}

#[tokio::test]
async fn test_rejected_submission_never_reaches_store() {
    let validator = MessageValidator::new(ValidationConfig::default());
    let db = assert_ok!(Database::in_memory().await);

    let result = validator.validate(Some("alice"), Some(""));
    assert_eq!(result.error(), Some(&ValidationError::MissingField("content")));

    assert!(assert_ok!(db.list(50).await).is_empty());
}

#[tokio::test]
async fn test_rate_limit_exhaustion_and_recovery() {
    let limiter = RateLimiter::new(RateLimitConfig {
        max_requests: 3,
        window_secs: 60,
        ..Default::default()
    });

    let ip: IpAddr = "10.0.0.1".parse().unwrap();
    let start = Instant::now();

    // Exhaust rate limit
    for i in 0..3 {
        let result = limiter.check_at(ip, start).await;
        assert!(
            matches!(result, RateLimitResult::Allowed { .. }),
            "Request {} should be allowed",
            i + 1
        );
    }

    // Next request should be limited
    let result = limiter.check_at(ip, start + Duration::from_secs(30)).await;
    assert_eq!(
        result,
        RateLimitResult::Limited {
            retry_after: Duration::from_secs(30)
        }
    );

    // Once the window has passed the client is admitted again
    let result = limiter.check_at(ip, start + Duration::from_secs(60)).await;
    assert!(result.is_allowed());
}

#[tokio::test]
async fn test_history_stays_ordered_across_many_writes() {
    let db = assert_ok!(Database::in_memory().await);

    for i in 0..20 {
        assert_ok!(db.append(&format!("user-{}", i % 3), &format!("line {i}")).await);
    }

    let history = assert_ok!(db.list(50).await);
    assert_eq!(history.len(), 20);
    assert!(history
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));
}

#[tokio::test]
async fn test_separate_memory_stores_are_isolated() {
    let first = assert_ok!(Database::in_memory().await);
    let second = assert_ok!(Database::in_memory().await);

    assert_ok!(first.append("alice", "only here").await);

    assert_eq!(assert_ok!(first.list(50).await).len(), 1);
    assert!(assert_ok!(second.list(50).await).is_empty());
}

#[tokio::test]
async fn test_unknown_engine_fails_to_connect() {
    let config = StoreConfig {
        endpoint: "bogus://nowhere".to_string(),
        ..Default::default()
    };

    assert!(Database::connect(&config).await.is_err());
}

#[tokio::test]
async fn test_default_store_connects_and_accepts_writes() {
    let db = assert_ok!(Database::connect(&StoreConfig::default()).await);

    let created = assert_ok!(db.append("alice", "hello").await);
    assert_eq!(assert_ok!(db.list(50).await), vec![created]);
}
