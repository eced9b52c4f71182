// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication tests.
//!
//! These tests verify that:
//! 1. FIT routes reject requests without valid tokens
//! 2. FIT routes accept bearer tokens and the session cookie
//! 3. Tokens from `create_jwt` decode with the middleware's claims

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use runcoach_fit::middleware::auth::{Claims, SESSION_COOKIE};
use tower::ServiceExt;

mod common;

const DOWNLOAD_URI: &str = "/api/fit/download/workout_abc_123.fit";

#[tokio::test]
async fn test_missing_token_rejected() {
    let (app, _state, _temp) = common::create_test_app();

    for (method, uri) in [
        ("GET", DOWNLOAD_URI),
        ("POST", "/api/fit/cleanup"),
        ("POST", "/api/fit/workouts"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_wrong_signing_key_rejected() {
    let (app, _state, _temp) = common::create_test_app();
    let token = common::create_test_jwt("64b2c0ffee", b"some_other_key_that_is_long_enough");

    let response = app
        .oneshot(
            Request::builder()
                .uri(DOWNLOAD_URI)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_authorization_header_rejected() {
    let (app, state, _temp) = common::create_test_app();
    let token = common::create_test_jwt("64b2c0ffee", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri(DOWNLOAD_URI)
                .header(header::AUTHORIZATION, format!("Token {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let (app, state, _temp) = common::create_test_app();

    let response = app
        .oneshot(common::authed_request(
            "GET",
            DOWNLOAD_URI,
            &state,
            Body::empty(),
        ))
        .await
        .unwrap();

    // Authenticated, but the file does not exist.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_cookie_accepted() {
    let (app, state, _temp) = common::create_test_app();
    let token = common::create_test_jwt("64b2c0ffee", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/fit/cleanup")
                .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_jwt_roundtrip() {
    let signing_key = b"test_signing_key_32_bytes_long!!";
    let token = common::create_test_jwt("64b2c0ffee", signing_key);

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(signing_key),
        &Validation::new(Algorithm::HS256),
    )
    .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, "64b2c0ffee");
    assert!(token_data.claims.exp > token_data.claims.iat);
}
