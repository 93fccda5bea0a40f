// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

// Each test uses its own variable so parallel tests do not race.

#[tokio::test]
async fn token_is_read_and_trimmed() {
    std::env::set_var("BACKLOG_TEST_TOKEN_SET", "  abc123\n");
    let provider = EnvTokenProvider::new("BACKLOG_TEST_TOKEN_SET");

    assert_eq!(
        provider.get_valid_access_token("me").await.unwrap(),
        "abc123"
    );
    assert!(provider.is_connected("me").await.unwrap());
}

#[tokio::test]
async fn missing_variable_is_an_auth_error() {
    let provider = EnvTokenProvider::new("BACKLOG_TEST_TOKEN_MISSING");

    let err = provider.get_valid_access_token("me").await.unwrap_err();
    assert!(err.is_auth());
    assert!(err.to_string().contains("BACKLOG_TEST_TOKEN_MISSING is not set"));
    assert!(!provider.is_connected("me").await.unwrap());
}

#[tokio::test]
async fn blank_variable_is_an_auth_error() {
    std::env::set_var("BACKLOG_TEST_TOKEN_BLANK", "   ");
    let provider = EnvTokenProvider::new("BACKLOG_TEST_TOKEN_BLANK");

    let err = provider.get_valid_access_token("me").await.unwrap_err();
    assert!(err.to_string().contains("is empty"));
}

#[test]
fn debug_shows_variable_name_only() {
    let provider = EnvTokenProvider::new("SOME_VAR");
    assert_eq!(format!("{provider:?}"), "EnvTokenProvider { var: \"SOME_VAR\" }");
    assert_eq!(provider.var(), "SOME_VAR");
}
