// ABOUTME: Integration tests for the authorization gateway
// ABOUTME: Covers the unavailable no-op, the combined request, and typed failure reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use vitalstore::authorization::{AuthorizationGateway, AuthorizationOutcome, GatewayProfile};
use vitalstore::errors::StoreError;
use vitalstore::store::synthetic::SyntheticStore;

#[tokio::test]
async fn unavailable_device_is_a_noop() {
    let store = Arc::new(SyntheticStore::unavailable());
    let gateway = AuthorizationGateway::new(
        common::dyn_store(&store),
        GatewayProfile::Watch.permissions(),
    );

    let outcome = gateway.request().await.unwrap();

    assert_eq!(outcome, AuthorizationOutcome::Unavailable);
    assert_eq!(store.authorization_requests(), 0, "store must not be called");
}

#[tokio::test]
async fn request_reaches_the_store_once() {
    let store = Arc::new(SyntheticStore::new());
    let permissions = GatewayProfile::Phone.permissions();
    let gateway = AuthorizationGateway::new(common::dyn_store(&store), permissions.clone());

    let outcome = gateway.request().await.unwrap();

    assert_eq!(outcome, AuthorizationOutcome::Requested);
    assert_eq!(store.authorization_requests(), 1);
    assert_eq!(store.authorized_permissions(), Some(permissions));
}

#[tokio::test]
async fn platform_rejection_is_a_typed_error() {
    let store = Arc::new(SyntheticStore::new());
    store.fail_authorization("capability not declared").unwrap();
    let gateway = AuthorizationGateway::new(
        common::dyn_store(&store),
        GatewayProfile::Watch.permissions(),
    );

    let err = gateway.request().await.unwrap_err();

    assert!(matches!(err, StoreError::AuthorizationFailed { .. }));
    assert_eq!(store.authorization_requests(), 1, "the request itself was made");
}
