#![cfg(feature = "reqwest")]

mod common;

// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use appstore_connect_bridge::{
	client::{ApiClient, QueryParams},
	config::ClientConfig,
	error::{Error, TransportError},
	http::ReqwestHttpClient,
	pacing::PacingGate,
	resource::{App, AppAttributes, Document},
};

#[tokio::test]
async fn list_apps_sends_bearer_and_sparse_fieldset() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/apps")
				.header_exists("authorization")
				.header("accept", "application/json")
				.query_param("fields[apps]", "name,bundleId")
				.query_param("limit", "1");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"data": [{
					"type": "apps",
					"id": "1234567890",
					"attributes": {"name": "Example", "bundleId": "com.example.app"}
				}],
				"links": {"self": "https://api.appstoreconnect.apple.com/v1/apps"}
			}));
		})
		.await;
	let (client, _) = common::reqwest_client(&server, StdDuration::ZERO);
	let query = QueryParams::new().fields("apps", ["name", "bundleId"]).limit(1);
	let document = client.list_apps(Some(&query)).await.expect("App listing should succeed.");

	mock.assert_async().await;

	let app = &document.data[0];

	assert_eq!(app.id, "1234567890");
	assert_eq!(app.attributes.as_ref().and_then(|attrs| attrs.name.as_deref()), Some("Example"));
	assert_eq!(client.stats().request_count, 1);
}

#[tokio::test]
async fn conflict_envelope_surfaces_as_remote_api_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/apps")
				.header("content-type", "application/json")
				.json_body(json!({"data": {"type": "apps"}}));
			then.status(409).header("content-type", "application/json").json_body(json!({
				"errors": [{"status": "409", "code": "ENTITY_ERROR", "title": "Conflict", "detail": "SKU exists"}]
			}));
		})
		.await;
	let (client, authenticator) = common::reqwest_client(&server, StdDuration::ZERO);
	let err = client
		.post::<Value, _>("apps", &json!({"data": {"type": "apps"}}))
		.await
		.expect_err("Conflicts should surface as errors.");

	mock.assert_async().await;

	match err {
		Error::RemoteApi { status, message, errors } => {
			assert_eq!(status, 409);
			assert!(message.contains("Conflict"));
			assert!(message.contains("SKU exists"));
			assert_eq!(errors[0].code, "ENTITY_ERROR");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(authenticator.cached_token().is_some());
}

#[tokio::test]
async fn throttled_response_carries_retry_after_hint() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/builds");
			then.status(429).header("retry-after", "30").body("");
		})
		.await;
	let (client, _) = common::reqwest_client(&server, StdDuration::ZERO);
	let err = client.list_builds(None).await.expect_err("429 should surface as an error.");

	assert!(matches!(err, Error::RateLimited { .. }));
	assert_eq!(err.retry_after(), Some(time::Duration::seconds(30)));
	assert!(err.is_transient());
}

#[tokio::test]
async fn unauthorized_response_invalidates_cached_token() {
	let server = MockServer::start_async().await;
	let mut rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/apps/42");
			then.status(401).body("Unauthenticated");
		})
		.await;
	let (client, authenticator) = common::reqwest_client(&server, StdDuration::ZERO);
	let err = client.app("42", None).await.expect_err("401 should surface as an error.");

	assert!(matches!(err, Error::AuthRejected { ref message } if message == "HTTP 401: Unauthenticated"));
	assert!(authenticator.cached_token().is_none());

	rejected.delete_async().await;

	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/apps/42").header_exists("authorization");
			then.status(200).json_body(json!({"data": {"type": "apps", "id": "42"}}));
		})
		.await;
	let document = client.app("42", None).await.expect("Retry with a fresh token should succeed.");

	accepted.assert_async().await;

	assert_eq!(document.data.id, "42");
	assert!(document.data.attributes.is_none());
	assert_eq!(authenticator.signing_stats().attempts, 2);
	assert_eq!(client.stats().request_count, 2);
}

#[tokio::test]
async fn update_app_patches_only_provided_attributes() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/v1/apps/42").json_body(json!({
				"data": {"type": "apps", "id": "42", "attributes": {"primaryLocale": "en-GB"}}
			}));
			then.status(200).json_body(json!({
				"data": {"type": "apps", "id": "42", "attributes": {"primaryLocale": "en-GB"}}
			}));
		})
		.await;
	let (client, _) = common::reqwest_client(&server, StdDuration::ZERO);
	let attributes = AppAttributes { primary_locale: Some("en-GB".into()), ..Default::default() };
	let document = client.update_app("42", &attributes).await.expect("Update should succeed.");

	mock.assert_async().await;

	assert_eq!(document.data.attributes, Some(attributes));
}

#[tokio::test]
async fn delete_accepts_empty_success_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/betaTesters/7");
			then.status(204);
		})
		.await;
	let (client, _) = common::reqwest_client(&server, StdDuration::ZERO);

	client.delete::<()>("/betaTesters/7").await.expect("Delete should succeed.");
	mock.assert_async().await;
}

#[tokio::test]
async fn next_page_follows_same_origin_links_and_stops() {
	let server = MockServer::start_async().await;
	let base = common::mock_base_url(&server);
	let next = format!("{base}/apps?cursor=AQ");
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/apps").query_param("cursor", "AQ");
			then.status(200).json_body(json!({"data": [{"type": "apps", "id": "2"}]}));
		})
		.await;
	let (client, _) = common::reqwest_client(&server, StdDuration::ZERO);
	let first: Document<Vec<App>> = Document {
		data: Vec::new(),
		links: serde_json::from_value(json!({"next": next})).expect("Links should parse."),
	};
	let page = client
		.next_page(&first)
		.await
		.expect("Next page should load.")
		.expect("Next page should exist.");

	second.assert_async().await;

	assert_eq!(page.data[0].id, "2");
	assert!(client.next_page(&page).await.expect("Last page should not fail.").is_none());
}

#[tokio::test]
async fn foreign_pagination_links_are_refused() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server, StdDuration::ZERO);
	let err = client
		.get::<Value>("https://elsewhere.example.com/v1/apps", None)
		.await
		.expect_err("Foreign URLs must not receive the bearer token.");

	assert!(matches!(err, Error::Config(_)));
	assert_eq!(client.stats().request_count, 0);
}

#[tokio::test]
async fn slow_upstream_hits_the_configured_timeout() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/apps");
			then.status(200).delay(StdDuration::from_secs(3)).json_body(json!({"data": []}));
		})
		.await;
	let config = ClientConfig::builder()
		.base_url(common::mock_base_url(&server))
		.min_interval(StdDuration::ZERO)
		.request_timeout(StdDuration::from_millis(250))
		.build()
		.expect("Mock client config should build.");
	let client: ApiClient<ReqwestHttpClient> = ApiClient::with_gate(
		config,
		common::authenticator(),
		Arc::new(PacingGate::new(StdDuration::ZERO)),
		common::test_reqwest_http_client(),
	);
	let err = client.list_apps(None).await.expect_err("Slow answers should time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })), "got {err:?}");
	assert!(err.is_transient());
	assert_eq!(client.stats().request_count, 1);
}
