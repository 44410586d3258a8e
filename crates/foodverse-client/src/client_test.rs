use super::*;

fn test_client(base_url: &str) -> FoodverseClient {
    FoodverseClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

#[test]
fn endpoint_keeps_api_prefix() {
    let client = test_client("http://localhost:7000/api/v1");
    let url = client.endpoint("stores/search").unwrap();
    assert_eq!(url.as_str(), "http://localhost:7000/api/v1/stores/search");
}

#[test]
fn endpoint_tolerates_trailing_slashes() {
    let client = test_client("http://localhost:7000/api/v1//");
    let url = client.endpoint("orders/42/status").unwrap();
    assert_eq!(url.as_str(), "http://localhost:7000/api/v1/orders/42/status");
}

#[test]
fn with_base_url_rejects_relative_url() {
    let result = FoodverseClient::with_base_url("api/v1", 30);
    assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
}

#[test]
fn blank_token_counts_as_none() {
    let mut client = test_client("http://localhost:7000/api/v1");
    client.set_token(Some("   ".to_string()));
    assert!(!client.has_token());

    let client = client.with_token("jwt");
    assert!(client.has_token());
}

#[test]
fn error_message_prefers_error_field() {
    assert_eq!(
        error_message(r#"{"error":"Food bag not found"}"#),
        "Food bag not found"
    );
}

#[test]
fn error_message_falls_back_to_raw_body() {
    assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    assert_eq!(error_message(""), "empty response body");
    assert_eq!(error_message(r#"{"message":"nope"}"#), r#"{"message":"nope"}"#);
}

#[test]
fn list_body_accepts_bare_and_wrapped_arrays() {
    let bare: ListBody<i64> = serde_json::from_str("[1,2]").unwrap();
    assert_eq!(bare.into_vec(), vec![1, 2]);

    let wrapped: ListBody<i64> = serde_json::from_str(r#"{"data":[3]}"#).unwrap();
    assert_eq!(wrapped.into_vec(), vec![3]);

    let null: ListBody<i64> = serde_json::from_str(r#"{"data":null}"#).unwrap();
    assert!(null.into_vec().is_empty());

    let null: ListBody<i64> = serde_json::from_str("null").unwrap();
    assert!(null.into_vec().is_empty());
}

#[test]
fn list_body_rejects_object_without_data() {
    assert!(serde_json::from_str::<ListBody<i64>>(r#"{"stores":[1]}"#).is_err());
    assert!(serde_json::from_str::<ListBody<i64>>("{}").is_err());
}
