//! Client SDK tests against a mocked API.

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use conversions_client::{ClientError, ConversionsClient};
use conversions_types::{ConversionId, NewConversion};

fn usd_to_eur() -> NewConversion {
    NewConversion {
        amount: Decimal::new(100, 0),
        from_currency: "USD".into(),
        to_currency: "EUR".into(),
        rate: Decimal::new(9, 1),
        converted_amount: Decimal::new(90, 0),
    }
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": "Currency converter API is running"
        })))
        .mount(&server)
        .await;

    let health = ConversionsClient::new(server.uri()).health().await.unwrap();

    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_save_conversion_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/conversions"))
        .and(body_json(json!({
            "amount": "100",
            "fromCurrency": "USD",
            "toCurrency": "EUR",
            "rate": "0.9",
            "convertedAmount": "90"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "created_at": "2025-03-14T09:26:53.589Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = ConversionsClient::new(server.uri())
        .save_conversion(usd_to_eur())
        .await
        .unwrap();

    assert_eq!(saved.id, ConversionId::from_i64(7));
}

#[tokio::test]
async fn test_history_passes_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversions"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "amount": "100",
            "from_currency": "USD",
            "to_currency": "EUR",
            "conversion_rate": "0.9",
            "converted_amount": "90",
            "created_at": "2025-03-14T09:26:53.589Z"
        }])))
        .mount(&server)
        .await;

    let history = ConversionsClient::new(server.uri())
        .history(Some(1))
        .await
        .unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].conversion_rate, Decimal::new(9, 1));
}

#[tokio::test]
async fn test_stats_and_distribution() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"from_currency": "USD", "to_currency": "EUR", "count": 2}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/distribution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"currency_code": "USD", "count": 3}
        ])))
        .mount(&server)
        .await;

    let client = ConversionsClient::new(server.uri());

    assert_eq!(client.stats().await.unwrap()[0].count, 2);
    assert_eq!(client.distribution().await.unwrap()[0].currency_code, "USD");
}

#[tokio::test]
async fn test_api_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/conversions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Missing required fields",
            "code": 400
        })))
        .mount(&server)
        .await;

    let err = ConversionsClient::new(server.uri())
        .save_conversion(usd_to_eur())
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Missing required fields");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let err = ConversionsClient::new(server.uri()).stats().await.unwrap_err();

    assert!(matches!(err, ClientError::Json(_)));
}
