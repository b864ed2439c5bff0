use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rust_decimal::Decimal;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coinbase_exchange_client::auth::{
    CB_ACCESS_KEY, CB_ACCESS_PASSPHRASE, CB_ACCESS_SIGN, CB_ACCESS_TIMESTAMP, Credentials,
    FixedClock, StaticCredentials, compute_signature,
};
use coinbase_exchange_client::rest::RestClient;
use coinbase_exchange_client::rest::private::{OrderOptions, Pagination};
use coinbase_exchange_client::{ExchangeError, Method, OrderStatus, Side};

const TIMESTAMP: u64 = 1_700_000_000;

fn secret() -> String {
    STANDARD.encode("test_secret")
}

fn build_client(server: &MockServer) -> RestClient {
    let credentials = Arc::new(StaticCredentials::new("test_key", secret(), "test_pass"));
    RestClient::builder()
        .base_url(server.uri())
        .credentials(credentials)
        .clock(Arc::new(FixedClock::new(TIMESTAMP)))
        .build()
}

fn expected_signature(method: Method, request_path: &str, body: &str) -> String {
    let credentials = Credentials::new("test_key", secret(), "test_pass");
    compute_signature(&credentials, TIMESTAMP, method, request_path, body).unwrap()
}

fn account_json(id: &str, currency: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "currency": currency,
        "balance": "1.5000000000000000",
        "available": "1.0000000000000000",
        "hold": "0.5000000000000000",
        "profile_id": "75da88c5-05bf-4f54-bc85-5c775bd68254",
        "trading_enabled": true
    })
}

#[tokio::test]
async fn test_list_accounts_sends_signed_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(header(CB_ACCESS_KEY, "test_key"))
        .and(header(CB_ACCESS_PASSPHRASE, "test_pass"))
        .and(header(CB_ACCESS_TIMESTAMP, "1700000000"))
        .and(header(
            CB_ACCESS_SIGN,
            expected_signature(Method::Get, "/accounts", "").as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([account_json("acc-1", "BTC")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let accounts = client.list_accounts().await.unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].currency, "BTC");
    assert_eq!(accounts[0].hold, "0.5".parse().unwrap());
}

#[tokio::test]
async fn test_limit_order_body_matches_signature() {
    let server = MockServer::start().await;
    let order = serde_json::json!({
        "id": "d0c5340b-6d6c-49d9-b567-48c4bfca13d2",
        "price": "100.00000000",
        "size": "1.00000000",
        "product_id": "BTC-USD",
        "side": "buy",
        "type": "limit",
        "time_in_force": "GTC",
        "post_only": true,
        "created_at": "2024-01-01T00:00:00.000000Z",
        "status": "pending",
        "settled": false
    });

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("Content-Type", "application/json"))
        .and(header_exists(CB_ACCESS_SIGN))
        .and(body_json(serde_json::json!({
            "side": "buy",
            "product_id": "BTC-USD",
            "type": "limit",
            "price": "100",
            "size": "1",
            "post_only": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(order))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let placed = client
        .place_limit_order(
            Side::Buy,
            "btc-usd",
            Decimal::from(100),
            Decimal::from(1),
            &OrderOptions::new().post_only(true),
        )
        .await
        .unwrap();
    assert_eq!(placed.product_id, "BTC-USD");
    assert!(placed.post_only);

    let received = server.received_requests().await.unwrap();
    let request = &received[0];
    let body = String::from_utf8(request.body.clone()).unwrap();
    let sign = request.headers.get(CB_ACCESS_SIGN).unwrap().to_str().unwrap();
    assert_eq!(sign, expected_signature(Method::Post, "/orders", &body));
}

#[tokio::test]
async fn test_get_orders_signs_query_and_reads_cursors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("status", "open"))
        .and(query_param("limit", "2"))
        .and(header(
            CB_ACCESS_SIGN,
            expected_signature(Method::Get, "/orders?status=open&status=pending&limit=2", "")
                .as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("CB-BEFORE", "1071")
                .insert_header("CB-AFTER", "1050")
                .set_body_json(serde_json::json!([])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let page = client
        .get_orders(
            None,
            &[OrderStatus::Open, OrderStatus::Pending],
            &Pagination::limit(2),
        )
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.before.as_deref(), Some("1071"));
    assert_eq!(page.after.as_deref(), Some("1050"));
}

#[tokio::test]
async fn test_api_error_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "NotFound"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/orders/abc"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "invalid signature"})),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);

    match client.get_account("missing").await {
        Err(ExchangeError::Api(error)) => {
            assert!(error.is_not_found());
            assert_eq!(error.message, "NotFound");
        }
        other => panic!("expected API error, got {:?}", other),
    }

    match client.cancel_order("abc").await {
        Err(ExchangeError::Api(error)) => {
            assert!(error.is_unauthorized());
            assert!(error.is_invalid_signature());
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_private_call_without_credentials() {
    let server = MockServer::start().await;
    let client = RestClient::builder().base_url(server.uri()).build();

    let result = client.list_accounts().await;
    assert!(matches!(result, Err(ExchangeError::MissingCredentials)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_public_endpoints_are_unsigned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "iso": "2024-01-01T00:00:00.000Z",
            "epoch": 1704067200.0
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/BTC-USD/ticker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "trade_id": 86326522,
            "price": "6268.48",
            "size": "0.00698254",
            "time": "2020-03-20T00:22:57.833897Z",
            "bid": "6265.15",
            "ask": "6267.71",
            "volume": "53602.03940154"
        })))
        .mount(&server)
        .await;

    let client = RestClient::builder().base_url(server.uri()).build();
    let time = client.get_server_time().await.unwrap();
    assert_eq!(time.iso, "2024-01-01T00:00:00.000Z");

    let ticker = client.get_product_ticker("btc-usd").await.unwrap();
    assert_eq!(ticker.bid, "6265.15".parse().unwrap());

    let received = server.received_requests().await.unwrap();
    assert!(received.iter().all(|r| !r.headers.contains_key(CB_ACCESS_SIGN)));
}

#[tokio::test]
async fn test_invalid_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/self/trailing-volume"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.get_trailing_volume().await;
    assert!(matches!(result, Err(ExchangeError::InvalidResponse(_))));
}
