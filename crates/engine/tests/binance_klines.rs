use common::{Error, MarketDataSource};
use engine::BinanceClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetches_and_converts_klines() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        [
            1_700_000_000_000i64, "100.0", "101.5", "99.0", "100.5",
            "12.0", 1_700_000_899_999i64, "0", 1, "0", "0", "0"
        ],
        [
            1_700_000_900_000i64, "100.5", "102.0", "100.1", "101.9",
            "8.0", 1_700_001_799_999i64, "0", 1, "0", "0", "0"
        ]
    ]);

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "15m"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = BinanceClient::new(server.uri()).unwrap();
    let candles = client.historic_candles("BTCUSDT", "15m", 2).await.unwrap();

    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].timestamp, 1_700_000_000);
    assert_eq!(candles[1].timestamp, 1_700_000_900);
    assert_eq!(candles[1].close, 101.9);
}

#[tokio::test]
async fn http_error_status_becomes_exchange_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"code":-1121,"msg":"Invalid symbol."}"#),
        )
        .mount(&server)
        .await;

    let client = BinanceClient::new(server.uri()).unwrap();
    let err = client.historic_candles("NOPE", "1h", 10).await.unwrap_err();

    match err {
        Error::Exchange(msg) => assert!(msg.contains("400"), "unexpected message: {msg}"),
        other => panic!("expected Exchange error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_http_error() {
    // Port 9 (discard) is not listening on the test host
    let client = BinanceClient::new("http://127.0.0.1:9").unwrap();
    let err = client.historic_candles("BTCUSDT", "1h", 10).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn non_json_success_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = BinanceClient::new(server.uri()).unwrap();
    let err = client.historic_candles("BTCUSDT", "1h", 10).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
