//! Signed request client end to end over a recording transport

use rust_decimal::Decimal;
use sapi_connector::prelude::*;
use sapi_tests::{is_lower_hex, signed_client, split_signature, test_config, RecordingTransport, TEST_API_KEY};
use serial_test::serial;

#[monoio::test]
async fn test_margin_asset_signed_get() {
    let body = r#"{"assetFullName":"Bitcoin","assetName":"BTC","isBorrowable":true,"isMortgageable":true}"#;
    let client = signed_client(RecordingTransport::new().respond(200, body));

    let params = QueryParams::new()
        .with("asset", "BTC")
        .with("timestamp", 1700000000000u64);
    let raw = client
        .send_signed_request(HttpMethod::Get, "/sapi/v1/margin/asset", &params)
        .await
        .unwrap();

    assert_eq!(raw, body);
    assert_eq!(client.transport().calls(), 1);

    let request = client.transport().last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.header("X-MBX-APIKEY"), Some(TEST_API_KEY));

    let (unsigned, signature) = split_signature(request.query().unwrap()).unwrap();
    assert_eq!(unsigned, "asset=BTC&timestamp=1700000000000");
    assert_eq!(signature, "2f71eb656970f48318f2a7f09ac3e5c60e8de7ab81a1c36a733874c5d94a0724");
    assert!(is_lower_hex(signature));
}

#[monoio::test]
async fn test_illegal_characters_api_error() {
    let client = signed_client(
        RecordingTransport::new().respond(400, r#"{"code":-1100,"msg":"Illegal characters"}"#),
    );

    let err = client
        .send_signed_request(
            HttpMethod::Get,
            "/sapi/v1/margin/asset",
            &QueryParams::new().with("asset", "BTC").with("timestamp", 1),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.api_code(), Some(-1100));
    assert_eq!(err, ConnectorError::ApiError {
        status: 400,
        code: -1100,
        msg: "Illegal characters".to_string(),
    });
    assert_eq!(client.transport().calls(), 1);
}

#[monoio::test]
async fn test_non_json_error_body() {
    let client = signed_client(RecordingTransport::new().respond(502, "<html>Bad Gateway</html>"));

    let err = client.margin_asset("BTC").await.unwrap_err();
    assert_eq!(err, ConnectorError::HttpError(502, "<html>Bad Gateway</html>".to_string()));
}

#[monoio::test]
async fn test_network_failure_is_not_retried() {
    let client = signed_client(
        RecordingTransport::new()
            .fail(ConnectorError::NetworkError("connection reset".to_string()))
            .respond(200, "{}"),
    );

    let err = client.coin_info().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(client.transport().calls(), 1);
}

#[monoio::test]
async fn test_wrappers_send_recv_window() {
    let client = signed_client(
        RecordingTransport::new()
            .respond(200, r#"{"amount":"1.5","borrowLimit":"60"}"#)
            .respond(200, r#"{"total":0,"rows":[]}"#),
    );

    let max = client.margin_max_borrowable("BTC").await.unwrap();
    assert_eq!(max.amount, Decimal::new(15, 1));

    let page = client
        .margin_interest_history(&InterestHistoryQuery::for_asset("BTC").between(1, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert!(page.rows.is_empty());

    for request in client.transport().requests() {
        let query = request.query().unwrap();
        assert!(query.contains("&recvWindow=5000&signature="), "{query}");
    }
}

#[monoio::test]
async fn test_borrow_repay_form_body() {
    let client = signed_client(RecordingTransport::new().respond(200, r#"{"tranId":100000001}"#));

    let tran = client
        .margin_borrow_repay("USDT", Decimal::new(25, 0), BorrowRepayType::Repay)
        .await
        .unwrap();
    assert_eq!(tran.tran_id, 100000001);

    let request = client.transport().last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.query(), None);
    assert_eq!(request.header("Content-Type"), Some("application/x-www-form-urlencoded"));

    let body = request.body.unwrap();
    let (unsigned, signature) = split_signature(&body).unwrap();
    assert!(unsigned.starts_with("asset=USDT&isIsolated=FALSE&amount=25&type=REPAY&timestamp="));
    assert_eq!(hmac_sha256_hex(sapi_tests::TEST_SECRET, unsigned).unwrap(), signature);
}

#[monoio::test]
async fn test_asset_detail_single_asset() {
    let client = signed_client(RecordingTransport::new().respond(
        200,
        r#"{"CTR":{"minWithdrawAmount":"70.00000000","depositStatus":false,"withdrawFee":35,"withdrawStatus":true}}"#,
    ));

    let details = client.asset_detail(Some("CTR")).await.unwrap();

    assert_eq!(details["CTR"].withdraw_fee, Decimal::from(35));
    let url = client.transport().last_request().unwrap().url;
    assert!(url.contains("/sapi/v1/asset/assetDetail?asset=CTR&timestamp="));
}

#[monoio::test]
async fn test_connect_discovers_first_reachable_host() {
    let transport = RecordingTransport::new()
        .fail(ConnectorError::Timeout("connect".to_string()))
        .respond(200, "{}");
    let config = test_config().with_auto_discover(true);

    let client = BinanceRestClient::connect_with(config, transport).await.unwrap();

    assert_eq!(client.base_url(), "https://api-gcp.binance.com");
    let urls: Vec<String> = client.transport().requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec![
        "https://api.binance.com/api/v3/ping".to_string(),
        "https://api-gcp.binance.com/api/v3/ping".to_string(),
    ]);
}

#[test]
fn test_blocking_client_round_trip() {
    let client = BinanceRestClient::with_transport(
        test_config(),
        RecordingTransport::new().respond(200, r#"{"serverTime":1700000000000}"#),
    )
    .unwrap();
    let blocking = BlockingRestClient::from_client(client);

    assert_eq!(blocking.server_time().unwrap(), 1700000000000);
    assert_eq!(blocking.inner().transport().calls(), 1);
}

#[test]
#[serial]
fn test_env_credentials() {
    std::env::set_var("BINANCE_API_KEY", "env_key");
    std::env::set_var("BINANCE_SECRET_KEY", "env_secret");

    let config = BinanceConfig::default().with_env_credentials().unwrap();
    assert_eq!(config.api_key, "env_key");
    assert_eq!(config.api_secret, "env_secret");

    std::env::remove_var("BINANCE_SECRET_KEY");
    let err = BinanceConfig::default().with_env_credentials().unwrap_err();
    assert_eq!(err, ConnectorError::MissingCredentials("BINANCE_SECRET_KEY".to_string()));

    std::env::remove_var("BINANCE_API_KEY");
}

#[test]
#[serial]
fn test_credentials_from_env_missing_key() {
    std::env::remove_var("BINANCE_API_KEY");

    let err = BinanceCredentials::from_env().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);
}
