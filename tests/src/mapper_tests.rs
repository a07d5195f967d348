//! Response mapper against realistic SAPI bodies

use rstest::*;
use rust_decimal::Decimal;
use sapi_connector::prelude::*;
use serde_json::json;
use std::str::FromStr;

const ROW: &[FieldSpec] = &[
    FieldSpec::required("asset", FieldType::Str),
    FieldSpec::required("amount", FieldType::Decimal).check(Invariant::NonNegative),
    FieldSpec::with_default("status", FieldType::Str, DefaultValue::Str("CONFIRMED")),
    FieldSpec::with_default("timestamp", FieldType::Int, DefaultValue::Int(0)),
];

#[test]
fn test_rows_list_total_and_rows() {
    let body = json!({
        "total": 5,
        "rows": [
            {"asset": "BTC", "amount": "0.5", "timestamp": 1},
            {"asset": "USDT", "amount": "100", "status": "PENDING"}
        ]
    });

    let page = parse_rows_list(&body, ROW).unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rows[0].get_i64("timestamp").unwrap(), 1);
    assert_eq!(page.rows[1].get_i64("timestamp").unwrap(), 0);
    assert_eq!(page.rows[1].get_str("status").unwrap(), "PENDING");
}

#[test]
fn test_missing_field_takes_default() {
    let record = parse_record(&json!({"asset": "ETH", "amount": 2}), ROW).unwrap();

    assert_eq!(record.get_str("status").unwrap(), "CONFIRMED");
    assert_eq!(record.get_decimal("amount").unwrap(), Decimal::from(2));
}

#[test]
fn test_negative_min_withdraw_amount_rejected() {
    let err = map_keyed::<AssetDetail>(r#"{"BTC":{"minWithdrawAmount":-1,"withdrawFee":"0.0005"}}"#).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    match err {
        ConnectorError::ValidationError { field, value, constraint } => {
            assert_eq!(field, "BTC.minWithdrawAmount");
            assert_eq!(value, "-1");
            assert_eq!(constraint, "non-negative");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case(json!({"amount": "1"}), "asset", "string")]
#[case(json!({"asset": "BTC"}), "amount", "decimal")]
#[case(json!({"asset": "BTC", "amount": null}), "amount", "decimal")]
#[case(json!({"asset": ["BTC"], "amount": "1"}), "asset", "string")]
#[case(json!({"asset": "BTC", "amount": true}), "amount", "decimal")]
#[case(json!({"asset": "BTC", "amount": "1", "timestamp": "soon"}), "timestamp", "integer")]
fn test_parse_errors_name_the_field(#[case] body: serde_json::Value, #[case] field: &str, #[case] expected: &str) {
    let err = parse_record(&body, ROW).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parsing);
    assert_eq!(err, ConnectorError::ParseError {
        field: field.to_string(),
        expected: expected.to_string(),
    });
}

#[rstest]
#[case(json!(0.00000001), "0.00000001")]
#[case(json!("0.00000001"), "0.00000001")]
#[case(json!("1e-8"), "0.00000001")]
#[case(json!(70), "70")]
fn test_decimal_coercion(#[case] amount: serde_json::Value, #[case] expected: &str) {
    let record = parse_record(&json!({"asset": "BTC", "amount": amount}), ROW).unwrap();

    assert_eq!(record.get_decimal("amount").unwrap(), Decimal::from_str(expected).unwrap());
}

#[test]
fn test_rows_total_must_be_unsigned_integer() {
    assert_eq!(parse_rows_list(&json!({"total": "7"}), ROW).unwrap().total, 7);
    assert_eq!(
        parse_rows_list(&json!({"total": 1.5, "rows": []}), ROW).unwrap_err(),
        ConnectorError::ParseError {
            field: "total".to_string(),
            expected: "integer".to_string(),
        }
    );
    assert_eq!(
        parse_rows_list(&json!({"total": 1, "rows": {}}), ROW).unwrap_err(),
        ConnectorError::ParseError {
            field: "rows".to_string(),
            expected: "array of objects".to_string(),
        }
    );
}

#[test]
fn test_typed_interest_history_page() {
    let body = r#"{"total":2,"rows":[{"txId":1,"interestAccuredTime":1672160400000,"asset":"USDT",
        "principal":"45.3313","interest":"0.00024995","interestRate":"0.00013233","type":"ON_BORROW"}]}"#;

    let page = map_rows_list::<MarginInterest>(body).unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].interest_type, "ON_BORROW");
    assert_eq!(page.rows[0].principal, Decimal::from_str("45.3313").unwrap());
}

#[test]
fn test_coin_info_network_error_path() {
    let body = r#"[{"coin":"BNB","networkList":[{"network":"BSC","coin":"BNB","withdrawFee":"0.0005"}]}]"#;

    let err = map_list::<CoinInfo>(body).unwrap_err();
    assert_eq!(err, ConnectorError::ParseError {
        field: "[0].networkList[0].withdrawMin".to_string(),
        expected: "decimal".to_string(),
    });
}

#[test]
fn test_malformed_json_is_parsing_error() {
    let err = map_record::<MaxBorrowable>("{\"amount\":").unwrap_err();
    assert!(matches!(err, ConnectorError::SerializationError(_)));
    assert_eq!(err.kind(), ErrorKind::Parsing);
}
