//! Signing properties: determinism, order sensitivity, reference digests

use proptest::prelude::*;
use rstest::*;
use sapi_connector::prelude::*;
use sapi_tests::{is_lower_hex, TEST_API_KEY, TEST_SECRET};

#[fixture]
fn signer() -> BinanceSigner {
    BinanceSigner::new(BinanceCredentials::new(TEST_API_KEY, TEST_SECRET)).unwrap()
}

#[rstest]
fn test_reference_signature(signer: BinanceSigner) {
    let params = QueryParams::new()
        .with("asset", "BTC")
        .with("timestamp", 1700000000000u64);

    let signed = signer.sign_params(&params).unwrap();

    assert_eq!(signed.unsigned(), "asset=BTC&timestamp=1700000000000");
    assert_eq!(
        signed.signature(),
        "2f71eb656970f48318f2a7f09ac3e5c60e8de7ab81a1c36a733874c5d94a0724"
    );
    assert_eq!(hmac_sha256_hex(TEST_SECRET, signed.unsigned()).unwrap(), signed.signature());
}

#[rstest]
#[case("symbol", "BTC USDT", "symbol=BTC%20USDT")]
#[case("note", "a&b=c", "note=a%26b%3Dc")]
#[case("symbols", "[\"BTCUSDT\"]", "symbols=%5B%22BTCUSDT%22%5D")]
#[case("amount", "0.001", "amount=0.001")]
fn test_values_are_percent_encoded(
    signer: BinanceSigner,
    #[case] key: &str,
    #[case] value: &str,
    #[case] expected: &str,
) {
    let params = QueryParams::new().with(key, value).with("timestamp", 1);
    let signed = signer.sign_params(&params).unwrap();

    assert_eq!(signed.unsigned(), format!("{expected}&timestamp=1"));
}

#[rstest]
fn test_signature_is_last(signer: BinanceSigner) {
    let params = QueryParams::new()
        .with("timestamp", 1)
        .with("recvWindow", 5000)
        .with("asset", "ETH");

    let query = signer.sign_params(&params).unwrap().as_query();
    let (unsigned, signature) = sapi_tests::split_signature(&query).unwrap();

    assert_eq!(unsigned, "timestamp=1&recvWindow=5000&asset=ETH");
    assert_eq!(signature.len(), 64);
    assert!(is_lower_hex(signature));
}

fn params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-zA-Z]{1,10}", "[ -~]{0,20}"), 2..8)
}

fn to_params(pairs: &[(String, String)]) -> QueryParams {
    let mut params: QueryParams = pairs.iter().cloned().collect();
    params.push("timestamp", 1700000000000u64);
    params
}

proptest! {
    #[test]
    fn prop_signing_is_deterministic(pairs in params_strategy()) {
        let params = to_params(&pairs);
        let first = signer().sign_params(&params).unwrap();
        let second = signer().sign_params(&params).unwrap();

        prop_assert_eq!(first.as_query(), second.as_query());
        prop_assert_eq!(first.unsigned(), params.to_query_string());
    }

    #[test]
    fn prop_swapping_params_changes_signature(pairs in params_strategy(), i in 0usize..8, j in 0usize..8) {
        let i = i % pairs.len();
        let j = j % pairs.len();
        prop_assume!(pairs[i] != pairs[j]);

        let mut swapped = pairs.clone();
        swapped.swap(i, j);

        let original = to_params(&pairs);
        let reordered = to_params(&swapped);
        prop_assume!(original.to_query_string() != reordered.to_query_string());

        let s = signer();
        prop_assert_ne!(
            s.sign_params(&original).unwrap().signature().to_string(),
            s.sign_params(&reordered).unwrap().signature().to_string()
        );
    }

    #[test]
    fn prop_signature_is_lowercase_hex(pairs in params_strategy()) {
        let signed = signer().sign_params(&to_params(&pairs)).unwrap();

        prop_assert_eq!(signed.signature().len(), 64);
        prop_assert!(is_lower_hex(signed.signature()));
        prop_assert!(signer().validate_signature(signed.unsigned(), signed.signature()));
    }
}
