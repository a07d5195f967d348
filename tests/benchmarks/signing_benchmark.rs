//! Request signing and response mapping throughput
//!
//! - HMAC-SHA256 over a typical signed query
//! - Query encoding with values that need escaping
//! - Mapping a `{total, rows}` page into typed records

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sapi_connector::prelude::*;

fn signing_benchmark(c: &mut Criterion) {
    let signer = BinanceSigner::new(BinanceCredentials::new("bench_key", "bench_secret")).unwrap();
    let params = QueryParams::new()
        .with("asset", "BTC")
        .with("isIsolated", "FALSE")
        .with("amount", "0.00125")
        .with("type", "BORROW")
        .with("timestamp", 1700000000000u64)
        .with("recvWindow", 5000);

    c.bench_function("sign_params", |b| {
        b.iter(|| signer.sign_params(black_box(&params)).unwrap())
    });

    let escaped = QueryParams::new()
        .with("symbols", "[\"BTCUSDT\",\"ETHUSDT\",\"BNBUSDT\"]")
        .with("timestamp", 1700000000000u64);

    c.bench_function("to_query_string_escaped", |b| {
        b.iter(|| black_box(&escaped).to_query_string())
    });
}

fn mapping_benchmark(c: &mut Criterion) {
    let row = r#"{"txId":1352286576452864727,"interestAccuredTime":1672160400000,"asset":"USDT",
        "principal":"45.3313","interest":"0.00024995","interestRate":"0.00013233","type":"ON_BORROW"}"#;
    let body = format!(r#"{{"total":100,"rows":[{}]}}"#, vec![row; 100].join(","));

    c.bench_function("map_rows_list_100", |b| {
        b.iter(|| map_rows_list::<MarginInterest>(black_box(&body)).unwrap())
    });
}

criterion_group!(benches, signing_benchmark, mapping_benchmark);
criterion_main!(benches);
