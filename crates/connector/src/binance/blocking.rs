//! Blocking facade over [`BinanceRestClient`]
//!
//! Each call runs to completion on a single-threaded monoio runtime with
//! the timer enabled, so transport timeouts work for synchronous callers.

use crate::binance::rest::{BinanceConfig, BinanceRestClient, DEFAULT_TIMEOUT_MS};
use crate::errors::{ConnectorError, Result};
use crate::http::MonoioHttpsClient;
use crate::traits::HttpTransport;
use crate::types::{HttpMethod, QueryParams};
use sapi_core::ClientRuntime;

use std::future::Future;

#[cfg(feature = "sapi")]
use crate::binance::sapi::{FlexibleListQuery, InterestHistoryQuery};
#[cfg(feature = "sapi")]
use crate::binance::types::{
    AssetDetail, BorrowRepayType, CoinInfo, FlexibleProduct, MarginAsset, MarginInterest, MaxBorrowable,
    TransactionId,
};
#[cfg(feature = "sapi")]
use crate::mapper::RowsList;
#[cfg(feature = "sapi")]
use rust_decimal::Decimal;
#[cfg(feature = "sapi")]
use std::collections::BTreeMap;

/// Synchronous Binance client
pub struct BlockingRestClient<T: HttpTransport = MonoioHttpsClient> {
    inner: BinanceRestClient<T>,
    runtime: ClientRuntime,
}

impl BlockingRestClient<MonoioHttpsClient> {
    /// Build the client, running endpoint discovery when configured
    ///
    /// An unset `timeout_ms` becomes [`DEFAULT_TIMEOUT_MS`].
    pub fn new(mut config: BinanceConfig) -> Result<Self> {
        config.timeout_ms.get_or_insert(DEFAULT_TIMEOUT_MS);

        let runtime = ClientRuntime::new();
        let inner = run(&runtime, BinanceRestClient::connect(config))?;
        Ok(Self { inner, runtime })
    }
}

impl<T: HttpTransport> BlockingRestClient<T> {
    pub fn from_client(inner: BinanceRestClient<T>) -> Self {
        Self {
            inner,
            runtime: ClientRuntime::new(),
        }
    }

    pub fn inner(&self) -> &BinanceRestClient<T> {
        &self.inner
    }

    pub fn send_signed_request(&self, method: HttpMethod, path: &str, params: &QueryParams) -> Result<String> {
        self.block_on(self.inner.send_signed_request(method, path, params))
    }

    pub fn call_signed(&self, method: HttpMethod, path: &str, params: QueryParams) -> Result<String> {
        self.block_on(self.inner.call_signed(method, path, params))
    }

    pub fn send_public_request(&self, method: HttpMethod, path: &str, params: &QueryParams) -> Result<String> {
        self.block_on(self.inner.send_public_request(method, path, params))
    }

    pub fn send_api_key_request(&self, method: HttpMethod, path: &str, params: &QueryParams) -> Result<String> {
        self.block_on(self.inner.send_api_key_request(method, path, params))
    }

    pub fn ping(&self) -> Result<()> {
        self.block_on(self.inner.ping())
    }

    pub fn server_time(&self) -> Result<u64> {
        self.block_on(self.inner.server_time())
    }

    fn block_on<F, R>(&self, future: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        run(&self.runtime, future)
    }
}

#[cfg(feature = "sapi")]
impl<T: HttpTransport> BlockingRestClient<T> {
    pub fn margin_asset(&self, asset: &str) -> Result<MarginAsset> {
        self.block_on(self.inner.margin_asset(asset))
    }

    pub fn margin_max_borrowable(&self, asset: &str) -> Result<MaxBorrowable> {
        self.block_on(self.inner.margin_max_borrowable(asset))
    }

    pub fn margin_borrow_repay(&self, asset: &str, amount: Decimal, kind: BorrowRepayType) -> Result<TransactionId> {
        self.block_on(self.inner.margin_borrow_repay(asset, amount, kind))
    }

    pub fn margin_interest_history(&self, query: &InterestHistoryQuery) -> Result<RowsList<MarginInterest>> {
        self.block_on(self.inner.margin_interest_history(query))
    }

    pub fn simple_earn_flexible_list(&self, query: &FlexibleListQuery) -> Result<RowsList<FlexibleProduct>> {
        self.block_on(self.inner.simple_earn_flexible_list(query))
    }

    pub fn asset_detail(&self, asset: Option<&str>) -> Result<BTreeMap<String, AssetDetail>> {
        self.block_on(self.inner.asset_detail(asset))
    }

    pub fn coin_info(&self) -> Result<Vec<CoinInfo>> {
        self.block_on(self.inner.coin_info())
    }
}

fn run<F, R>(runtime: &ClientRuntime, future: F) -> Result<R>
where
    F: Future<Output = Result<R>>,
{
    runtime
        .block_on(future)
        .map_err(|e| ConnectorError::ConfigurationError(format!("Failed to build runtime: {e}")))?
}
