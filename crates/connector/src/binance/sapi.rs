//! SAPI endpoint wrappers
//!
//! Each wrapper builds its parameters, goes through
//! [`BinanceRestClient::call_signed`] and maps the body with one mapper call.

use crate::binance::rest::BinanceRestClient;
use crate::binance::types::{
    AssetDetail, BorrowRepayType, CoinInfo, FlexibleProduct, MarginAsset, MarginInterest, MaxBorrowable,
    TransactionId,
};
use crate::errors::Result;
use crate::mapper::{RowsList, map_keyed, map_list, map_record, map_rows_list};
use crate::traits::HttpTransport;
use crate::types::{HttpMethod, QueryParams};

use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const MARGIN_ASSET: &str = "/sapi/v1/margin/asset";
pub const MARGIN_MAX_BORROWABLE: &str = "/sapi/v1/margin/maxBorrowable";
pub const MARGIN_BORROW_REPAY: &str = "/sapi/v1/margin/borrow-repay";
pub const MARGIN_INTEREST_HISTORY: &str = "/sapi/v1/margin/interestHistory";
pub const SIMPLE_EARN_FLEXIBLE_LIST: &str = "/sapi/v1/simple-earn/flexible/list";
pub const ASSET_DETAIL: &str = "/sapi/v1/asset/assetDetail";
pub const CAPITAL_CONFIG_GETALL: &str = "/sapi/v1/capital/config/getall";

/// Filters for `/sapi/v1/margin/interestHistory`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestHistoryQuery {
    pub asset: Option<String>,
    pub isolated_symbol: Option<String>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    /// 1-based page
    pub current: Option<u32>,
    /// Page size, Binance caps it at 100
    pub size: Option<u32>,
}

impl InterestHistoryQuery {
    pub fn for_asset(asset: impl Into<String>) -> Self {
        Self {
            asset: Some(asset.into()),
            ..Default::default()
        }
    }

    pub fn page(mut self, current: u32, size: u32) -> Self {
        self.current = Some(current);
        self.size = Some(size);
        self
    }

    pub fn between(mut self, start_time: u64, end_time: u64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("asset", self.asset.as_deref())
            .with_opt("isolatedSymbol", self.isolated_symbol.as_deref())
            .with_opt("startTime", self.start_time)
            .with_opt("endTime", self.end_time)
            .with_opt("current", self.current)
            .with_opt("size", self.size)
    }
}

/// Filters for `/sapi/v1/simple-earn/flexible/list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlexibleListQuery {
    pub asset: Option<String>,
    pub current: Option<u32>,
    pub size: Option<u32>,
}

impl FlexibleListQuery {
    pub fn for_asset(asset: impl Into<String>) -> Self {
        Self {
            asset: Some(asset.into()),
            ..Default::default()
        }
    }

    pub fn page(mut self, current: u32, size: u32) -> Self {
        self.current = Some(current);
        self.size = Some(size);
        self
    }

    fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("asset", self.asset.as_deref())
            .with_opt("current", self.current)
            .with_opt("size", self.size)
    }
}

impl<T: HttpTransport> BinanceRestClient<T> {
    /// Margin asset information
    pub async fn margin_asset(&self, asset: &str) -> Result<MarginAsset> {
        let params = QueryParams::new().with("asset", asset);
        let body = self.call_signed(HttpMethod::Get, MARGIN_ASSET, params).await?;
        map_record(&body)
    }

    /// Maximum amount the account can currently borrow
    pub async fn margin_max_borrowable(&self, asset: &str) -> Result<MaxBorrowable> {
        let params = QueryParams::new().with("asset", asset);
        let body = self.call_signed(HttpMethod::Get, MARGIN_MAX_BORROWABLE, params).await?;
        map_record(&body)
    }

    /// Cross-margin borrow or repay
    pub async fn margin_borrow_repay(
        &self,
        asset: &str,
        amount: Decimal,
        kind: BorrowRepayType,
    ) -> Result<TransactionId> {
        let params = QueryParams::new()
            .with("asset", asset)
            .with("isIsolated", "FALSE")
            .with("amount", amount)
            .with("type", kind);
        let body = self.call_signed(HttpMethod::Post, MARGIN_BORROW_REPAY, params).await?;
        map_record(&body)
    }

    pub async fn margin_interest_history(&self, query: &InterestHistoryQuery) -> Result<RowsList<MarginInterest>> {
        let body = self
            .call_signed(HttpMethod::Get, MARGIN_INTEREST_HISTORY, query.to_params())
            .await?;
        map_rows_list(&body)
    }

    pub async fn simple_earn_flexible_list(&self, query: &FlexibleListQuery) -> Result<RowsList<FlexibleProduct>> {
        let body = self
            .call_signed(HttpMethod::Get, SIMPLE_EARN_FLEXIBLE_LIST, query.to_params())
            .await?;
        map_rows_list(&body)
    }

    /// Withdraw limits and fees keyed by asset; `None` returns every asset
    pub async fn asset_detail(&self, asset: Option<&str>) -> Result<BTreeMap<String, AssetDetail>> {
        let params = QueryParams::new().with_opt("asset", asset);
        let body = self.call_signed(HttpMethod::Get, ASSET_DETAIL, params).await?;
        map_keyed(&body)
    }

    /// Every coin with its deposit/withdraw networks
    pub async fn coin_info(&self) -> Result<Vec<CoinInfo>> {
        let body = self
            .call_signed(HttpMethod::Get, CAPITAL_CONFIG_GETALL, QueryParams::new())
            .await?;
        map_list(&body)
    }
}
