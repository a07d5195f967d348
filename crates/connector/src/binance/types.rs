//! Binance SAPI record types
//!
//! Each type declares its JSON shape as a [`FieldSpec`] table and builds
//! itself from the parsed [`Record`]. Amounts are exact decimals; Binance
//! sends them as strings.

use crate::errors::Result;
use crate::mapper::{DefaultValue, FieldSpec, FieldType, FromRecord, Invariant, Record};

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

const ZERO: DefaultValue = DefaultValue::Decimal(0, 0);

/// Direction of a margin loan operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BorrowRepayType {
    Borrow,
    Repay,
}

impl BorrowRepayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowRepayType::Borrow => "BORROW",
            BorrowRepayType::Repay => "REPAY",
        }
    }
}

impl fmt::Display for BorrowRepayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `GET /sapi/v1/margin/asset`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAsset {
    pub asset_full_name: String,
    pub asset_name: String,
    pub is_borrowable: bool,
    pub is_mortgageable: bool,
    pub user_min_borrow: Decimal,
    pub user_min_repay: Decimal,
    pub delist_time: Option<i64>,
}

impl FromRecord for MarginAsset {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("assetFullName", FieldType::Str),
        FieldSpec::required("assetName", FieldType::Str).check(Invariant::NonEmpty),
        FieldSpec::with_default("isBorrowable", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("isMortgageable", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("userMinBorrow", FieldType::Decimal, ZERO).check(Invariant::NonNegative),
        FieldSpec::with_default("userMinRepay", FieldType::Decimal, ZERO).check(Invariant::NonNegative),
        FieldSpec::optional("delistTime", FieldType::Int),
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            asset_full_name: record.get_str("assetFullName")?.to_string(),
            asset_name: record.get_str("assetName")?.to_string(),
            is_borrowable: record.get_bool("isBorrowable")?,
            is_mortgageable: record.get_bool("isMortgageable")?,
            user_min_borrow: record.get_decimal("userMinBorrow")?,
            user_min_repay: record.get_decimal("userMinRepay")?,
            delist_time: record.opt_i64("delistTime")?,
        })
    }
}

/// `GET /sapi/v1/margin/maxBorrowable`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxBorrowable {
    pub amount: Decimal,
    /// Account-level cap, zero when the server omits it
    pub borrow_limit: Decimal,
}

impl FromRecord for MaxBorrowable {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("amount", FieldType::Decimal).check(Invariant::NonNegative),
        FieldSpec::with_default("borrowLimit", FieldType::Decimal, ZERO).check(Invariant::NonNegative),
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            amount: record.get_decimal("amount")?,
            borrow_limit: record.get_decimal("borrowLimit")?,
        })
    }
}

/// Transaction id returned by fund-moving endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionId {
    pub tran_id: i64,
}

impl FromRecord for TransactionId {
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("tranId", FieldType::Int).check(Invariant::Positive)];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            tran_id: record.get_i64("tranId")?,
        })
    }
}

/// One row of `GET /sapi/v1/margin/interestHistory`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginInterest {
    pub tx_id: Option<i64>,
    pub interest_accrued_time: i64,
    pub asset: String,
    pub raw_asset: Option<String>,
    pub principal: Decimal,
    pub interest: Decimal,
    pub interest_rate: Decimal,
    /// `PERIODIC`, `ON_BORROW`, `PERIODIC_CONVERTED` or `ON_BORROW_CONVERTED`
    pub interest_type: String,
    pub isolated_symbol: Option<String>,
}

impl FromRecord for MarginInterest {
    // Binance spells the accrual timestamp `interestAccuredTime`
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("txId", FieldType::Int),
        FieldSpec::required("interestAccuredTime", FieldType::Int),
        FieldSpec::required("asset", FieldType::Str),
        FieldSpec::optional("rawAsset", FieldType::Str),
        FieldSpec::required("principal", FieldType::Decimal).check(Invariant::NonNegative),
        FieldSpec::required("interest", FieldType::Decimal).check(Invariant::NonNegative),
        FieldSpec::required("interestRate", FieldType::Decimal).check(Invariant::NonNegative),
        FieldSpec::required("type", FieldType::Str).check(Invariant::OneOf(&[
            "PERIODIC",
            "ON_BORROW",
            "PERIODIC_CONVERTED",
            "ON_BORROW_CONVERTED",
        ])),
        FieldSpec::optional("isolatedSymbol", FieldType::Str),
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            tx_id: record.opt_i64("txId")?,
            interest_accrued_time: record.get_i64("interestAccuredTime")?,
            asset: record.get_str("asset")?.to_string(),
            raw_asset: record.opt_str("rawAsset")?.map(str::to_string),
            principal: record.get_decimal("principal")?,
            interest: record.get_decimal("interest")?,
            interest_rate: record.get_decimal("interestRate")?,
            interest_type: record.get_str("type")?.to_string(),
            isolated_symbol: record.opt_str("isolatedSymbol")?.map(str::to_string),
        })
    }
}

/// One row of `GET /sapi/v1/simple-earn/flexible/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleProduct {
    pub asset: String,
    pub product_id: String,
    pub latest_annual_percentage_rate: Decimal,
    pub can_purchase: bool,
    pub can_redeem: bool,
    pub is_sold_out: bool,
    pub hot: bool,
    pub min_purchase_amount: Decimal,
    pub subscription_start_time: Option<i64>,
    pub status: String,
}

impl FromRecord for FlexibleProduct {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("asset", FieldType::Str),
        FieldSpec::required("productId", FieldType::Str).check(Invariant::NonEmpty),
        FieldSpec::required("latestAnnualPercentageRate", FieldType::Decimal).check(Invariant::NonNegative),
        FieldSpec::with_default("canPurchase", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("canRedeem", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("isSoldOut", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("hot", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("minPurchaseAmount", FieldType::Decimal, ZERO).check(Invariant::NonNegative),
        FieldSpec::optional("subscriptionStartTime", FieldType::Int),
        FieldSpec::required("status", FieldType::Str),
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            asset: record.get_str("asset")?.to_string(),
            product_id: record.get_str("productId")?.to_string(),
            latest_annual_percentage_rate: record.get_decimal("latestAnnualPercentageRate")?,
            can_purchase: record.get_bool("canPurchase")?,
            can_redeem: record.get_bool("canRedeem")?,
            is_sold_out: record.get_bool("isSoldOut")?,
            hot: record.get_bool("hot")?,
            min_purchase_amount: record.get_decimal("minPurchaseAmount")?,
            subscription_start_time: record.opt_i64("subscriptionStartTime")?,
            status: record.get_str("status")?.to_string(),
        })
    }
}

/// Per-asset entry of `GET /sapi/v1/asset/assetDetail`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail {
    pub min_withdraw_amount: Decimal,
    pub deposit_status: bool,
    pub withdraw_fee: Decimal,
    pub withdraw_status: bool,
    pub deposit_tip: Option<String>,
}

impl FromRecord for AssetDetail {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("minWithdrawAmount", FieldType::Decimal).check(Invariant::NonNegative),
        FieldSpec::with_default("depositStatus", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::required("withdrawFee", FieldType::Decimal).check(Invariant::NonNegative),
        FieldSpec::with_default("withdrawStatus", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::optional("depositTip", FieldType::Str),
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            min_withdraw_amount: record.get_decimal("minWithdrawAmount")?,
            deposit_status: record.get_bool("depositStatus")?,
            withdraw_fee: record.get_decimal("withdrawFee")?,
            withdraw_status: record.get_bool("withdrawStatus")?,
            deposit_tip: record.opt_str("depositTip")?.map(str::to_string),
        })
    }
}

const NETWORK_INFO_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("network", FieldType::Str).check(Invariant::NonEmpty),
    FieldSpec::required("coin", FieldType::Str),
    FieldSpec::with_default("name", FieldType::Str, DefaultValue::Str("")),
    FieldSpec::with_default("isDefault", FieldType::Bool, DefaultValue::Bool(false)),
    FieldSpec::with_default("depositEnable", FieldType::Bool, DefaultValue::Bool(false)),
    FieldSpec::with_default("withdrawEnable", FieldType::Bool, DefaultValue::Bool(false)),
    FieldSpec::required("withdrawFee", FieldType::Decimal).check(Invariant::NonNegative),
    FieldSpec::required("withdrawMin", FieldType::Decimal).check(Invariant::NonNegative),
    FieldSpec::with_default("withdrawMax", FieldType::Decimal, ZERO).check(Invariant::NonNegative),
    FieldSpec::with_default("withdrawIntegerMultiple", FieldType::Decimal, ZERO),
];

/// Deposit/withdraw network of a coin
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub network: String,
    pub coin: String,
    pub name: String,
    pub is_default: bool,
    pub deposit_enable: bool,
    pub withdraw_enable: bool,
    pub withdraw_fee: Decimal,
    pub withdraw_min: Decimal,
    pub withdraw_max: Decimal,
    pub withdraw_integer_multiple: Decimal,
}

impl FromRecord for NetworkInfo {
    const FIELDS: &'static [FieldSpec] = NETWORK_INFO_FIELDS;

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            network: record.get_str("network")?.to_string(),
            coin: record.get_str("coin")?.to_string(),
            name: record.get_str("name")?.to_string(),
            is_default: record.get_bool("isDefault")?,
            deposit_enable: record.get_bool("depositEnable")?,
            withdraw_enable: record.get_bool("withdrawEnable")?,
            withdraw_fee: record.get_decimal("withdrawFee")?,
            withdraw_min: record.get_decimal("withdrawMin")?,
            withdraw_max: record.get_decimal("withdrawMax")?,
            withdraw_integer_multiple: record.get_decimal("withdrawIntegerMultiple")?,
        })
    }
}

/// Entry of `GET /sapi/v1/capital/config/getall`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    pub coin: String,
    pub name: String,
    pub deposit_all_enable: bool,
    pub withdraw_all_enable: bool,
    pub free: Decimal,
    pub locked: Decimal,
    pub trading: bool,
    pub network_list: Vec<NetworkInfo>,
}

impl CoinInfo {
    pub fn default_network(&self) -> Option<&NetworkInfo> {
        self.network_list.iter().find(|n| n.is_default)
    }
}

impl FromRecord for CoinInfo {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("coin", FieldType::Str).check(Invariant::NonEmpty),
        FieldSpec::with_default("name", FieldType::Str, DefaultValue::Str("")),
        FieldSpec::with_default("depositAllEnable", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("withdrawAllEnable", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("free", FieldType::Decimal, ZERO).check(Invariant::NonNegative),
        FieldSpec::with_default("locked", FieldType::Decimal, ZERO).check(Invariant::NonNegative),
        FieldSpec::with_default("trading", FieldType::Bool, DefaultValue::Bool(false)),
        FieldSpec::with_default("networkList", FieldType::RecordList(NETWORK_INFO_FIELDS), DefaultValue::EmptyList),
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            coin: record.get_str("coin")?.to_string(),
            name: record.get_str("name")?.to_string(),
            deposit_all_enable: record.get_bool("depositAllEnable")?,
            withdraw_all_enable: record.get_bool("withdrawAllEnable")?,
            free: record.get_decimal("free")?,
            locked: record.get_decimal("locked")?,
            trading: record.get_bool("trading")?,
            network_list: record.list_of("networkList")?,
        })
    }
}
