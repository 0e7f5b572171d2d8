//! Order ⇄ field-mapping codec.
//!
//! A staged order is a flat mapping of attribute name to string value. The
//! mapping is stored as a JSON object in the bucket's hash field.
//!
//! - Decimals render in plain notation with their scale kept (`0.1`,
//!   `50000`, never `1E-1`).
//! - Timestamps render as UTC without offset and with nine fractional
//!   digits: `2025-01-04T22:41:48.610319439`.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use coinstage_types::constants::{fields, TIMESTAMP_FORMAT, TIMESTAMP_PARSE_FORMAT};
use coinstage_types::{Order, OrderId, Result, StagingError};
use rust_decimal::Decimal;

/// Attribute name → stringified value.
pub type FieldMap = BTreeMap<String, String>;

/// Serialize an order into its full field mapping.
#[must_use]
pub fn encode_order(order: &Order) -> FieldMap {
    let mut map = FieldMap::new();
    map.insert(fields::UUID.into(), order.id.to_string());
    map.insert(fields::COIN_NAME.into(), order.coin_name.clone());
    map.insert(fields::MARKET_NAME.into(), order.market_name.clone());
    map.insert(fields::COIN_AMOUNT.into(), format_decimal(order.amount));
    map.insert(fields::ORDER_PRICE.into(), format_decimal(order.price));
    map.insert(fields::ORDER_TYPE.into(), order.side.to_string());
    map.insert(fields::FEE.into(), format_decimal(order.fee));
    map.insert(fields::MEMBER_IDX.into(), order.member_idx.to_string());
    map.insert(fields::MEMBER_UUID.into(), order.member_uuid.clone());
    map.insert(fields::ORDER_STATUS.into(), order.status.to_string());
    map.insert(fields::CREATED_AT.into(), format_timestamp(&order.created_at));
    map
}

/// Rebuild a typed order from a full field mapping.
///
/// # Errors
/// `Serialization` if a field is missing or does not parse.
pub fn decode_order(map: &FieldMap) -> Result<Order> {
    Ok(Order {
        id: OrderId::new(required(map, fields::UUID)?),
        coin_name: required(map, fields::COIN_NAME)?.to_string(),
        market_name: required(map, fields::MARKET_NAME)?.to_string(),
        amount: parse_decimal(required(map, fields::COIN_AMOUNT)?)?,
        price: parse_decimal(required(map, fields::ORDER_PRICE)?)?,
        side: parse_field(map, fields::ORDER_TYPE)?,
        fee: parse_decimal(required(map, fields::FEE)?)?,
        member_idx: parse_field(map, fields::MEMBER_IDX)?,
        member_uuid: required(map, fields::MEMBER_UUID)?.to_string(),
        status: parse_field(map, fields::ORDER_STATUS)?,
        created_at: parse_timestamp(required(map, fields::CREATED_AT)?)?,
    })
}

/// Render a mapping as the JSON object stored in a hash field.
pub fn to_value(map: &FieldMap) -> Result<String> {
    Ok(serde_json::to_string(map)?)
}

/// Parse a stored hash-field value back into a mapping.
///
/// Anything other than a flat JSON object of strings is rejected.
pub fn from_value(raw: &str) -> Result<FieldMap> {
    Ok(serde_json::from_str(raw)?)
}

#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    // `Display` for `Decimal` never uses exponent notation.
    value.to_string()
}

/// # Errors
/// `Serialization` for anything that is not a plain decimal literal.
pub fn parse_decimal(raw: &str) -> Result<Decimal> {
    if raw.contains(['e', 'E']) {
        return Err(StagingError::serialization(format!(
            "bad decimal `{raw}`: exponent notation is not allowed"
        )));
    }
    Decimal::from_str(raw)
        .map_err(|e| StagingError::serialization(format!("bad decimal `{raw}`: {e}")))
}

#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

/// # Errors
/// `Serialization` if `raw` is not `YYYY-MM-DDTHH:MM:SS[.f]`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| StagingError::serialization(format!("bad timestamp `{raw}`: {e}")))
}

fn required<'a>(map: &'a FieldMap, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| StagingError::serialization(format!("missing field `{name}`")))
}

fn parse_field<T>(map: &FieldMap, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required(map, name)?;
    raw.parse()
        .map_err(|e| StagingError::serialization(format!("bad `{name}` value `{raw}`: {e}")))
}
