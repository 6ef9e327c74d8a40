//! Raw period telemetry as captured from the seller dashboard.
//!
//! Field names mirror the upstream telemetry vocabulary. Every numeric field
//! is lenient: missing, `null`, or non-numeric values read as `0`.

use serde::{Deserialize, Deserializer, Serialize};

use super::Channel;

/// Telemetry for one reporting window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPeriodMetrics {
    #[serde(deserialize_with = "lenient_int")]
    pub sales: i64,
    /// Promotion sales amount in currency minor units.
    #[serde(deserialize_with = "lenient_int")]
    pub sales_amount: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub live_sales: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub live_sales_amount: i64,
    /// Live orders matched to an anchor; denominator of the per-anchor ratio.
    #[serde(deserialize_with = "lenient_int")]
    pub live_match_order_num: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub video_sales: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub video_sales_amount: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub image_text_sales: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub image_text_sales_amount: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub bind_shop_sales: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub bind_shop_sales_amount: i64,
}

/// Sales count and amount reported for a single channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelTotals {
    pub sales: i64,
    pub amount: i64,
}

impl RawPeriodMetrics {
    /// Totals for a directly reported channel.
    ///
    /// The product-card channel is never reported upstream and always reads
    /// as zero here; its figures are derived as a residual.
    pub fn channel(&self, channel: Channel) -> ChannelTotals {
        match channel {
            Channel::ProductCard => ChannelTotals::default(),
            Channel::Live => ChannelTotals {
                sales: self.live_sales,
                amount: self.live_sales_amount,
            },
            Channel::Video => ChannelTotals {
                sales: self.video_sales,
                amount: self.video_sales_amount,
            },
            Channel::ImageText => ChannelTotals {
                sales: self.image_text_sales,
                amount: self.image_text_sales_amount,
            },
            Channel::BindShop => ChannelTotals {
                sales: self.bind_shop_sales,
                amount: self.bind_shop_sales_amount,
            },
        }
    }
}

/// Any JSON/YAML scalar a capture layer might emit for a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LenientNumber {
    fn to_f64(&self) -> f64 {
        let v = match self {
            LenientNumber::Int(i) => *i as f64,
            LenientNumber::Float(f) => *f,
            LenientNumber::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            LenientNumber::Other(_) => 0.0,
        };
        if v.is_finite() { v } else { 0.0 }
    }

    fn to_i64(&self) -> i64 {
        match self {
            LenientNumber::Int(i) => *i,
            LenientNumber::Text(s) => match s.trim().parse::<i64>() {
                Ok(i) => i,
                Err(_) => self.to_f64().trunc() as i64,
            },
            _ => self.to_f64().trunc() as i64,
        }
    }
}

/// Deserialize an integer, reading anything non-numeric as `0`.
pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?.to_i64())
}

/// Deserialize a float, reading anything non-numeric or non-finite as `0`.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?.to_f64())
}
