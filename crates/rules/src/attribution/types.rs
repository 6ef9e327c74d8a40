//! Report types produced by the channel attributor.

use serde::{Deserialize, Serialize};

use crate::schema::{Channel, ChannelField, MetricKey};

use super::math::parse_display_number;

/// Derived statistics for one attribution channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStat {
    pub name: String,
    /// Units sold; negative for an inconsistent product-card residual.
    pub volume: i64,
    /// Share of total volume, two decimals with a trailing `%`.
    pub share_percent: String,
    pub daily_average: String,
    pub average_price: String,
}

/// Ratios derived across channels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtraStats {
    pub live_orders_per_anchor: f64,
    /// Live average price minus the caller-supplied reference unit price.
    pub live_vs_card_price_diff: f64,
}

/// Per-channel breakdown of one telemetry window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub days: u32,
    pub total_sales: i64,
    /// Ordered as [`Channel::ALL`].
    pub channels: [ChannelStat; 5],
    pub extra: ExtraStats,
}

/// A report value located by a [`MetricKey`], in its stored form.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue<'a> {
    Count(i64),
    Number(f64),
    /// Formatted text such as `"40.00%"` or `"5.71"`.
    Display(&'a str),
}

impl MetricValue<'_> {
    /// Numeric reading of the value; formatted text drops a trailing `%`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Count(c) => Some(*c as f64),
            MetricValue::Number(n) => n.is_finite().then_some(*n),
            MetricValue::Display(s) => parse_display_number(s),
        }
    }
}

impl PeriodReport {
    pub fn channel(&self, channel: Channel) -> &ChannelStat {
        &self.channels[channel.index()]
    }

    /// Locate the value a metric key refers to.
    pub fn resolve(&self, key: MetricKey) -> MetricValue<'_> {
        match key {
            MetricKey::TotalSales => MetricValue::Count(self.total_sales),
            MetricKey::LiveSpec => MetricValue::Number(self.extra.live_orders_per_anchor),
            MetricKey::LiveSalesDiff => MetricValue::Number(self.extra.live_vs_card_price_diff),
            MetricKey::Channel(channel, field) => {
                let stat = self.channel(channel);
                match field {
                    ChannelField::Volume => MetricValue::Count(stat.volume),
                    ChannelField::Share => MetricValue::Display(&stat.share_percent),
                    ChannelField::Daily => MetricValue::Display(&stat.daily_average),
                    ChannelField::Price => MetricValue::Display(&stat.average_price),
                }
            }
        }
    }

    /// Resolve a metric key string to a number. `None` for unknown keys.
    pub fn metric(&self, key: &str) -> Option<f64> {
        MetricKey::lookup(key).and_then(|k| self.resolve(k).as_f64())
    }
}
