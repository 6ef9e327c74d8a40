//! Attribution channels and the closed set of metric keys rules can target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five attribution buckets for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Residual bucket: promotion total minus the four reported channels.
    ProductCard,
    Live,
    Video,
    ImageText,
    BindShop,
}

impl Channel {
    /// All channels in report order.
    pub const ALL: [Channel; 5] = [
        Channel::ProductCard,
        Channel::Live,
        Channel::Video,
        Channel::ImageText,
        Channel::BindShop,
    ];

    /// Channels the upstream telemetry reports directly.
    pub const REPORTED: [Channel; 4] = [
        Channel::Live,
        Channel::Video,
        Channel::ImageText,
        Channel::BindShop,
    ];

    /// Position of this channel in `PeriodReport::channels`.
    pub fn index(self) -> usize {
        match self {
            Channel::ProductCard => 0,
            Channel::Live => 1,
            Channel::Video => 2,
            Channel::ImageText => 3,
            Channel::BindShop => 4,
        }
    }

    /// Prefix used in metric keys (`card_share`, `live_daily`, ...).
    pub fn key_prefix(self) -> &'static str {
        match self {
            Channel::ProductCard => "card",
            Channel::Live => "live",
            Channel::Video => "video",
            Channel::ImageText => "image_text",
            Channel::BindShop => "bind_shop",
        }
    }

    /// Display name carried in `ChannelStat::name`.
    pub fn display_name(self) -> &'static str {
        match self {
            Channel::ProductCard => "Product card",
            Channel::Live => "Live",
            Channel::Video => "Short video",
            Channel::ImageText => "Image-text",
            Channel::BindShop => "Storefront bind",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Channel::ALL.into_iter().find(|c| c.key_prefix() == prefix)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-channel statistic addressable by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelField {
    Volume,
    Share,
    Daily,
    Price,
}

impl ChannelField {
    pub const ALL: [ChannelField; 4] = [
        ChannelField::Volume,
        ChannelField::Share,
        ChannelField::Daily,
        ChannelField::Price,
    ];

    fn suffix(self) -> &'static str {
        match self {
            ChannelField::Volume => "sales",
            ChannelField::Share => "share",
            ChannelField::Daily => "daily",
            ChannelField::Price => "price",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        ChannelField::ALL.into_iter().find(|f| f.suffix() == suffix)
    }
}

/// A recognized rule target.
///
/// Keys are either `<channel>_<field>` (e.g. `card_share`, `live_daily`,
/// `image_text_price`) or one of the report-level keys `totalSales`,
/// `liveSpec` (live orders per anchor) and `liveSalesDiff` (live average
/// price minus the reference unit price).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    Channel(Channel, ChannelField),
    TotalSales,
    LiveSpec,
    LiveSalesDiff,
}

impl MetricKey {
    /// Parse a rule target. Returns `None` for unrecognized keys.
    pub fn lookup(key: &str) -> Option<Self> {
        key.parse().ok()
    }

    /// Every recognized key, in a stable order.
    pub fn all() -> Vec<MetricKey> {
        let mut keys = Vec::with_capacity(Channel::ALL.len() * ChannelField::ALL.len() + 3);
        for channel in Channel::ALL {
            for field in ChannelField::ALL {
                keys.push(MetricKey::Channel(channel, field));
            }
        }
        keys.push(MetricKey::TotalSales);
        keys.push(MetricKey::LiveSpec);
        keys.push(MetricKey::LiveSalesDiff);
        keys
    }

    /// Every recognized key rendered as a string.
    pub fn all_names() -> Vec<String> {
        Self::all().into_iter().map(|k| k.to_string()).collect()
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKey::Channel(channel, field) => {
                write!(f, "{}_{}", channel.key_prefix(), field.suffix())
            }
            MetricKey::TotalSales => write!(f, "totalSales"),
            MetricKey::LiveSpec => write!(f, "liveSpec"),
            MetricKey::LiveSalesDiff => write!(f, "liveSalesDiff"),
        }
    }
}

impl FromStr for MetricKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "totalSales" => return Ok(MetricKey::TotalSales),
            "liveSpec" => return Ok(MetricKey::LiveSpec),
            "liveSalesDiff" => return Ok(MetricKey::LiveSalesDiff),
            _ => {}
        }

        // Channel prefixes may themselves contain `_`, so split on the last one.
        let (prefix, suffix) = s
            .rsplit_once('_')
            .ok_or_else(|| format!("unknown metric key: '{}'", s))?;
        match (Channel::from_prefix(prefix), ChannelField::from_suffix(suffix)) {
            (Some(channel), Some(field)) => Ok(MetricKey::Channel(channel, field)),
            _ => Err(format!("unknown metric key: '{}'", s)),
        }
    }
}
