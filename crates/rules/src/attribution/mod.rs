//! Channel attributor: raw period telemetry to a per-channel breakdown.
//!
//! The four reported channels (live, video, image-text, storefront-bind) are
//! read directly; the product-card channel is the residual of the promotion
//! total. The residual is never clamped, so inconsistent upstream counts show
//! up as a negative product-card volume instead of being hidden.

mod math;
mod types;

pub use math::safe_div;
pub use types::*;

pub(crate) use math::{fixed2, round2};

use crate::schema::{Channel, ChannelTotals, RawPeriodMetrics};

/// Build the period report for one telemetry window.
///
/// `reference_unit_price` is the product's own unit price, supplied by the
/// caller; the live average price is compared against it.
pub fn compute_report(raw: &RawPeriodMetrics, days: u32, reference_unit_price: f64) -> PeriodReport {
    let total_sales = raw.sales;
    let total_amount = raw.sales_amount;

    let reported = Channel::REPORTED.map(|c| raw.channel(c));
    let reported_sales = reported.iter().fold(0i64, |acc, t| acc.saturating_add(t.sales));
    let reported_amount = reported.iter().fold(0i64, |acc, t| acc.saturating_add(t.amount));
    // Saturates at the i64 bounds instead of wrapping on extreme telemetry.
    let residual = ChannelTotals {
        sales: total_sales.saturating_sub(reported_sales),
        amount: total_amount.saturating_sub(reported_amount),
    };

    let totals = |channel: Channel| match channel {
        Channel::ProductCard => residual,
        other => raw.channel(other),
    };

    let channels = Channel::ALL.map(|channel| {
        let t = totals(channel);
        ChannelStat {
            name: channel.display_name().to_string(),
            volume: t.sales,
            share_percent: format!("{}%", fixed2(share_percent(t.sales, total_sales))),
            daily_average: fixed2(safe_div(t.sales as f64, days as f64)),
            average_price: fixed2(average_price(t.amount, t.sales)),
        }
    });

    let live = raw.channel(Channel::Live);
    let extra = ExtraStats {
        live_orders_per_anchor: round2(safe_div(live.sales as f64, raw.live_match_order_num as f64)),
        live_vs_card_price_diff: round2(average_price(live.amount, live.sales) - reference_unit_price),
    };

    PeriodReport {
        days,
        total_sales,
        channels,
        extra,
    }
}

fn share_percent(volume: i64, total: i64) -> f64 {
    safe_div(volume as f64, total as f64) * 100.0
}

/// Average unit price in major currency units; `amount` is in minor units.
fn average_price(amount: i64, volume: i64) -> f64 {
    safe_div(amount as f64 / 100.0, volume as f64)
}
