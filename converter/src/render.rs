//! Plain-text rendering of a valuation for the terminal.

use std::fmt::Write;

use primex_common::{round_half_up, CurrencyPair};
use primex_fx::{Roster, ValuationResult};
use rust_decimal::Decimal;

/// Fixed-point figure, rounded half away from zero.
pub fn fixed(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, round_half_up(value, dp))
}

/// "EUR to USD — Convert Euros to US Dollars"
pub fn heading(pair: CurrencyPair) -> String {
    format!(
        "{} to {} — Convert {} to {}",
        pair.base,
        pair.quote,
        pair.base.display_name(),
        pair.quote.display_name()
    )
}

/// Full report: headline, per-unit lines, broker figures and the provider
/// table with the best row marked.
pub fn report(result: &ValuationResult, roster: &Roster) -> String {
    let base = result.base;
    let quote = result.quote;
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading(result.pair()));
    let _ = writeln!(
        out,
        "{} {} = {} {}",
        fixed(result.amount, 2),
        base,
        fixed(result.converted.value, 2),
        quote
    );
    let _ = writeln!(out, "1 {} = {} {}", base, fixed(result.mid_rate, 4), quote);
    let _ = writeln!(out, "1 {} = {} {}", quote, fixed(result.inverse_rate, 4), base);
    let _ = writeln!(
        out,
        "Interbank: {}  Broker: {}  Spread: {}%",
        fixed(result.mid_rate, 4),
        fixed(result.broker_rate, 4),
        fixed(result.spread_percent, 2)
    );
    let _ = writeln!(
        out,
        "Updated: {} GMT  Rate type: {}",
        result.computed_at.format("%H:%M:%S"),
        result.rate_type.label()
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<15} {:>10} {:>12} {:>16}  {}",
        "Provider", "Rate", "Fee", "Recipient gets", "Delivery"
    );

    for outcome in &result.per_provider {
        let Some(profile) = roster.get(&outcome.provider_id) else {
            continue;
        };
        let marker = if result.is_best(&outcome.provider_id) { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{} {:<15} {:>10} {:>12} {:>16}  {}",
            marker,
            profile.name,
            fixed(outcome.effective_rate, 4),
            format!("{} {}", fixed(outcome.fee.value, 2), outcome.fee.currency),
            format!(
                "{} {}",
                fixed(outcome.net_received.value, 2),
                outcome.net_received.currency
            ),
            profile.eta
        );
    }

    out
}
