//! Corridor state and its shareable query-string form.
//!
//! The state is a plain value: decoding never fails (bad fields fall back to
//! [`CorridorDefaults`] one by one) and encoding always writes `amount`,
//! `from` and `to`, with `embed=1` only for embedded views. A missing `embed`
//! key always means "not embedded" so older links keep working.

use primex_common::{parse_amount, CurrencyCode, CurrencyPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded::{self, Serializer, Target};
use url::Url;

pub const AMOUNT_KEY: &str = "amount";
pub const FROM_KEY: &str = "from";
pub const TO_KEY: &str = "to";
pub const EMBED_KEY: &str = "embed";

const CORRIDOR_KEYS: [&str; 4] = [AMOUNT_KEY, FROM_KEY, TO_KEY, EMBED_KEY];

/// Per-field fallbacks used when a shared link is missing or garbles a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorDefaults {
    pub amount: Decimal,
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl Default for CorridorDefaults {
    fn default() -> Self {
        Self {
            amount: Decimal::ONE_HUNDRED,
            base: CurrencyCode::Eur,
            quote: CurrencyCode::Usd,
        }
    }
}

impl CorridorDefaults {
    fn amount(&self, raw: Option<&str>) -> Decimal {
        match raw.map(parse_amount) {
            Some(Ok(amount)) => amount.max(Decimal::ZERO),
            Some(Err(e)) => {
                debug!(error = %e, "Falling back to default amount");
                self.amount
            }
            None => self.amount,
        }
    }

    fn currency(&self, raw: Option<&str>, fallback: CurrencyCode) -> CurrencyCode {
        match raw.map(str::parse::<CurrencyCode>) {
            Some(Ok(code)) => code,
            Some(Err(e)) => {
                debug!(error = %e, fallback = %fallback, "Falling back to default currency");
                fallback
            }
            None => fallback,
        }
    }

    fn embed(&self, raw: Option<&str>) -> bool {
        raw == Some("1")
    }

    /// The state a fresh session starts from.
    pub fn state(&self) -> CorridorState {
        CorridorState::new(self.amount, self.base, self.quote, false)
    }
}

/// The corridor a session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorState {
    /// Amount of `base` to convert, never negative.
    pub amount: Decimal,
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    pub embed: bool,
}

impl CorridorState {
    /// Build a state, clamping negative amounts to zero.
    pub fn new(amount: Decimal, base: CurrencyCode, quote: CurrencyCode, embed: bool) -> Self {
        Self {
            amount: amount.max(Decimal::ZERO),
            base,
            quote,
            embed,
        }
    }

    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base, self.quote)
    }

    /// Same corridor with base and quote exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
            ..*self
        }
    }

    pub fn with_embed(self, embed: bool) -> Self {
        Self { embed, ..self }
    }

    /// Decode a query string such as `amount=250&from=GBP&to=JPY`.
    ///
    /// A leading `?` is ignored. Only the first occurrence of each key counts.
    pub fn decode(query: &str, defaults: &CorridorDefaults) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut fields: [Option<String>; 4] = Default::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if let Some(idx) = CORRIDOR_KEYS.iter().position(|k| *k == &*key) {
                fields[idx].get_or_insert_with(|| value.into_owned());
            }
        }
        let [amount, from, to, embed] = fields;

        // An empty value behaves like a missing one.
        fn non_empty(raw: &Option<String>) -> Option<&str> {
            raw.as_deref().filter(|v| !v.is_empty())
        }

        Self {
            amount: defaults.amount(non_empty(&amount)),
            base: defaults.currency(non_empty(&from), defaults.base),
            quote: defaults.currency(non_empty(&to), defaults.quote),
            embed: defaults.embed(embed.as_deref()),
        }
    }

    /// Decode the query of a full URL.
    pub fn from_url(url: &Url, defaults: &CorridorDefaults) -> Self {
        Self::decode(url.query().unwrap_or_default(), defaults)
    }

    /// Canonical query string for this state.
    pub fn encode(&self) -> String {
        let mut serializer = Serializer::new(String::new());
        self.write_pairs(&mut serializer);
        serializer.finish()
    }

    /// Rewrite the corridor keys on `base`, keeping any other query parameters.
    pub fn apply_to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !CORRIDOR_KEYS.iter().any(|k| *k == &**key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            pairs.extend_pairs(retained);
            self.write_pairs(&mut pairs);
        }
        url
    }

    fn write_pairs<T: Target>(&self, serializer: &mut Serializer<'_, T>) {
        serializer
            .append_pair(AMOUNT_KEY, &self.amount.normalize().to_string())
            .append_pair(FROM_KEY, self.base.as_str())
            .append_pair(TO_KEY, self.quote.as_str());
        if self.embed {
            serializer.append_pair(EMBED_KEY, "1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn defaults() -> CorridorDefaults {
        CorridorDefaults::default()
    }

    #[test]
    fn test_decode_full_query() {
        let state = CorridorState::decode("amount=250.5&from=GBP&to=JPY&embed=1", &defaults());

        assert_eq!(state, CorridorState::new(dec!(250.5), CurrencyCode::Gbp, CurrencyCode::Jpy, true));
    }

    #[test]
    fn test_decode_empty_query_uses_defaults() {
        let state = CorridorState::decode("", &defaults());

        assert_eq!(state, defaults().state());
        assert_eq!(state.amount, dec!(100));
        assert_eq!(state.pair(), CurrencyPair::new(CurrencyCode::Eur, CurrencyCode::Usd));
        assert!(!state.embed);
    }

    #[test]
    fn test_decode_invalid_currency_falls_back_per_field() {
        let state = CorridorState::decode("?amount=40&from=XYZ&to=cad", &defaults());

        assert_eq!(state.base, CurrencyCode::Eur);
        assert_eq!(state.quote, CurrencyCode::Cad);
        assert_eq!(state.amount, dec!(40));
    }

    #[test]
    fn test_decode_amount_edge_cases() {
        let amount = |q: &str| CorridorState::decode(q, &defaults()).amount;

        assert_eq!(amount("amount=abc"), dec!(100));
        assert_eq!(amount("amount="), dec!(100));
        assert_eq!(amount("amount=-5"), Decimal::ZERO);
        assert_eq!(amount("amount=0"), Decimal::ZERO);
        assert_eq!(amount("amount=1e3"), dec!(1000));
        assert_eq!(amount("amount=%2012.5%20"), dec!(12.5));
    }

    #[test]
    fn test_decode_embed_flag() {
        let embed = |q: &str| CorridorState::decode(q, &defaults()).embed;

        assert!(embed("embed=1"));
        assert!(!embed("embed=true"));
        assert!(!embed("embed=0"));
        assert!(!embed("from=USD"));
    }

    #[test]
    fn test_decode_first_occurrence_wins() {
        let state = CorridorState::decode("from=GBP&from=JPY&to=USD&to=EUR", &defaults());

        assert_eq!(state.pair(), CurrencyPair::new(CurrencyCode::Gbp, CurrencyCode::Usd));
    }

    #[test]
    fn test_decode_respects_custom_defaults() {
        let custom = CorridorDefaults {
            amount: dec!(1),
            base: CurrencyCode::Jpy,
            quote: CurrencyCode::Gbp,
        };

        let state = CorridorState::decode("amount=x&from=&to=ZZZ", &custom);

        assert_eq!(state, CorridorState::new(dec!(1), CurrencyCode::Jpy, CurrencyCode::Gbp, false));
    }

    #[test]
    fn test_encode_omits_embed_when_false() {
        let state = CorridorState::new(dec!(100), CurrencyCode::Eur, CurrencyCode::Usd, false);
        assert_eq!(state.encode(), "amount=100&from=EUR&to=USD");

        let embedded = state.with_embed(true);
        assert_eq!(embedded.encode(), "amount=100&from=EUR&to=USD&embed=1");
    }

    #[test]
    fn test_encode_normalizes_amount() {
        let state = CorridorState::new(dec!(250.500), CurrencyCode::Gbp, CurrencyCode::Jpy, false);

        assert_eq!(state.encode(), "amount=250.5&from=GBP&to=JPY");
    }

    #[test]
    fn test_new_clamps_negative_amount() {
        let state = CorridorState::new(dec!(-10), CurrencyCode::Eur, CurrencyCode::Usd, false);

        assert_eq!(state.amount, Decimal::ZERO);
    }

    #[test]
    fn test_swapped() {
        let state = CorridorState::new(dec!(5), CurrencyCode::Eur, CurrencyCode::Jpy, true);

        let swapped = state.swapped();

        assert_eq!(swapped.base, CurrencyCode::Jpy);
        assert_eq!(swapped.quote, CurrencyCode::Eur);
        assert_eq!(swapped.amount, dec!(5));
        assert!(swapped.embed);
    }

    #[test]
    fn test_apply_to_url_preserves_other_params() {
        let base = Url::parse("https://example.com/convert?ref=newsletter&amount=1&embed=1").unwrap();
        let state = CorridorState::new(dec!(75), CurrencyCode::Usd, CurrencyCode::Cad, false);

        let url = state.apply_to_url(&base);

        assert_eq!(
            url.as_str(),
            "https://example.com/convert?ref=newsletter&amount=75&from=USD&to=CAD"
        );
        assert_eq!(CorridorState::from_url(&url, &defaults()), state);
    }

    #[test]
    fn test_apply_to_url_without_query() {
        let base = Url::parse("https://example.com/").unwrap();
        let state = CorridorState::new(dec!(10), CurrencyCode::Gbp, CurrencyCode::Eur, true);

        let url = state.apply_to_url(&base);

        assert_eq!(url.as_str(), "https://example.com/?amount=10&from=GBP&to=EUR&embed=1");
    }

    fn state_strategy() -> impl Strategy<Value = CorridorState> {
        (0i64..1_000_000_000, 0u32..8, 0usize..5, 0usize..5, any::<bool>()).prop_map(
            |(mantissa, scale, base, quote, embed)| {
                CorridorState::new(
                    Decimal::new(mantissa, scale),
                    CurrencyCode::ALL[base],
                    CurrencyCode::ALL[quote],
                    embed,
                )
            },
        )
    }

    fn defaults_strategy() -> impl Strategy<Value = CorridorDefaults> {
        (0i64..10_000, 0usize..5, 0usize..5).prop_map(|(amount, base, quote)| CorridorDefaults {
            amount: Decimal::from(amount),
            base: CurrencyCode::ALL[base],
            quote: CurrencyCode::ALL[quote],
        })
    }

    proptest! {
        #[test]
        fn prop_decode_encode_round_trip(state in state_strategy(), defaults in defaults_strategy()) {
            let encoded = state.encode();
            let decoded = CorridorState::decode(&encoded, &defaults);

            prop_assert_eq!(decoded, state);
            prop_assert_eq!(decoded.encode(), encoded);
        }

        #[test]
        fn prop_decode_never_yields_negative_amount(raw in ".*") {
            let query = format!("amount={}", raw);
            let state = CorridorState::decode(&query, &CorridorDefaults::default());

            prop_assert!(state.amount >= Decimal::ZERO);
        }
    }
}
