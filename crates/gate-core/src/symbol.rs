//! Symbol normalization between canonical and exchange spellings.
//!
//! Callers speak the canonical concatenated form (`BTCUSDT`); the
//! exchange separates base and quote with an underscore (`BTC_USDT`).
//! Both functions are pure and total.

/// Separator used by the exchange between base and quote currency.
const SEPARATOR: char = '_';

/// Known quote-currency suffixes, checked in order. `USDT` must come
/// before `USD` so the longer suffix wins.
const QUOTE_SUFFIXES: [&str; 6] = ["USDT", "USDC", "BUSD", "TUSD", "DAI", "USD"];

/// Convert a canonical symbol to the exchange spelling.
///
/// `BTCUSDT` -> `BTC_USDT`. Symbols already containing the separator
/// are returned unchanged. If no known quote suffix matches, the
/// separator is inserted 4 characters from the end as a heuristic;
/// symbols of 4 characters or fewer pass through as-is.
pub fn to_exchange_symbol(symbol: &str) -> String {
    if symbol.contains(SEPARATOR) {
        return symbol.to_string();
    }

    for suffix in QUOTE_SUFFIXES {
        if let Some(base) = symbol.strip_suffix(suffix) {
            if !base.is_empty() {
                return format!("{base}{SEPARATOR}{suffix}");
            }
        }
    }

    if symbol.len() > 4 {
        let (base, quote) = symbol.split_at(symbol.len() - 4);
        return format!("{base}{SEPARATOR}{quote}");
    }

    symbol.to_string()
}

/// Convert an exchange symbol back to the canonical spelling.
///
/// `BTC_USDT` -> `BTCUSDT`. Idempotent: canonical input is a no-op.
pub fn to_canonical_symbol(symbol: &str) -> String {
    symbol.chars().filter(|c| *c != SEPARATOR).collect()
}
