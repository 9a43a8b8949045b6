/// Split a composite pool symbol into its two constituent tokens.
///
/// Splits on the first hyphen; a symbol without a hyphen is a
/// single-asset pool, so both tokens carry the full symbol.
pub fn split_composite_symbol(symbol: &str) -> (String, String) {
    match symbol.split_once('-') {
        Some((token1, token2)) => (token1.to_string(), token2.to_string()),
        None => (symbol.to_string(), symbol.to_string()),
    }
}
