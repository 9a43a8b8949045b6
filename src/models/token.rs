use serde::{Deserialize, Serialize};

/// An operator-curated risk tier for one token
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TokenRiskEntry {
    pub token: Option<String>,
    pub chain: Option<String>,
    /// Risk/reward weight; must be > 0 to contribute to scoring
    pub tier: f64,
}

/// How token tiers are keyed when looked up for a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKeyScheme {
    /// "TOKEN-CHAIN", both uppercased and trimmed
    ChainQualified,
    /// "TOKEN" alone, uppercased and trimmed
    SymbolOnly,
}

impl TokenKeyScheme {
    /// Parse a configuration string; None for unrecognized values
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "chain" | "chain-qualified" => Some(TokenKeyScheme::ChainQualified),
            "symbol" | "unqualified" => Some(TokenKeyScheme::SymbolOnly),
            _ => None,
        }
    }
}

/// Build the normalized lookup key for a token under the given scheme.
///
/// Returns None when the token (or the chain, for chain-qualified keys)
/// is missing or blank; such entries cannot participate in scoring.
pub fn token_key(token: &str, chain: Option<&str>, scheme: TokenKeyScheme) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    match scheme {
        TokenKeyScheme::ChainQualified => {
            let chain = chain.map(str::trim).filter(|c| !c.is_empty())?;
            Some(format!(
                "{}-{}",
                token.to_uppercase(),
                chain.to_uppercase()
            ))
        }
        TokenKeyScheme::SymbolOnly => Some(token.to_uppercase()),
    }
}
