//! Currency pairs understood by the upstream quote API.

use std::fmt;
use std::str::FromStr;

use strum_macros::{Display, EnumString};

use crate::error::QuoteError;

/// Set of supported currency codes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Display, EnumString, Hash, Eq, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum Currency {
    USD,
    BRL,
    EUR,
    GBP,
    JPY,
    CHF,
    CAD,
    AUD,
    ARS,
    CNY,
    BTC,
}

/// A `base-quote` pair such as `USD-BRL`.
///
/// `Display` yields the upstream path segment (`USD-BRL`), [`CurrencyPair::code`]
/// yields the key the upstream uses in its JSON body (`USDBRL`).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct CurrencyPair {
    /// Currency being priced.
    pub base: Currency,
    /// Currency the price is expressed in.
    pub quote: Currency,
}

impl CurrencyPair {
    /// Creates a pair from its two legs.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Key of the pair object in the upstream response.
    pub fn code(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self::new(Currency::USD, Currency::BRL)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| QuoteError::Config(format!("expected BASE-QUOTE, got '{}'", s)))?;
        let parse = |code: &str| {
            code.parse::<Currency>()
                .map_err(|_| QuoteError::Config(format!("unsupported currency '{}'", code)))
        };
        Ok(Self::new(parse(base)?, parse(quote)?))
    }
}
