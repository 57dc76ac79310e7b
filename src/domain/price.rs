//! Display formatting for menu and order prices.
//!
//! Formatting follows en-US conventions with at most two fraction digits.
//! Compact notation scales large amounts with a `K`/`M`/`B`/`T` suffix and
//! drops trailing zeros; standard notation groups thousands and always shows
//! cents.

use crate::domain::error::DomainError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISO 4217 currencies the storefront can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    USD,
    #[default]
    EUR,
    GBP,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            other => Err(DomainError::validation(format!("Unsupported currency: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    Standard,
    #[default]
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceFormat {
    pub currency: Currency,
    pub notation: Notation,
}

impl PriceFormat {
    pub fn new(currency: Currency, notation: Notation) -> Self {
        Self { currency, notation }
    }
}

const COMPACT_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

pub fn format_price(amount: Decimal, options: PriceFormat) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let magnitude = amount.abs();
    let body = match options.notation {
        Notation::Standard => format_standard(magnitude),
        Notation::Compact => format_compact(magnitude),
    };
    // A negative amount that rounds to zero displays without a sign.
    let sign = if body.trim_start_matches(['0', '.']).is_empty() {
        ""
    } else {
        sign
    };
    format!("{sign}{}{body}", options.currency.symbol())
}

/// Parses the decimal text a price form field submits.
pub fn parse_price(raw: &str) -> Result<Decimal, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Menu price is required"));
    }
    Decimal::from_str(trimmed)
        .map_err(|_| DomainError::validation(format!("Invalid price: {trimmed}")))
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn format_standard(magnitude: Decimal) -> String {
    let mut rounded = round2(magnitude);
    rounded.rescale(2);
    let text = rounded.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}.{fraction}", group_thousands(integer))
}

fn format_compact(magnitude: Decimal) -> String {
    let thousand = Decimal::ONE_THOUSAND;
    let mut scaled = magnitude;
    let mut tier = 0;
    while scaled >= thousand && tier < COMPACT_SUFFIXES.len() - 1 {
        scaled /= thousand;
        tier += 1;
    }

    let mut rounded = round2(scaled);
    if rounded >= thousand && tier < COMPACT_SUFFIXES.len() - 1 {
        rounded = round2(rounded / thousand);
        tier += 1;
    }

    let suffix = COMPACT_SUFFIXES.get(tier).copied().unwrap_or("");
    format!("{}{suffix}", rounded.normalize())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
