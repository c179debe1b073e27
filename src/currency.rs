//! The display currencies supported by the app and their formatting rules.
//!
//! Transactions are stored as plain numbers. The currency preference only
//! changes how amounts are rendered, no conversion takes place.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use serde::{Deserialize, Serialize};

/// A display currency with a fixed symbol and minor-unit precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar, formatted with two decimal digits.
    #[default]
    Usd,
    /// Khmer Riel, a zero-decimal currency.
    Khr,
}

impl Currency {
    /// The ISO 4217 style code stored in the preferences table.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Khr => "KHR",
        }
    }

    /// The symbol used as a prefix when formatting amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Khr => "៛",
        }
    }

    /// The human readable name shown on the settings page.
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Khr => "Khmer Riel",
        }
    }

    /// Parse a stored currency code.
    ///
    /// Unknown codes fall back to the default currency so that a stale or
    /// hand-edited preference row cannot break rendering.
    pub fn from_code(code: &str) -> Self {
        match code {
            "KHR" => Currency::Khr,
            "USD" => Currency::Usd,
            _ => Currency::default(),
        }
    }

    /// All currencies the user can choose between on the settings page.
    pub fn all() -> [Currency; 2] {
        [Currency::Usd, Currency::Khr]
    }
}

/// Format `amount` in the given display currency.
///
/// USD amounts are rendered with two decimal digits and KHR amounts with
/// none, both with thousands separators and the sign ahead of the symbol.
/// This function is pure: the same inputs always produce the same string.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Usd => format_two_decimals(amount),
        Currency::Khr => format_zero_decimals(amount),
    }
}

fn format_two_decimals(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

fn format_zero_decimals(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("៛")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-៛")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    let number = number.round();

    if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "៛0".to_owned()
    }
}
