//! ISO currency codes seen on card statements.

/// Codes recognized as a bare currency token in the foreign-currency column.
pub const KNOWN_CURRENCIES: &[&str] = &[
    "HKD", "USD", "CNY", "RMB", "JPY", "EUR", "GBP", "AUD", "CAD", "SGD", "TWD", "KRW", "THB",
    "MYR", "CHF", "NZD", "MOP", "PHP", "IDR", "VND", "INR", "AED", "SEK", "NOK", "DKK",
];

/// Home currency used when the statement doesn't say otherwise.
pub const DEFAULT_HOME_CURRENCY: &str = "HKD";

/// True if the token is exactly a known currency code.
pub fn is_currency_code(token: &str) -> bool {
    KNOWN_CURRENCIES.contains(&token.trim())
}
