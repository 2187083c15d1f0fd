//! Row parser: one reconstructed table row into a typed transaction.
//!
//! Expected row shapes (HK card statement, after reconstruction):
//!   25DEC   24DEC   STARBUCKS HK                         45.00
//!   27DEC   27DEC   REFUND STARBUCKS HK                  45.00CR
//!   01JAN   01JAN   AMAZON JP            JPY 5000       550.00
//!                   APPLE PAY
//!   01JAN   01JAN   CBF FEE                               5.50

use cardscan_core::{
    DateResolver, ParsedTransaction, PaymentMethod, classify, correct_merchant_name, extract_day_months,
    is_amount, is_currency_code, keyword_method, parse_amount, parse_plain_number,
};
use cardscan_core::dates::{is_date_token, strip_date_prefix};
use tracing::trace;

use crate::types::RecognizedRow;

/// Per-page parsing inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RowContext {
    pub resolver: DateResolver,
    pub home_currency: String,
}

impl RowContext {
    pub fn new(resolver: DateResolver, home_currency: impl Into<String>) -> Self {
        Self {
            resolver,
            home_currency: home_currency.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ForeignAmount {
    element_index: usize,
    currency: String,
    amount: f64,
}

/// First `CODE amount` pair of adjacent elements. Later pairs are ignored.
fn find_foreign_amount(row: &RecognizedRow) -> Option<ForeignAmount> {
    row.elements.windows(2).enumerate().find_map(|(i, pair)| {
        if !is_currency_code(&pair[0].text) {
            return None;
        }
        let amount = parse_plain_number(&pair[1].text)?;
        Some(ForeignAmount {
            element_index: i + 1,
            currency: pair[0].text.trim().to_string(),
            amount,
        })
    })
}

fn build_description(row: &RecognizedRow, anchor: usize, foreign: Option<&ForeignAmount>) -> String {
    let parts: Vec<String> = row.elements[..anchor]
        .iter()
        .enumerate()
        .filter(|(i, el)| {
            !is_date_token(&el.text)
                && !is_currency_code(&el.text)
                && foreign.is_none_or(|f| f.element_index != *i)
        })
        .map(|(_, el)| strip_date_prefix(&el.text))
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() && anchor > 0 {
        return row.elements[anchor - 1].text.trim().to_string();
    }
    parts.join(" ")
}

/// A row holding only a payment-channel annotation (no date, no amount),
/// printed under the transaction it belongs to.
pub fn bare_payment_method(row: &RecognizedRow) -> Option<PaymentMethod> {
    let text = row.text();
    if !extract_day_months(&text).is_empty() || row.elements.iter().any(|e| is_amount(&e.text)) {
        return None;
    }
    keyword_method(&text)
}

/// Parse one row. `lookahead` is the row printed right below it, used to pick
/// up a payment-channel annotation. Rows that aren't transactions (headers,
/// page numbers, wrapped text) come back as `None`.
pub fn parse_row(row: &RecognizedRow, lookahead: Option<&RecognizedRow>, ctx: &RowContext) -> Option<ParsedTransaction> {
    if row.len() < 2 {
        trace!(row = %row.text(), "reject: fewer than 2 elements");
        return None;
    }

    let text = row.text();
    let day_months = extract_day_months(&text);
    let (post_dm, trans_dm) = match day_months.as_slice() {
        [] => {
            trace!(row = %text, "reject: no date");
            return None;
        }
        [only] => (*only, *only),
        [first, second, ..] => (*first, *second),
    };
    let (Some(post_date), Some(trans_date)) = (ctx.resolver.resolve(post_dm), ctx.resolver.resolve(trans_dm)) else {
        trace!(row = %text, "reject: date not on the calendar");
        return None;
    };

    let foreign = find_foreign_amount(row);

    let Some(anchor) = row.elements.iter().rposition(|e| is_amount(&e.text)) else {
        trace!(row = %text, "reject: no amount");
        return None;
    };
    let billing = parse_amount(&row.elements[anchor].text)?;

    let description = correct_merchant_name(&build_description(row, anchor, foreign.as_ref()));

    let mut method = classify(&description, billing.value);
    let is_refund_or_payment = method.is_refund_or_payment();

    if method == PaymentMethod::Sale {
        if let Some(annotated) = lookahead.and_then(bare_payment_method) {
            if annotated.refines_sale() {
                method = annotated;
            }
        }
    }

    let (is_foreign_currency, spending_currency, spending_amount) = match foreign {
        Some(f) => (true, Some(f.currency), Some(f.amount)),
        None => (false, None, None),
    };

    Some(ParsedTransaction {
        post_date: Some(post_date),
        trans_date: Some(trans_date),
        description,
        billing_amount: billing.value,
        billing_currency: ctx.home_currency.clone(),
        payment_method: Some(method),
        is_foreign_currency,
        spending_currency,
        spending_amount,
        is_refund_or_payment,
        cbf_fee: None,
    })
}
