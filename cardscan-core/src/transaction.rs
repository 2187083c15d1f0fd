//! Transaction records extracted from a statement page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dates::realign_year;
use crate::payment_method::PaymentMethod;

/// One statement line, typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedTransaction {
    /// Set together with `trans_date`, never alone
    pub post_date: Option<NaiveDate>,
    pub trans_date: Option<NaiveDate>,
    pub description: String,
    /// Positive = charge, negative = credit/refund
    pub billing_amount: f64,
    pub billing_currency: String,
    pub payment_method: Option<PaymentMethod>,
    pub is_foreign_currency: bool,
    pub spending_currency: Option<String>,
    pub spending_amount: Option<f64>,
    pub is_refund_or_payment: bool,
    /// Cross-border fee merged in from the following line
    pub cbf_fee: Option<f64>,
}

impl ParsedTransaction {
    /// Currency rewards are computed in.
    pub fn cashback_currency(&self) -> &str {
        match (&self.spending_currency, self.is_foreign_currency) {
            (Some(code), true) => code,
            _ => &self.billing_currency,
        }
    }

    pub fn abs_amount(&self) -> f64 {
        self.billing_amount.abs()
    }

    pub fn is_credit(&self) -> bool {
        self.billing_amount < 0.0
    }

    /// Transaction date, falling back to the post date.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.trans_date.or(self.post_date)
    }

    /// Re-run year inference on both dates against a newly known reference.
    pub fn realign_dates(&mut self, reference: NaiveDate) {
        self.post_date = self.post_date.map(|d| realign_year(d, reference));
        self.trans_date = self.trans_date.map(|d| realign_year(d, reference));
    }

    /// Input handed to the reward engine.
    pub fn reward_input(&self) -> RewardInput {
        RewardInput {
            cashback_currency: self.cashback_currency().to_string(),
            amount: self.abs_amount(),
            payment_method: self.payment_method.unwrap_or(PaymentMethod::Sale),
            date: self.effective_date(),
        }
    }
}

/// What the reward engine needs from a transaction; the engine itself lives
/// outside this workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardInput {
    pub cashback_currency: String,
    /// Absolute billed amount
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub date: Option<NaiveDate>,
}

/// Everything extracted from one page (or, once assembled, one document).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatementAnalysisResult {
    pub card_name: String,
    pub card_last_four: String,
    pub statement_date: Option<NaiveDate>,
    pub transactions: Vec<ParsedTransaction>,
    /// Newline-joined row text, for eyeballing only
    pub raw_text: String,
}

impl StatementAnalysisResult {
    /// Net billed total per billing currency, credits included. Foreign
    /// purchases count at their billed (home currency) amount.
    pub fn totals_by_billing_currency(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for t in &self.transactions {
            *totals.entry(t.billing_currency.clone()).or_insert(0.0) += t.billing_amount;
        }
        totals
    }

    /// Sum of merged cross-border fees.
    pub fn total_cbf_fees(&self) -> f64 {
        self.transactions.iter().filter_map(|t| t.cbf_fee).sum()
    }
}
