//! Payment-method classification for statement descriptions.
//!
//! A decision list: rules are tried in order and the first match wins. No
//! rule matching means a plain sale, or a refund when the amount is negative.

use serde::{Deserialize, Serialize};

/// Closed set of payment channels reported downstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    ApplePay,
    UnionpayQr,
    AutoRepayment,
    Repayment,
    Installment,
    CrossBorderFee,
    Refund,
    Sale,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::ApplePay => "apple_pay",
            PaymentMethod::UnionpayQr => "unionpay_qr",
            PaymentMethod::AutoRepayment => "auto_repayment",
            PaymentMethod::Repayment => "repayment",
            PaymentMethod::Installment => "installment",
            PaymentMethod::CrossBorderFee => "cross_border_fee",
            PaymentMethod::Refund => "refund",
            PaymentMethod::Sale => "sale",
        }
    }

    /// Money moving back to the card rather than a purchase that earns rewards.
    pub fn is_refund_or_payment(&self) -> bool {
        matches!(
            self,
            PaymentMethod::Refund
                | PaymentMethod::Repayment
                | PaymentMethod::AutoRepayment
                | PaymentMethod::Installment
                | PaymentMethod::CrossBorderFee
        )
    }

    /// Methods a continuation row is allowed to stamp onto a sale.
    pub fn refines_sale(&self) -> bool {
        !matches!(
            self,
            PaymentMethod::Refund | PaymentMethod::Repayment | PaymentMethod::Sale
        )
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const APPLE_PAY: &[&str] = &["APPLE PAY", "APPLEPAY", "APPLE-PAY"];
const UNIONPAY_QR: &[&str] = &["UNIONPAY", "UNION PAY", "QR PAY", "QRPAY", "QR CODE", "銀聯", "银联"];
const AUTO_REPAYMENT: &[&str] = &["AUTOPAY", "AUTO PAY", "AUTO-PAY", "DIRECT DEBIT", "自動轉賬", "自動還款"];
const REPAYMENT: &[&str] = &["PAYMENT", "THANK YOU", "還款", "付款"];
const INSTALLMENT: &[&str] = &["INSTALMENT", "INSTALLMENT", "分期"];
const CROSS_BORDER_FEE: &[&str] = &[
    "CBF",
    "CROSS BORDER",
    "CROSS-BORDER",
    "DCC FEE",
    "FOREIGN TRANSACTION FEE",
    "跨境",
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// One entry of the decision list.
pub struct Rule {
    pub method: PaymentMethod,
    pub keywords: &'static [&'static str],
    /// Only applies to credits (negative amounts)
    pub credit_only: bool,
}

impl Rule {
    fn matches(&self, upper: &str, amount: f64) -> bool {
        (!self.credit_only || amount < 0.0) && contains_any(upper, self.keywords)
    }
}

/// Priority order. Earlier rules win.
pub const RULES: &[Rule] = &[
    Rule { method: PaymentMethod::ApplePay, keywords: APPLE_PAY, credit_only: false },
    Rule { method: PaymentMethod::UnionpayQr, keywords: UNIONPAY_QR, credit_only: false },
    Rule { method: PaymentMethod::AutoRepayment, keywords: AUTO_REPAYMENT, credit_only: false },
    Rule { method: PaymentMethod::Repayment, keywords: REPAYMENT, credit_only: true },
    Rule { method: PaymentMethod::Installment, keywords: INSTALLMENT, credit_only: false },
    Rule { method: PaymentMethod::CrossBorderFee, keywords: CROSS_BORDER_FEE, credit_only: false },
];

/// Classify a (corrected) description with its signed billing amount.
pub fn classify(description: &str, amount: f64) -> PaymentMethod {
    let upper = description.to_uppercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&upper, amount))
        .map(|rule| rule.method)
        .unwrap_or(if amount < 0.0 {
            PaymentMethod::Refund
        } else {
            PaymentMethod::Sale
        })
}

/// Keyword-only match used for annotation rows that carry no amount.
pub fn keyword_method(text: &str) -> Option<PaymentMethod> {
    let upper = text.to_uppercase();
    RULES
        .iter()
        .find(|rule| contains_any(&upper, rule.keywords))
        .map(|rule| rule.method)
}
