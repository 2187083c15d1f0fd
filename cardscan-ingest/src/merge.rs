//! Walk the transaction section and fold continuation rows into the
//! transaction above them.

use cardscan_core::{ParsedTransaction, PaymentMethod};
use tracing::debug;

use crate::parser::{RowContext, bare_payment_method, parse_row};
use crate::types::RecognizedRow;

/// Parse every row of a transaction section.
///
/// A bare payment-method row under a transaction is consumed by it. A
/// cross-border-fee line right after that (or right after the transaction
/// when there is no annotation) is merged into `cbf_fee` instead of being
/// emitted on its own.
pub fn extract_transactions(rows: &[RecognizedRow], ctx: &RowContext) -> Vec<ParsedTransaction> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < rows.len() {
        let lookahead = rows.get(i + 1);
        let Some(mut txn) = parse_row(&rows[i], lookahead, ctx) else {
            i += 1;
            continue;
        };

        let mut consumed = 1;
        if lookahead.and_then(bare_payment_method).is_some() {
            consumed = 2;
        }

        if let Some(fee_row) = rows.get(i + consumed) {
            let fee = parse_row(fee_row, rows.get(i + consumed + 1), ctx);
            if let Some(fee) = fee.filter(|f| f.payment_method == Some(PaymentMethod::CrossBorderFee)) {
                debug!(description = %txn.description, fee = fee.abs_amount(), "merged cross-border fee");
                txn.cbf_fee = Some(fee.abs_amount());
                consumed += 1;
            }
        }

        out.push(txn);
        i += consumed;
    }

    out
}
