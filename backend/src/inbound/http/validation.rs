//! Shared validation helpers for inbound HTTP adapters.
//!
//! The transport layer rejects malformed amounts before the ledger core is
//! invoked; the core only sees contract-conforming input (and still guards
//! itself defensively).

use serde_json::json;

use crate::domain::Error;

/// Reject a negative amount with a structured 400 payload.
pub(crate) fn non_negative_amount(amount: i64) -> Result<i64, Error> {
    if amount < 0 {
        return Err(
            Error::invalid_request("amount must be zero or positive").with_details(json!({
                "field": "amount",
                "value": amount,
                "code": "negative_amount",
            })),
        );
    }
    Ok(amount)
}
