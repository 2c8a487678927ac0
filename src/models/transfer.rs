//! Fund transfer request type.
//!
//! Transfers are accepted and echoed back; no balance is moved.

use serde::{Deserialize, Serialize};

/// Request body for `POST /transfer`.
///
/// # JSON Example
///
/// ```json
/// {
///   "toAccount": "48213377",
///   "amount": 1050
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Recipient account, echoed back as sent
    #[serde(rename = "toAccount")]
    pub to_account: String,

    /// Amount in minor currency units
    pub amount: i64,
}
