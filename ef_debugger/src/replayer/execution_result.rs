//!
//! The replay execution result.
//!

use web3::types::H256;
use web3::types::U256;

use crate::node::Receipt;

///
/// The replay execution result.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// The receipts in block order.
    pub receipts: Vec<Receipt>,
}

impl ExecutionResult {
    ///
    /// A shortcut constructor.
    ///
    pub fn new(receipts: Vec<Receipt>) -> Self {
        Self { receipts }
    }

    ///
    /// The confirmed transaction hashes in block order.
    ///
    pub fn hashes(&self) -> Vec<H256> {
        self.receipts
            .iter()
            .map(|receipt| receipt.transaction_hash)
            .collect()
    }

    ///
    /// The total gas used, as far as the node reported it.
    ///
    pub fn gas_used(&self) -> U256 {
        self.receipts
            .iter()
            .filter_map(|receipt| receipt.gas_used)
            .fold(U256::zero(), |total, gas| total + gas)
    }
}
