//!
//! The reference execution node.
//!

#[cfg(test)]
pub mod memory;
pub mod process;
pub mod rpc;

use serde::Deserialize;
use web3::types::Address;
use web3::types::Bytes;
use web3::types::H256;
use web3::types::U256;
use web3::types::U64;

pub use self::process::AnvilProcess;
pub use self::rpc::RpcNode;

///
/// The transaction receipt.
///
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// The transaction hash.
    pub transaction_hash: H256,
    /// The including block number.
    pub block_number: Option<U64>,
    /// The gas used by the transaction.
    pub gas_used: Option<U256>,
    /// `1` on success, `0` on revert.
    pub status: Option<U64>,
}

impl Receipt {
    ///
    /// Whether the transaction reverted.
    ///
    pub fn is_reverted(&self) -> bool {
        self.status == Some(U64::zero())
    }
}

///
/// The reference execution node.
///
/// The administrative calls mutate the global node state; the queries read
/// the latest block.
///
pub trait Node {
    ///
    /// Replaces the account bytecode.
    ///
    fn set_code(&self, address: Address, code: &Bytes) -> crate::Result<()>;

    ///
    /// Replaces the account balance.
    ///
    fn set_balance(&self, address: Address, balance: U256) -> crate::Result<()>;

    ///
    /// Replaces the account nonce.
    ///
    fn set_nonce(&self, address: Address, nonce: U256) -> crate::Result<()>;

    ///
    /// Sets a storage slot. Both words are fixed-width big-endian.
    ///
    fn set_storage_at(&self, address: Address, key: H256, value: H256) -> crate::Result<()>;

    ///
    /// Sets the chain id checked against EIP-155 signatures.
    ///
    fn set_chain_id(&self, chain_id: u64) -> crate::Result<()>;

    ///
    /// Sets the fee recipient of the next blocks.
    ///
    fn set_coinbase(&self, coinbase: Address) -> crate::Result<()>;

    ///
    /// Sets the base fee of the next block.
    ///
    fn set_next_block_base_fee(&self, base_fee: U256) -> crate::Result<()>;

    ///
    /// Sets the block gas limit.
    ///
    fn set_block_gas_limit(&self, gas_limit: U256) -> crate::Result<()>;

    ///
    /// The account balance.
    ///
    fn balance(&self, address: Address) -> crate::Result<U256>;

    ///
    /// The account nonce.
    ///
    fn transaction_count(&self, address: Address) -> crate::Result<U256>;

    ///
    /// The account bytecode.
    ///
    fn code(&self, address: Address) -> crate::Result<Bytes>;

    ///
    /// The storage slot, zero if never written.
    ///
    fn storage_at(&self, address: Address, key: H256) -> crate::Result<H256>;

    ///
    /// Submits the network encoding of a signed transaction.
    ///
    fn send_raw_transaction(&self, encoded: &[u8]) -> crate::Result<H256>;

    ///
    /// Returns the receipt, or `None` while the transaction is pending.
    ///
    fn transaction_receipt(&self, hash: H256) -> crate::Result<Option<Receipt>>;
}
