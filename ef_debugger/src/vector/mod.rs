//!
//! The test vector.
//!

pub mod account;

use serde::Deserialize;
use serde::Serialize;

pub use self::account::AccountState;
pub use self::account::Accounts;

///
/// The test vector of a single blockchain test.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVector {
    /// The state before the block.
    pub pre: Accounts,
    /// The candidate blocks. Only the first one is replayed.
    pub blocks: Vec<BlockDescriptor>,
    /// The expected state after the block.
    pub post_state: Accounts,
    /// The fork name recorded by the fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

///
/// The block descriptor of a test vector.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// The `0x`-prefixed RLP encoding of the block.
    pub rlp: String,
}

impl TestVector {
    ///
    /// Returns the encoded first block, if any.
    ///
    pub fn first_block(&self) -> Option<&BlockDescriptor> {
        self.blocks.first()
    }
}
