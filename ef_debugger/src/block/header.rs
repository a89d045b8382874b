//!
//! The block header.
//!

use rlp::Rlp;
use web3::types::Address;
use web3::types::U256;

use super::DecodeError;
use crate::hardfork::Hardfork;

///
/// The block header fields the replay depends on.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// The fee recipient.
    pub coinbase: Address,
    /// The block number.
    pub number: U256,
    /// The block gas limit.
    pub gas_limit: U256,
    /// The gas used by the block.
    pub gas_used: U256,
    /// The block timestamp.
    pub timestamp: u64,
    /// The base fee per gas, since London.
    pub base_fee_per_gas: Option<U256>,
    /// The fork implied by the header layout.
    pub hardfork: Hardfork,
}

impl Header {
    /// The number of fields of a pre-London header.
    pub const MIN_FIELD_COUNT: usize = 15;

    const COINBASE: usize = 2;
    const NUMBER: usize = 8;
    const GAS_LIMIT: usize = 9;
    const GAS_USED: usize = 10;
    const TIMESTAMP: usize = 11;
    const BASE_FEE_PER_GAS: usize = 15;

    ///
    /// Decodes the header RLP list.
    ///
    pub fn decode(rlp: &Rlp) -> Result<Self, DecodeError> {
        let field_count = super::list_items(rlp, "header")?.len();
        if field_count < Self::MIN_FIELD_COUNT {
            return Err(DecodeError::Schema(format!(
                "the header must have at least {} fields, got {field_count}",
                Self::MIN_FIELD_COUNT
            )));
        }

        let base_fee_per_gas = if field_count > Self::BASE_FEE_PER_GAS {
            Some(super::uint_at(rlp, Self::BASE_FEE_PER_GAS, "baseFeePerGas")?)
        } else {
            None
        };

        Ok(Self {
            coinbase: super::address_at(rlp, Self::COINBASE, "coinbase")?,
            number: super::uint_at(rlp, Self::NUMBER, "number")?,
            gas_limit: super::uint_at(rlp, Self::GAS_LIMIT, "gasLimit")?,
            gas_used: super::uint_at(rlp, Self::GAS_USED, "gasUsed")?,
            timestamp: super::u64_at(rlp, Self::TIMESTAMP, "timestamp")?,
            base_fee_per_gas,
            hardfork: Hardfork::from_header_field_count(field_count),
        })
    }
}
