//!
//! The candidate block decoded from its RLP encoding.
//!

pub mod header;
pub mod transaction;

use rlp::Rlp;
use web3::types::Address;
use web3::types::U256;

use crate::vector::TestVector;

pub use self::header::Header;
pub use self::transaction::Transaction;
pub use self::transaction::TransactionKind;

///
/// The block decoding error.
///
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The test vector carries no block.
    #[error("the test vector has no block")]
    MissingBlock,
    /// The block is not a hex string.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// The bytes are not valid RLP.
    #[error("invalid RLP: {0}")]
    Rlp(#[from] rlp::DecoderError),
    /// The RLP does not follow the block schema.
    #[error("{0}")]
    Schema(String),
}

///
/// The candidate block.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The block header.
    pub header: Header,
    /// The transactions in execution order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    ///
    /// Decodes the first block of the test vector.
    ///
    pub fn from_vector(vector: &TestVector) -> Result<Self, DecodeError> {
        let descriptor = vector.first_block().ok_or(DecodeError::MissingBlock)?;
        Self::from_hex(descriptor.rlp.as_str())
    }

    ///
    /// Decodes the `0x`-prefixed hex encoding of a block.
    ///
    pub fn from_hex(encoded: &str) -> Result<Self, DecodeError> {
        let bytes = hex::decode(crate::utils::strip_hex_prefix(encoded))?;
        Self::decode(bytes.as_slice())
    }

    ///
    /// Decodes the RLP encoding of a block.
    ///
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let rlp = Rlp::new(bytes);
        if !rlp.is_list() {
            return Err(DecodeError::Schema("the block is not an RLP list".to_owned()));
        }
        let total = rlp.payload_info()?.total();
        if total > bytes.len() {
            return Err(DecodeError::Rlp(rlp::DecoderError::RlpIsTooShort));
        }
        if total < bytes.len() {
            return Err(DecodeError::Schema(format!(
                "{} trailing bytes after the block",
                bytes.len() - total
            )));
        }
        let items = list_items(&rlp, "block")?;
        if items.len() < 2 {
            return Err(DecodeError::Schema(
                "the block must contain a header and a transaction list".to_owned(),
            ));
        }

        let header = Header::decode(&items[0])?;

        let transactions = list_items(&items[1], "transaction list")?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Transaction::decode(item).map_err(|error| match error {
                    DecodeError::Schema(message) => {
                        DecodeError::Schema(format!("transaction {index}: {message}"))
                    }
                    error => error,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            transactions,
        })
    }

    ///
    /// The chain id declared by the first transaction.
    ///
    pub fn chain_id(&self) -> Option<u64> {
        self.transactions
            .first()
            .and_then(|transaction| transaction.chain_id)
    }

    ///
    /// The chain ids of later transactions that disagree with the first one.
    ///
    pub fn conflicting_chain_ids(&self) -> Vec<(usize, u64)> {
        let Some(expected) = self.chain_id() else {
            return Vec::new();
        };
        self.transactions
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, transaction)| match transaction.chain_id {
                Some(chain_id) if chain_id != expected => Some((index, chain_id)),
                _ => None,
            })
            .collect()
    }
}

///
/// Splits an RLP list into its items.
///
/// Every item must be well-formed and the items must cover the list payload
/// exactly, so a corrupted item fails instead of ending the list early.
///
pub(crate) fn list_items<'a>(rlp: &Rlp<'a>, name: &str) -> Result<Vec<Rlp<'a>>, DecodeError> {
    if !rlp.is_list() {
        return Err(DecodeError::Schema(format!("the {name} is not an RLP list")));
    }
    let info = rlp.payload_info()?;
    let raw = rlp.as_raw();
    if info.total() > raw.len() {
        return Err(DecodeError::Rlp(rlp::DecoderError::RlpIsTooShort));
    }
    let payload = &raw[info.header_len..info.total()];

    let mut items = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let total = Rlp::new(&payload[offset..]).payload_info()?.total();
        if offset + total > payload.len() {
            return Err(DecodeError::Rlp(rlp::DecoderError::RlpIsTooShort));
        }
        items.push(Rlp::new(&payload[offset..offset + total]));
        offset += total;
    }
    Ok(items)
}

pub(crate) fn bytes_at<'a>(rlp: &Rlp<'a>, index: usize, name: &str) -> Result<&'a [u8], DecodeError> {
    let item = rlp.at(index)?;
    if item.is_list() {
        return Err(DecodeError::Schema(format!("`{name}` must be a byte string")));
    }
    Ok(item.data()?)
}

pub(crate) fn uint_at(rlp: &Rlp, index: usize, name: &str) -> Result<U256, DecodeError> {
    let bytes = bytes_at(rlp, index, name)?;
    if bytes.len() > 32 {
        return Err(DecodeError::Schema(format!(
            "`{name}` does not fit into 256 bits"
        )));
    }
    Ok(U256::from_big_endian(bytes))
}

pub(crate) fn u64_at(rlp: &Rlp, index: usize, name: &str) -> Result<u64, DecodeError> {
    let value = uint_at(rlp, index, name)?;
    if value.bits() > 64 {
        return Err(DecodeError::Schema(format!("`{name}` does not fit into 64 bits")));
    }
    Ok(value.low_u64())
}

pub(crate) fn address_at(rlp: &Rlp, index: usize, name: &str) -> Result<Address, DecodeError> {
    let bytes = bytes_at(rlp, index, name)?;
    if bytes.len() != Address::len_bytes() {
        return Err(DecodeError::Schema(format!(
            "`{name}` must be 20 bytes long, got {}",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(bytes))
}
