//!
//! The block transaction.
//!

use rlp::Rlp;
use web3::types::H256;
use web3::types::U256;

use super::DecodeError;

///
/// The transaction envelope kind.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// The untyped RLP list.
    Legacy,
    /// EIP-2930.
    AccessList,
    /// EIP-1559.
    DynamicFee,
    /// EIP-4844.
    Blob,
    /// EIP-7702.
    SetCode,
}

impl TransactionKind {
    ///
    /// Resolves the typed envelope byte.
    ///
    pub fn from_type_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::AccessList),
            0x02 => Some(Self::DynamicFee),
            0x03 => Some(Self::Blob),
            0x04 => Some(Self::SetCode),
            _ => None,
        }
    }

    ///
    /// The number of payload fields, signature included.
    ///
    pub fn field_count(&self) -> usize {
        match self {
            Self::Legacy => 9,
            Self::AccessList => 11,
            Self::DynamicFee => 12,
            Self::Blob => 14,
            Self::SetCode => 13,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::AccessList => write!(f, "access list"),
            Self::DynamicFee => write!(f, "dynamic fee"),
            Self::Blob => write!(f, "blob"),
            Self::SetCode => write!(f, "set code"),
        }
    }
}

///
/// The signed transaction, kept in its network encoding.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The envelope kind.
    pub kind: TransactionKind,
    /// The declared chain id. `None` for pre-EIP-155 legacy transactions.
    pub chain_id: Option<u64>,
    /// The sender nonce.
    pub nonce: U256,
    /// The encoding accepted by `eth_sendRawTransaction`.
    pub encoded: Vec<u8>,
}

impl Transaction {
    /// The first EIP-155 `v` value.
    const EIP155_V_OFFSET: u64 = 35;

    ///
    /// Decodes an item of the block transaction list.
    ///
    /// Legacy transactions are RLP lists, typed ones are byte strings.
    ///
    pub fn decode(item: &Rlp) -> Result<Self, DecodeError> {
        if item.is_list() {
            Self::decode_legacy(item)
        } else {
            Self::decode_typed(item.data()?)
        }
    }

    ///
    /// The transaction hash.
    ///
    pub fn hash(&self) -> H256 {
        H256::from(web3::signing::keccak256(self.encoded.as_slice()))
    }

    fn decode_legacy(rlp: &Rlp) -> Result<Self, DecodeError> {
        Self::check_field_count(rlp, TransactionKind::Legacy)?;

        let v = super::uint_at(rlp, 6, "v")?;
        let chain_id = match v {
            v if v == U256::from(27) || v == U256::from(28) => None,
            v if v >= U256::from(Self::EIP155_V_OFFSET) => {
                let chain_id = (v - U256::from(Self::EIP155_V_OFFSET)) / 2;
                if chain_id.bits() > 64 {
                    return Err(DecodeError::Schema(
                        "the chain id does not fit into 64 bits".to_owned(),
                    ));
                }
                Some(chain_id.low_u64())
            }
            v => {
                return Err(DecodeError::Schema(format!(
                    "invalid legacy signature `v` {v}"
                )))
            }
        };

        Ok(Self {
            kind: TransactionKind::Legacy,
            chain_id,
            nonce: super::uint_at(rlp, 0, "nonce")?,
            encoded: rlp.as_raw().to_vec(),
        })
    }

    fn decode_typed(envelope: &[u8]) -> Result<Self, DecodeError> {
        let (type_byte, payload) = envelope
            .split_first()
            .ok_or_else(|| DecodeError::Schema("empty typed transaction".to_owned()))?;
        let kind = TransactionKind::from_type_byte(*type_byte).ok_or_else(|| {
            DecodeError::Schema(format!("unsupported transaction type {type_byte:#04x}"))
        })?;

        let rlp = Rlp::new(payload);
        if !rlp.is_list() {
            return Err(DecodeError::Schema(format!(
                "the {kind} transaction payload is not an RLP list"
            )));
        }
        if rlp.payload_info()?.total() != payload.len() {
            return Err(DecodeError::Schema(format!(
                "the {kind} transaction payload has an invalid length"
            )));
        }
        Self::check_field_count(&rlp, kind)?;

        Ok(Self {
            kind,
            chain_id: Some(super::u64_at(&rlp, 0, "chainId")?),
            nonce: super::uint_at(&rlp, 1, "nonce")?,
            encoded: envelope.to_vec(),
        })
    }

    fn check_field_count(rlp: &Rlp, kind: TransactionKind) -> Result<(), DecodeError> {
        let count = super::list_items(rlp, "transaction")?.len();
        if count != kind.field_count() {
            return Err(DecodeError::Schema(format!(
                "the {kind} transaction must have {} fields, got {count}",
                kind.field_count()
            )));
        }
        Ok(())
    }
}
