//!
//! The shared test fixtures.
//!

use rlp::RlpStream;
use web3::signing::Key;
use web3::signing::SecretKey;
use web3::signing::SecretKeyRef;
use web3::types::Address;
use web3::types::H160;

use crate::vector::AccountState;
use crate::vector::Accounts;
use crate::vector::BlockDescriptor;
use crate::vector::TestVector;

/// The block fee recipient.
pub const COINBASE: Address = H160([0xc0; 20]);

/// The block base fee per gas.
pub const BASE_FEE: u64 = 7;

/// The block gas limit.
pub const GAS_LIMIT: u64 = 30_000_000;

/// The gas used by a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;

///
/// A deterministic secret key.
///
pub fn secret_key(seed: u8) -> SecretKey {
    SecretKey::from_slice(&[seed; 32]).expect("Valid secret key")
}

///
/// The address of the secret key.
///
pub fn address_of(key: &SecretKey) -> Address {
    SecretKeyRef::new(key).address()
}

///
/// The minimal big-endian encoding of an integer.
///
pub fn uint_bytes(value: u64) -> Vec<u8> {
    value
        .to_be_bytes()
        .into_iter()
        .skip_while(|byte| *byte == 0)
        .collect()
}

fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().copied().skip_while(|byte| *byte == 0).collect()
}

///
/// Signs an EIP-155 legacy value transfer and returns its RLP encoding.
///
pub fn legacy_transfer(
    key: &SecretKey,
    nonce: u64,
    to: Address,
    value: u64,
    gas_price: u64,
    chain_id: u64,
) -> Vec<u8> {
    let mut unsigned = RlpStream::new_list(9);
    unsigned.append(&nonce);
    unsigned.append(&gas_price);
    unsigned.append(&TRANSFER_GAS);
    unsigned.append(&to.as_bytes().to_vec());
    unsigned.append(&value);
    unsigned.append(&Vec::<u8>::new());
    unsigned.append(&chain_id);
    unsigned.append(&0u8);
    unsigned.append(&0u8);
    let hash = web3::signing::keccak256(&unsigned.out());

    let signature = SecretKeyRef::new(key)
        .sign(&hash, Some(chain_id))
        .expect("Signing failed");

    let mut signed = RlpStream::new_list(9);
    signed.append(&nonce);
    signed.append(&gas_price);
    signed.append(&TRANSFER_GAS);
    signed.append(&to.as_bytes().to_vec());
    signed.append(&value);
    signed.append(&Vec::<u8>::new());
    signed.append(&signature.v);
    signed.append(&trim_leading_zeros(signature.r.as_bytes()));
    signed.append(&trim_leading_zeros(signature.s.as_bytes()));
    signed.out().to_vec()
}

///
/// The fields of a Cancun block header.
///
pub fn header_fields(timestamp: u64) -> Vec<Vec<u8>> {
    vec![
        vec![0x11; 32],
        vec![0x1d; 32],
        COINBASE.as_bytes().to_vec(),
        vec![0x22; 32],
        vec![0x33; 32],
        vec![0x44; 32],
        vec![0x00; 256],
        Vec::new(),
        uint_bytes(1),
        uint_bytes(GAS_LIMIT),
        Vec::new(),
        uint_bytes(timestamp),
        Vec::new(),
        vec![0x55; 32],
        vec![0x00; 8],
        uint_bytes(BASE_FEE),
        vec![0x66; 32],
        Vec::new(),
        Vec::new(),
        vec![0x77; 32],
    ]
}

///
/// Encodes a block from header fields and transaction encodings.
///
pub fn encode_block(header: &[Vec<u8>], transactions: &[Vec<u8>]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(4);

    stream.begin_list(header.len());
    for field in header {
        stream.append(field);
    }

    stream.begin_list(transactions.len());
    for transaction in transactions {
        match transaction.first() {
            Some(byte) if *byte >= 0xc0 => {
                stream.append_raw(transaction, 1);
            }
            _ => {
                stream.append(transaction);
            }
        }
    }

    stream.begin_list(0);
    stream.begin_list(0);
    stream.out().to_vec()
}

///
/// Builds a test vector around an encoded block.
///
pub fn vector(
    pre: Vec<(Address, AccountState)>,
    block: &[u8],
    post: Vec<(Address, AccountState)>,
) -> TestVector {
    TestVector {
        pre: Accounts::new(pre),
        blocks: vec![BlockDescriptor {
            rlp: format!("0x{}", hex::encode(block)),
        }],
        post_state: Accounts::new(post),
        network: Some("Cancun".to_owned()),
    }
}
