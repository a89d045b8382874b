//!
//! The debugger utils.
//!

use web3::types::Address;
use web3::types::H256;
use web3::types::U256;

///
/// Converts `U256` into the fixed-width big-endian `H256`.
///
pub fn u256_to_h256(value: &U256) -> H256 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    H256::from(bytes)
}

///
/// Converts the fixed-width big-endian `H256` into `U256`.
///
pub fn h256_to_u256(value: &H256) -> U256 {
    U256::from_big_endian(value.as_bytes())
}

///
/// Removes the `0x` prefix, if any.
///
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

///
/// Parses a hexadecimal integer of arbitrary leading-zero padding.
///
pub fn parse_hex_u256(value: &str) -> Result<U256, String> {
    let digits = strip_hex_prefix(value).trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16).map_err(|error| format!("invalid hex integer `{value}`: {error}"))
}

///
/// Formats the address with the EIP-55 mixed-case checksum.
///
pub fn to_checksum_address(address: &Address) -> String {
    let lowercase = hex::encode(address.as_bytes());
    let hash = web3::signing::keccak256(lowercase.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (index, character) in lowercase.chars().enumerate() {
        let nibble = (hash[index / 2] >> (if index % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if character.is_ascii_alphabetic() && nibble >= 8 {
            result.push(character.to_ascii_uppercase());
        } else {
            result.push(character);
        }
    }
    result
}
