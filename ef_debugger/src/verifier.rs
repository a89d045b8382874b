//!
//! The post-state verifier.
//!

use web3::types::Address;
use web3::types::H160;
use web3::types::U256;

use crate::error::Error;
use crate::node::Node;
use crate::reporter::Level;
use crate::reporter::Reporter;
use crate::utils;
use crate::vector::AccountState;
use crate::vector::Accounts;

///
/// The account field compared by the verifier.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// The account balance.
    Balance,
    /// The account nonce.
    Nonce,
    /// The account bytecode.
    Code,
    /// The storage slot at the key.
    Storage(U256),
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Balance => write!(f, "balance"),
            Self::Nonce => write!(f, "nonce"),
            Self::Code => write!(f, "code"),
            Self::Storage(key) => write!(f, "storage at key {key:#x}"),
        }
    }
}

///
/// The addresses whose post-state is environment-dependent.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    /// The skipped addresses.
    addresses: Vec<Address>,
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new(vec![Self::BEACON_ROOTS_ADDRESS])
    }
}

impl SkipList {
    /// The EIP-4788 beacon roots contract, written by the node on every block.
    pub const BEACON_ROOTS_ADDRESS: Address = H160([
        0x00, 0x0f, 0x3d, 0xf6, 0xd7, 0x32, 0x80, 0x7e, 0xf1, 0x31, 0x9f, 0xb7, 0xb8, 0xbb, 0x85,
        0x22, 0xd0, 0xbe, 0xac, 0x02,
    ]);

    ///
    /// A shortcut constructor.
    ///
    pub fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    ///
    /// Adds an address to skip.
    ///
    pub fn push(&mut self, address: Address) {
        if !self.contains(&address) {
            self.addresses.push(address);
        }
    }

    ///
    /// Whether the address is skipped.
    ///
    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    ///
    /// The skipped addresses.
    ///
    pub fn addresses(&self) -> &[Address] {
        self.addresses.as_slice()
    }
}

///
/// The post-state verifier.
///
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    /// The addresses never compared.
    skip_list: SkipList,
}

impl Verifier {
    ///
    /// A shortcut constructor.
    ///
    pub fn new(skip_list: SkipList) -> Self {
        Self { skip_list }
    }

    ///
    /// Compares the live node state against the expected post-state.
    ///
    /// Fails on the first mismatching field.
    ///
    pub fn verify<N>(
        &self,
        node: &N,
        post_state: &Accounts,
        reporter: &dyn Reporter,
    ) -> crate::Result<()>
    where
        N: Node + ?Sized,
    {
        let mut checked = 0;
        for (address, expected) in post_state.iter() {
            if self.skip_list.contains(address) {
                reporter.report(
                    Level::Debug,
                    &format!(
                        "Skipped {}",
                        utils::to_checksum_address(address)
                    ),
                );
                continue;
            }

            Self::verify_account(node, address, expected)?;
            checked += 1;
        }

        reporter.report(
            Level::Success,
            &format!("Post state is valid ({checked} accounts checked)"),
        );
        Ok(())
    }

    fn verify_account<N>(node: &N, address: &Address, expected: &AccountState) -> crate::Result<()>
    where
        N: Node + ?Sized,
    {
        let mismatch = |field: Field, expected: String, actual: String| Error::StateMismatch {
            address: utils::to_checksum_address(address),
            field,
            expected,
            actual,
        };

        let balance = node.balance(*address)?;
        if balance != expected.balance {
            return Err(mismatch(
                Field::Balance,
                expected.balance.to_string(),
                balance.to_string(),
            ));
        }

        let nonce = node.transaction_count(*address)?;
        if nonce != expected.nonce {
            return Err(mismatch(
                Field::Nonce,
                expected.nonce.to_string(),
                nonce.to_string(),
            ));
        }

        let code = node.code(*address)?;
        if code.0 != expected.code.0 {
            return Err(mismatch(
                Field::Code,
                format!("0x{}", hex::encode(expected.code.0.as_slice())),
                format!("0x{}", hex::encode(code.0.as_slice())),
            ));
        }

        for (key, expected_value) in expected.storage.iter() {
            let value = utils::h256_to_u256(&node.storage_at(*address, utils::u256_to_h256(key))?);
            if value != *expected_value {
                return Err(mismatch(
                    Field::Storage(*key),
                    expected_value.to_string(),
                    value.to_string(),
                ));
            }
        }

        Ok(())
    }
}
