//!
//! The in-memory node executing plain value transfers.
//!

use std::cell::RefCell;
use std::collections::HashMap;

use rlp::Rlp;
use rlp::RlpStream;
use web3::types::Address;
use web3::types::Bytes;
use web3::types::H256;
use web3::types::U256;
use web3::types::U64;

use super::Node;
use super::Receipt;
use crate::error::Error;

///
/// The observable node call.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An administrative call, by JSON-RPC method name.
    Admin(&'static str),
    /// A transaction submission.
    Submitted(H256),
    /// A receipt became available.
    Confirmed(H256),
}

///
/// The in-memory account.
///
#[derive(Debug, Clone, Default)]
pub struct Account {
    /// The balance.
    pub balance: U256,
    /// The nonce.
    pub nonce: U256,
    /// The bytecode.
    pub code: Vec<u8>,
    /// The written storage slots.
    pub storage: HashMap<H256, H256>,
}

///
/// The in-memory node state.
///
#[derive(Debug, Default)]
pub struct State {
    /// The accounts by address.
    pub accounts: HashMap<Address, Account>,
    /// The chain id, unchecked when not set.
    pub chain_id: Option<u64>,
    /// The fee recipient.
    pub coinbase: Address,
    /// The base fee per gas.
    pub base_fee: U256,
    /// The block gas limit.
    pub gas_limit: U256,
    /// The receipts by transaction hash.
    pub receipts: HashMap<H256, Receipt>,
    /// The call log.
    pub events: Vec<Event>,
    /// The number of `None` answers before each receipt appears.
    pub pending_polls: usize,
    /// The `None` answers left for the last submission.
    pub remaining_polls: usize,
    /// Makes every call fail.
    pub unreachable: bool,
}

///
/// The in-memory node.
///
#[derive(Debug, Default)]
pub struct MemoryNode {
    /// The node state.
    pub state: RefCell<State>,
}

impl MemoryNode {
    const TRANSFER_GAS: u64 = 21_000;

    ///
    /// A node answering `None` to the first `count` receipt polls of each transaction.
    ///
    pub fn with_pending_polls(count: usize) -> Self {
        let node = Self::default();
        node.state.borrow_mut().pending_polls = count;
        node
    }

    ///
    /// A node whose every call fails.
    ///
    pub fn unreachable() -> Self {
        let node = Self::default();
        node.state.borrow_mut().unreachable = true;
        node
    }

    ///
    /// The call log.
    ///
    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    ///
    /// The account state, default if never touched.
    ///
    pub fn account(&self, address: &Address) -> Account {
        self.state
            .borrow()
            .accounts
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    fn admin<F>(&self, method: &'static str, mutation: F) -> crate::Result<()>
    where
        F: FnOnce(&mut State),
    {
        let mut state = self.state.borrow_mut();
        if state.unreachable {
            return Err(Error::environment(method, "connection refused"));
        }
        mutation(&mut *state);
        state.events.push(Event::Admin(method));
        Ok(())
    }

    fn query<T, F>(&self, method: &'static str, query: F) -> crate::Result<T>
    where
        F: FnOnce(&State) -> T,
    {
        let state = self.state.borrow();
        if state.unreachable {
            return Err(Error::environment(method, "connection refused"));
        }
        Ok(query(&*state))
    }

    ///
    /// Executes an EIP-155 legacy value transfer.
    ///
    fn execute(state: &mut State, encoded: &[u8]) -> Result<Receipt, String> {
        let rlp = Rlp::new(encoded);
        let field = |index: usize| -> Result<Vec<u8>, String> {
            rlp.val_at::<Vec<u8>>(index).map_err(|error| error.to_string())
        };

        let nonce = U256::from_big_endian(&field(0)?);
        let gas_price = U256::from_big_endian(&field(1)?);
        let to = Address::from_slice(&field(3)?);
        let value = U256::from_big_endian(&field(4)?);
        let v = U256::from_big_endian(&field(6)?).low_u64();
        let chain_id = (v - 35) / 2;

        let mut unsigned = RlpStream::new_list(9);
        for index in 0..6 {
            unsigned.append_raw(rlp.at(index).map_err(|error| error.to_string())?.as_raw(), 1);
        }
        unsigned.append(&chain_id);
        unsigned.append(&0u8);
        unsigned.append(&0u8);
        let message = web3::signing::keccak256(&unsigned.out());

        let mut signature = [0u8; 64];
        let r = field(7)?;
        let s = field(8)?;
        signature[32 - r.len()..32].copy_from_slice(&r);
        signature[64 - s.len()..].copy_from_slice(&s);
        let recovery_id = (v - 35 - chain_id * 2) as i32;
        let sender = web3::signing::recover(&message, &signature, recovery_id)
            .map_err(|error| format!("{error:?}"))?;

        if state.chain_id.is_some_and(|expected| expected != chain_id) {
            return Err("invalid chain id".to_owned());
        }

        let gas_used = U256::from(Self::TRANSFER_GAS);
        let fee = gas_used * gas_price;
        let tip = gas_used * (gas_price - state.base_fee);
        let coinbase = state.coinbase;

        let account = state.accounts.entry(sender).or_default();
        if account.nonce != nonce {
            return Err(format!("nonce too low: {} != {}", account.nonce, nonce));
        }
        if account.balance < value + fee {
            return Err("insufficient funds".to_owned());
        }
        account.balance -= value + fee;
        account.nonce += U256::one();
        state.accounts.entry(to).or_default().balance += value;
        state.accounts.entry(coinbase).or_default().balance += tip;

        Ok(Receipt {
            transaction_hash: H256::from(web3::signing::keccak256(encoded)),
            block_number: Some(U64::from(state.receipts.len() + 1)),
            gas_used: Some(gas_used),
            status: Some(U64::one()),
        })
    }
}

impl Node for MemoryNode {
    fn set_code(&self, address: Address, code: &Bytes) -> crate::Result<()> {
        self.admin("anvil_setCode", |state| {
            state.accounts.entry(address).or_default().code = code.0.clone();
        })
    }

    fn set_balance(&self, address: Address, balance: U256) -> crate::Result<()> {
        self.admin("anvil_setBalance", |state| {
            state.accounts.entry(address).or_default().balance = balance;
        })
    }

    fn set_nonce(&self, address: Address, nonce: U256) -> crate::Result<()> {
        self.admin("anvil_setNonce", |state| {
            state.accounts.entry(address).or_default().nonce = nonce;
        })
    }

    fn set_storage_at(&self, address: Address, key: H256, value: H256) -> crate::Result<()> {
        self.admin("anvil_setStorageAt", |state| {
            state
                .accounts
                .entry(address)
                .or_default()
                .storage
                .insert(key, value);
        })
    }

    fn set_chain_id(&self, chain_id: u64) -> crate::Result<()> {
        self.admin("anvil_setChainId", |state| state.chain_id = Some(chain_id))
    }

    fn set_coinbase(&self, coinbase: Address) -> crate::Result<()> {
        self.admin("anvil_setCoinbase", |state| state.coinbase = coinbase)
    }

    fn set_next_block_base_fee(&self, base_fee: U256) -> crate::Result<()> {
        self.admin("anvil_setNextBlockBaseFeePerGas", |state| {
            state.base_fee = base_fee
        })
    }

    fn set_block_gas_limit(&self, gas_limit: U256) -> crate::Result<()> {
        self.admin("evm_setBlockGasLimit", |state| state.gas_limit = gas_limit)
    }

    fn balance(&self, address: Address) -> crate::Result<U256> {
        self.query("eth_getBalance", |state| {
            state
                .accounts
                .get(&address)
                .map(|account| account.balance)
                .unwrap_or_default()
        })
    }

    fn transaction_count(&self, address: Address) -> crate::Result<U256> {
        self.query("eth_getTransactionCount", |state| {
            state
                .accounts
                .get(&address)
                .map(|account| account.nonce)
                .unwrap_or_default()
        })
    }

    fn code(&self, address: Address) -> crate::Result<Bytes> {
        self.query("eth_getCode", |state| {
            Bytes(
                state
                    .accounts
                    .get(&address)
                    .map(|account| account.code.clone())
                    .unwrap_or_default(),
            )
        })
    }

    fn storage_at(&self, address: Address, key: H256) -> crate::Result<H256> {
        self.query("eth_getStorageAt", |state| {
            state
                .accounts
                .get(&address)
                .and_then(|account| account.storage.get(&key).copied())
                .unwrap_or_default()
        })
    }

    fn send_raw_transaction(&self, encoded: &[u8]) -> crate::Result<H256> {
        let mut state = self.state.borrow_mut();
        if state.unreachable {
            return Err(Error::environment("eth_sendRawTransaction", "connection refused"));
        }
        let receipt = Self::execute(&mut *state, encoded)
            .map_err(|error| Error::environment("eth_sendRawTransaction", error))?;
        let hash = receipt.transaction_hash;
        state.receipts.insert(hash, receipt);
        state.remaining_polls = state.pending_polls;
        state.events.push(Event::Submitted(hash));
        Ok(hash)
    }

    fn transaction_receipt(&self, hash: H256) -> crate::Result<Option<Receipt>> {
        let mut state = self.state.borrow_mut();
        if state.unreachable {
            return Err(Error::environment(
                "eth_getTransactionReceipt",
                "connection refused",
            ));
        }
        if state.remaining_polls > 0 {
            state.remaining_polls -= 1;
            return Ok(None);
        }
        let receipt = state.receipts.get(&hash).cloned();
        if receipt.is_some() {
            state.events.push(Event::Confirmed(hash));
        }
        Ok(receipt)
    }
}
