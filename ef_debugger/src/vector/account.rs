//!
//! The test vector account state.
//!

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use web3::types::Address;
use web3::types::Bytes;
use web3::types::U256;

///
/// The account state.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// The account bytecode.
    #[serde(default)]
    pub code: Bytes,
    /// The account balance.
    #[serde(with = "hex_u256")]
    pub balance: U256,
    /// The account nonce.
    #[serde(with = "hex_u256")]
    pub nonce: U256,
    /// The account storage. Absent keys are zero.
    #[serde(default, with = "hex_storage")]
    pub storage: BTreeMap<U256, U256>,
}

///
/// The address-keyed accounts, in document order.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accounts(Vec<(Address, AccountState)>);

impl Accounts {
    ///
    /// A shortcut constructor.
    ///
    pub fn new(accounts: Vec<(Address, AccountState)>) -> Self {
        Self(accounts)
    }

    ///
    /// Iterates over the accounts in their stored order.
    ///
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &AccountState)> {
        self.0.iter().map(|(address, state)| (address, state))
    }

    ///
    /// Returns the state of `address`.
    ///
    pub fn get(&self, address: &Address) -> Option<&AccountState> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == address)
            .map(|(_, state)| state)
    }

    ///
    /// The number of accounts.
    ///
    pub fn len(&self) -> usize {
        self.0.len()
    }

    ///
    /// Whether there are no accounts.
    ///
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Accounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(address, state)| (address, state)))
    }
}

impl<'de> Deserialize<'de> for Accounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = Accounts;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("A map of addresses to account states")
            }
            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut accounts = Vec::with_capacity(map.size_hint().unwrap_or_default());
                while let Some((address, state)) = map.next_entry::<Address, AccountState>()? {
                    if accounts.iter().any(|(existing, _)| *existing == address) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate account {address:?}"
                        )));
                    }
                    accounts.push((address, state));
                }
                Ok(Accounts(accounts))
            }
        }
        deserializer.deserialize_map(V)
    }
}

///
/// Hexadecimal `U256` strings of arbitrary leading-zero padding.
///
pub(crate) mod hex_u256 {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    use web3::types::U256;

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        crate::utils::parse_hex_u256(&string).map_err(serde::de::Error::custom)
    }
}

///
/// Storage maps with hexadecimal keys and values.
///
pub(crate) mod hex_storage {
    use std::collections::BTreeMap;
    use std::collections::HashMap;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    use web3::types::U256;

    pub fn serialize<S>(storage: &BTreeMap<U256, U256>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            storage
                .iter()
                .map(|(key, value)| (format!("{key:#x}"), format!("{value:#x}"))),
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<U256, U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        let mut storage = BTreeMap::new();
        for (key, value) in raw {
            let key = crate::utils::parse_hex_u256(&key).map_err(serde::de::Error::custom)?;
            let value = crate::utils::parse_hex_u256(&value).map_err(serde::de::Error::custom)?;
            if storage.insert(key, value).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "duplicate storage key {key:#x}"
                )));
            }
        }
        Ok(storage)
    }
}
