//!
//! The protocol version to launch the node with.
//!

///
/// The protocol version to launch the node with.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hardfork {
    /// Before the base fee.
    Berlin,
    /// EIP-1559 base fee.
    London,
    /// Withdrawals.
    Shanghai,
    /// Blobs and the beacon block root.
    Cancun,
    /// Execution layer requests.
    Prague,
}

impl Hardfork {
    /// All supported forks, oldest first.
    pub const ALL: [Self; 5] = [
        Self::Berlin,
        Self::London,
        Self::Shanghai,
        Self::Cancun,
        Self::Prague,
    ];

    ///
    /// Infers the fork from the number of block header fields.
    ///
    pub fn from_header_field_count(count: usize) -> Self {
        match count {
            21.. => Self::Prague,
            20 => Self::Cancun,
            17..=19 => Self::Shanghai,
            16 => Self::London,
            _ => Self::Berlin,
        }
    }
}

impl std::str::FromStr for Hardfork {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|fork| fork.to_string().eq_ignore_ascii_case(string))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown hardfork `{}`. Supported hardforks: {}",
                    string,
                    Self::ALL
                        .into_iter()
                        .map(|element| element.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            })
    }
}

impl std::fmt::Display for Hardfork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Berlin => write!(f, "berlin"),
            Self::London => write!(f, "london"),
            Self::Shanghai => write!(f, "shanghai"),
            Self::Cancun => write!(f, "cancun"),
            Self::Prague => write!(f, "prague"),
        }
    }
}
