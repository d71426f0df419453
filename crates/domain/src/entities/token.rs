use crate::token::Address;
use serde::{Deserialize, Serialize};

/// ERC-20 style token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
}

impl Token {
    pub fn new(
        address: Address,
        symbol: impl Into<String>,
        decimals: u8,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
            name: name.into(),
        }
    }
}
