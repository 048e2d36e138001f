//! Chain IDs of the networks contracts are commonly deployed to.

pub const MAINNET: u64 = 1;
pub const GOERLI: u64 = 5;
pub const GNOSIS: u64 = 100;
pub const SEPOLIA: u64 = 11155111;
pub const HOLESKY: u64 = 17000;
pub const ARBITRUM_ONE: u64 = 42161;
pub const BASE: u64 = 8453;
pub const POLYGON: u64 = 137;
pub const OPTIMISM: u64 = 10;
/// Local anvil and hardhat nodes.
pub const LOCAL: u64 = 31337;

/// Human readable name of a well known chain.
pub fn name(chain_id: u64) -> Option<&'static str> {
    Some(match chain_id {
        MAINNET => "mainnet",
        GOERLI => "goerli",
        GNOSIS => "gnosis",
        SEPOLIA => "sepolia",
        HOLESKY => "holesky",
        ARBITRUM_ONE => "arbitrum-one",
        BASE => "base",
        POLYGON => "polygon",
        OPTIMISM => "optimism",
        LOCAL => "local",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_chains() {
        assert_eq!(name(GOERLI), Some("goerli"));
        assert_eq!(name(LOCAL), Some("local"));
        assert_eq!(name(424242), None);
    }
}
