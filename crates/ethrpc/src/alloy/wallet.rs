use {
    alloy::{
        network::EthereumWallet,
        primitives::B256,
        signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    },
    anyhow::{Context, Result},
};

/// Mnemonic of the accounts anvil and the hardhat network fund by default.
pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

pub fn private_key_signer(key: &B256) -> Result<PrivateKeySigner> {
    // The error is not included since it could leak parts of the key.
    PrivateKeySigner::from_bytes(key).ok().context("invalid private key")
}

pub fn mnemonic_signer(phrase: &str, index: u32) -> Result<PrivateKeySigner> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .index(index)
        .context("invalid derivation index")?
        .build()
        .ok()
        .context("invalid mnemonic")
}

/// Wallet signing with the first account of a local test node.
#[cfg(any(test, feature = "test-util"))]
pub fn test_node_wallet() -> EthereumWallet {
    EthereumWallet::new(mnemonic_signer(TEST_MNEMONIC, 0).expect("valid test mnemonic"))
}

pub fn wallet(signer: PrivateKeySigner) -> EthereumWallet {
    EthereumWallet::new(signer)
}
