//! Boundaries to the blockchain. Implemented by [`crate::factory`] for real
//! nodes and mocked in tests.

use {crate::error::DeployError, alloy::primitives::Address};

/// Resolves contract names into factories.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContractFactoryProvider: Send + Sync {
    /// Fails with [`DeployError::Resolution`] if `name` is unknown.
    async fn contract_factory(&self, name: &str) -> Result<Box<dyn ContractFactory>, DeployError>;
}

/// Deploys one specific compiled contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContractFactory: Send + Sync {
    /// Submits the contract creation and waits until the network confirmed it.
    async fn deploy(&self) -> Result<Box<dyn DeployedContract>, DeployError>;
}

/// A contract that was placed on chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DeployedContract: Send + Sync {
    async fn address(&self) -> Result<Address, DeployError>;
}
