use {
    crate::{error::DeployError, traits::ContractFactoryProvider},
    alloy::primitives::Address,
    std::{
        fmt::{self, Display, Formatter},
        io::Write,
    },
};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Deploys a single contract and reports where it ended up.
pub struct Deployer<P> {
    provider: P,
    contract: String,
    network: String,
}

/// Successful outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Name of the configured network the contract was deployed to.
    pub network: String,
    pub address: Address,
}

impl Display for Deployment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Contract deployed on the {} testnet at => {}",
            self.network, self.address
        )
    }
}

impl<P: ContractFactoryProvider> Deployer<P> {
    pub fn new(provider: P, contract: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            provider,
            contract: contract.into(),
            network: network.into(),
        }
    }

    /// Performs exactly one deployment attempt. Every step only runs if the
    /// previous one succeeded.
    pub async fn run(&self) -> Result<Deployment, DeployError> {
        let factory = self.provider.contract_factory(&self.contract).await?;
        tracing::debug!(contract = %self.contract, "resolved contract factory");

        let contract = factory.deploy().await?;
        tracing::debug!(contract = %self.contract, "contract creation confirmed");

        // From here on the contract exists on chain even if we fail to
        // report it.
        let address = contract.address().await?;
        tracing::info!(contract = %self.contract, network = %self.network, ?address, "deployed");

        Ok(Deployment {
            network: self.network.clone(),
            address,
        })
    }
}

/// Writes the outcome of a run and returns the process exit code. A success
/// produces exactly one line on `out`, a failure the full error chain on
/// `err`.
pub fn report(
    outcome: Result<Deployment, DeployError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    match outcome {
        Ok(deployment) => match writeln!(out, "{deployment}").and_then(|_| out.flush()) {
            Ok(()) => EXIT_SUCCESS,
            Err(write_err) => {
                // The contract is deployed but nobody learns where.
                tracing::error!(
                    ?write_err,
                    address = ?deployment.address,
                    "failed to report deployment"
                );
                EXIT_FAILURE
            }
        },
        Err(error) => {
            tracing::debug!(?error, "deployment run failed");
            // anyhow renders the whole chain of causes.
            let _ = writeln!(err, "Error: {:?}", anyhow::Error::from(error));
            EXIT_FAILURE
        }
    }
}
