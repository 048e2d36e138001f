//! Node backed implementation of the deployment traits. Contracts are
//! resolved from compiled artifacts and deployed with a signing alloy
//! provider.

use {
    crate::{
        config::{Account, Config, Network},
        error::DeployError,
        traits::{ContractFactory, ContractFactoryProvider, DeployedContract},
    },
    alloy::{
        consensus::Transaction as _,
        network::{ReceiptResponse as _, TransactionBuilder},
        primitives::{Address, B256, Bytes},
        providers::Provider,
        rpc::types::TransactionRequest,
        transports::TransportError,
    },
    anyhow::{Context, anyhow},
    contracts::{Artifact, Artifacts},
    ethrpc::{
        AlloyProvider,
        alloy::{errors::TransportErrorExt, wallet},
    },
};

/// Resolves contracts from an artifacts directory.
pub struct ArtifactFactoryProvider {
    artifacts: Artifacts,
    provider: AlloyProvider,
    network: Network,
}

impl ArtifactFactoryProvider {
    pub fn new(artifacts: Artifacts, provider: AlloyProvider, network: Network) -> Self {
        Self {
            artifacts,
            provider,
            network,
        }
    }

    /// Sets up the signing provider for the configured network and account.
    /// Nothing is sent to the node until a factory deploys.
    pub fn from_config(config: &Config) -> Result<Self, DeployError> {
        let network = &config.network;
        let signer = match &network.account {
            Account::PrivateKey(key) => wallet::private_key_signer(key),
            Account::Mnemonic { phrase, index } => wallet::mnemonic_signer(phrase, *index),
        }
        .map_err(DeployError::Configuration)?;
        tracing::info!(
            network = %network.name,
            account = ?signer.address(),
            "deploying from account"
        );

        let provider =
            ethrpc::alloy::provider_with_wallet(&network.url, "deployer", wallet::wallet(signer));
        Ok(Self::new(
            Artifacts::new(&config.artifacts),
            provider,
            network.clone(),
        ))
    }
}

/// Checks that the node behind `provider` serves the chain the network is
/// configured for, so the reported network name can be trusted.
async fn verify_chain(provider: &AlloyProvider, network: &Network) -> Result<u64, DeployError> {
    let chain_id = provider
        .get_chain_id()
        .await
        .context("could not fetch current chain id")
        .map_err(DeployError::Deployment)?;

    match network.chain_id {
        Some(expected) if expected != chain_id => {
            Err(DeployError::Configuration(anyhow!(
                "network {:?} is configured for chain {expected} but the node serves chain \
                 {chain_id}",
                network.name
            )))
        }
        Some(_) => {
            tracing::debug!(chain_id, "connected to expected chain");
            Ok(chain_id)
        }
        None => {
            tracing::warn!(
                network = %network.name,
                chain_id,
                known_as = ?contracts::networks::name(chain_id),
                "no chain id configured, cannot verify the node serves this network"
            );
            Ok(chain_id)
        }
    }
}

#[async_trait::async_trait]
impl ContractFactoryProvider for ArtifactFactoryProvider {
    async fn contract_factory(&self, name: &str) -> Result<Box<dyn ContractFactory>, DeployError> {
        let artifact = self.artifacts.read(name)?;
        tracing::debug!(
            contract = %artifact.fully_qualified_name(),
            size = artifact.bytecode.len(),
            "loaded artifact"
        );
        Ok(Box::new(ArtifactFactory {
            artifact,
            provider: self.provider.clone(),
            network: self.network.clone(),
        }))
    }
}

pub struct ArtifactFactory {
    artifact: Artifact,
    provider: AlloyProvider,
    network: Network,
}

impl ArtifactFactory {
    /// Creation code followed by the constructor arguments.
    fn deploy_code(&self) -> Result<Bytes, DeployError> {
        let expected = self.artifact.constructor_inputs();
        let args = &self.network.constructor_args;
        if expected > 0 && args.is_empty() {
            return Err(DeployError::Deployment(anyhow!(
                "constructor of {} expects {expected} arguments but none are configured",
                self.artifact.contract_name
            )));
        }
        Ok([&self.artifact.bytecode[..], &args[..]].concat().into())
    }
}

fn submission_error(err: TransportError) -> DeployError {
    let context = if err.is_revert() {
        "contract creation reverts"
    } else if err.is_node_rejection() {
        "node rejected the contract creation"
    } else {
        "failed to submit the contract creation"
    };
    DeployError::Deployment(anyhow::Error::new(err).context(context))
}

#[async_trait::async_trait]
impl ContractFactory for ArtifactFactory {
    async fn deploy(&self) -> Result<Box<dyn DeployedContract>, DeployError> {
        let code = self.deploy_code()?;
        verify_chain(&self.provider, &self.network).await?;

        let tx = TransactionRequest::default().with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(submission_error)?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(
            contract = %self.artifact.contract_name,
            ?tx_hash,
            "submitted contract creation"
        );

        let receipt = pending
            .with_required_confirmations(self.network.confirmations)
            .with_timeout(self.network.receipt_timeout)
            .get_receipt()
            .await
            .with_context(|| format!("contract creation {tx_hash:?} was not confirmed"))
            .map_err(DeployError::Deployment)?;
        if !receipt.status() {
            return Err(DeployError::Deployment(anyhow!(
                "contract creation {tx_hash:?} reverted"
            )));
        }
        tracing::debug!(
            ?tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "contract creation mined"
        );

        Ok(Box::new(Deployed {
            provider: self.provider.clone(),
            tx_hash,
            sender: receipt.from,
            contract_address: receipt.contract_address,
        }))
    }
}

/// Handle of a mined contract creation.
pub struct Deployed {
    pub(crate) provider: AlloyProvider,
    pub(crate) tx_hash: B256,
    pub(crate) sender: Address,
    /// As reported by the receipt. Some nodes leave it empty.
    pub(crate) contract_address: Option<Address>,
}

impl Deployed {
    /// Address derived from the sender and nonce of the creation transaction.
    async fn derived_address(&self) -> anyhow::Result<Address> {
        let tx = self
            .provider
            .get_transaction_by_hash(self.tx_hash)
            .await
            .context("failed to fetch the creation transaction")?
            .with_context(|| format!("creation transaction {:?} not found", self.tx_hash))?;
        Ok(self.sender.create(tx.nonce()))
    }
}

#[async_trait::async_trait]
impl DeployedContract for Deployed {
    async fn address(&self) -> Result<Address, DeployError> {
        let address = match self.contract_address {
            Some(address) => address,
            None => self.derived_address().await?,
        };

        let code = self
            .provider
            .get_code_at(address)
            .await
            .context("failed to fetch the deployed code")?;
        if code.is_empty() {
            return Err(anyhow!(
                "no code at {address} after contract creation {:?}",
                self.tx_hash
            )
            .into());
        }
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{U64, address, b256},
        contracts::ArtifactError,
        ethrpc::alloy::mocked_provider,
        serde_json::json,
        std::fs,
    };

    const CONTRACT: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
    const SENDER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const TX_HASH: B256 =
        b256!("0x1111111111111111111111111111111111111111111111111111111111111111");

    fn network(chain_id: Option<u64>) -> Network {
        Network {
            name: "goerli".into(),
            url: "http://localhost:8545".parse().unwrap(),
            chain_id,
            confirmations: 1,
            receipt_timeout: None,
            account: Account::PrivateKey(B256::repeat_byte(1)),
            constructor_args: Bytes::new(),
        }
    }

    fn deployed(provider: AlloyProvider, contract_address: Option<Address>) -> Deployed {
        Deployed {
            provider,
            tx_hash: TX_HASH,
            sender: SENDER,
            contract_address,
        }
    }

    #[tokio::test]
    async fn chain_matches() {
        let (provider, asserter) = mocked_provider();
        asserter.push_success(&U64::from(5));

        assert_eq!(verify_chain(&provider, &network(Some(5))).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn chain_mismatch_is_rejected() {
        let (provider, asserter) = mocked_provider();
        asserter.push_success(&U64::from(1));

        let err = verify_chain(&provider, &network(Some(5))).await.unwrap_err();
        let DeployError::Configuration(err) = err else {
            panic!("unexpected error {err:?}");
        };
        assert!(err.to_string().contains("configured for chain 5"));
    }

    #[tokio::test]
    async fn unverified_chain_is_accepted() {
        let (provider, asserter) = mocked_provider();
        asserter.push_success(&U64::from(1));

        assert_eq!(verify_chain(&provider, &network(None)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unreachable_node() {
        let (provider, asserter) = mocked_provider();
        asserter.push_failure_msg("connection refused");

        assert!(matches!(
            verify_chain(&provider, &network(Some(5))).await,
            Err(DeployError::Deployment(_))
        ));
    }

    #[tokio::test]
    async fn address_from_receipt_with_code() {
        let (provider, asserter) = mocked_provider();
        asserter.push_success(&Bytes::from_static(&[0x60, 0x80]));

        let address = deployed(provider, Some(CONTRACT)).address().await.unwrap();
        assert_eq!(address, CONTRACT);
    }

    #[tokio::test]
    async fn address_without_code_fails() {
        let (provider, asserter) = mocked_provider();
        asserter.push_success(&Bytes::new());

        let err = deployed(provider, Some(CONTRACT)).address().await.unwrap_err();
        assert!(matches!(err, DeployError::Unknown(_)));
        assert!(err.to_string().contains("no code at"));
    }

    #[tokio::test]
    async fn address_lookup_failure() {
        let (provider, asserter) = mocked_provider();
        asserter.push_failure_msg("header not found");

        assert!(matches!(
            deployed(provider, Some(CONTRACT)).address().await,
            Err(DeployError::Unknown(_))
        ));
    }

    #[test]
    fn create_address_matches_first_deployment_of_test_account() {
        assert_eq!(SENDER.create(0), CONTRACT);
    }

    /// Creation transaction of the test account with nonce 1 as served by
    /// anvil.
    fn creation_transaction() -> serde_json::Value {
        json!({
            "hash": TX_HASH,
            "nonce": "0x1",
            "blockHash": "0x6e4e53d1de650d5a5ebed19b38321db369ef1dc357904284ecf4d89b8834969c",
            "blockNumber": "0x2",
            "transactionIndex": "0x0",
            "from": SENDER,
            "to": null,
            "value": "0x0",
            "gasPrice": "0x3a29f0f8",
            "gas": "0x1c9c380",
            "maxFeePerGas": "0xba43b7400",
            "maxPriorityFeePerGas": "0x5f5e100",
            "input": "0x6001600c60003960016000f300",
            "r": "0xd309309a59a49021281cb6bb41d164c96eab4e50f0c1bd24c03ca336e7bc2bb7",
            "s": "0x28a7f089143d0a1355ebeb2a1b9f0e5ad9eca4303021c1400d61bc23c9ac5319",
            "v": "0x0",
            "yParity": "0x0",
            "chainId": "0x7a69",
            "accessList": [],
            "type": "0x2",
        })
    }

    #[tokio::test]
    async fn address_derived_from_creation_transaction() {
        let (provider, asserter) = mocked_provider();
        asserter.push_success(&creation_transaction());
        asserter.push_success(&Bytes::from_static(&[0x60, 0x80]));

        let address = deployed(provider, None).address().await.unwrap();
        assert_eq!(address, SENDER.create(1));
        assert_eq!(
            address,
            address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512")
        );
    }

    #[tokio::test]
    async fn address_without_creation_transaction() {
        let (provider, asserter) = mocked_provider();
        asserter.push_success(&serde_json::Value::Null);

        let err = deployed(provider, None).address().await.unwrap_err();
        assert!(matches!(err, DeployError::Unknown(_)));
        let message = format!("{err:#}");
        assert!(message.contains("creation transaction"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn classifies_submission_errors() {
        let message = |err| match submission_error(err) {
            DeployError::Deployment(err) => err.to_string(),
            err => panic!("unexpected error {err:?}"),
        };
        assert_eq!(
            message(ethrpc::alloy::errors::testing_revert()),
            "contract creation reverts"
        );
        assert_eq!(
            message(ethrpc::alloy::errors::testing_node_rejection()),
            "node rejected the contract creation"
        );
        assert_eq!(
            message(ethrpc::alloy::errors::testing_transport_failure()),
            "failed to submit the contract creation"
        );
    }

    fn artifacts_with(abi: serde_json::Value) -> (tempfile::TempDir, Artifacts) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("contracts/Ballot.sol");
        fs::create_dir_all(&source).unwrap();
        fs::write(
            source.join("Ballot.json"),
            serde_json::to_vec(&json!({
                "contractName": "Ballot",
                "sourceName": "contracts/Ballot.sol",
                "abi": abi,
                "bytecode": "0x6001600c60003960016000f300",
                "linkReferences": {},
            }))
            .unwrap(),
        )
        .unwrap();
        let artifacts = Artifacts::new(dir.path());
        (dir, artifacts)
    }

    #[tokio::test]
    async fn unknown_contract_is_a_resolution_error() {
        let (_dir, artifacts) = artifacts_with(json!([]));
        let (provider, _asserter) = mocked_provider();
        let factories = ArtifactFactoryProvider::new(artifacts, provider, network(None));

        assert!(matches!(
            factories.contract_factory("Token").await,
            Err(DeployError::Resolution(ArtifactError::NotFound { .. }))
        ));
        assert!(factories.contract_factory("Ballot").await.is_ok());
    }

    #[tokio::test]
    async fn appends_constructor_arguments() {
        let (_dir, artifacts) = artifacts_with(json!([{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [{ "name": "chairperson", "type": "address", "internalType": "address" }],
        }]));
        let (provider, _asserter) = mocked_provider();
        let artifact = artifacts.read("Ballot").unwrap();

        let mut factory = ArtifactFactory {
            artifact,
            provider,
            network: network(None),
        };
        assert!(matches!(
            factory.deploy_code(),
            Err(DeployError::Deployment(_))
        ));

        let args = SENDER.into_word();
        factory.network.constructor_args = Bytes::copy_from_slice(args.as_slice());
        let code = factory.deploy_code().unwrap();
        assert_eq!(code.len(), 13 + 32);
        assert!(code.ends_with(args.as_slice()));
    }

    #[tokio::test]
    async fn missing_constructor_arguments_never_reach_the_node() {
        let (_dir, artifacts) = artifacts_with(json!([{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [{ "name": "chairperson", "type": "address", "internalType": "address" }],
        }]));
        // No responses are queued, any request would fail with a transport
        // error instead.
        let (provider, _asserter) = mocked_provider();
        let factory = ArtifactFactory {
            artifact: artifacts.read("Ballot").unwrap(),
            provider,
            network: network(Some(5)),
        };

        let Err(DeployError::Deployment(err)) = factory.deploy().await else {
            panic!("expected deployment error");
        };
        assert!(err.to_string().contains("expects 1 arguments"));
    }

    #[tokio::test]
    async fn chain_mismatch_stops_deployment_before_submission() {
        let (_dir, artifacts) = artifacts_with(json!([]));
        let (provider, asserter) = mocked_provider();
        // Only the chain id is answered, a submission would fail with a
        // transport error instead.
        asserter.push_success(&U64::from(1));
        let factories = ArtifactFactoryProvider::new(artifacts, provider, network(Some(5)));
        let factory = factories.contract_factory("Ballot").await.unwrap();

        assert!(matches!(
            factory.deploy().await,
            Err(DeployError::Configuration(_))
        ));
        assert!(asserter.read_q().is_empty());
    }
}
