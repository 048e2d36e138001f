//! Deployment configuration loaded from a TOML file. It plays the role of the
//! network table of a Hardhat project: every network has a node URL, the
//! account that pays for deployments and some submission parameters.

use {
    alloy::primitives::{B256, Bytes},
    anyhow::{Context, Result, anyhow, ensure},
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        fmt::{self, Debug, Formatter},
        path::{Path, PathBuf},
        time::Duration,
    },
    tokio::fs,
    url::Url,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct File {
    /// Network used when none is selected on the command line.
    default_network: Option<String>,

    /// Artifacts directory, relative paths are resolved against the directory
    /// of the config file.
    #[serde(default = "default_artifacts")]
    artifacts: PathBuf,

    #[serde(default)]
    networks: BTreeMap<String, NetworkFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct NetworkFile {
    url: Url,

    /// Expected chain ID of the node behind `url`. Checked before deploying.
    chain_id: Option<u64>,

    #[serde(default = "default_confirmations")]
    confirmations: u64,

    /// How long to wait for the creation transaction to be confirmed.
    /// Waits indefinitely if unset.
    #[serde(default, with = "humantime_serde")]
    receipt_timeout: Option<Duration>,

    account: Account,

    /// ABI encoded constructor arguments appended to the creation code.
    #[serde(default)]
    constructor_args: Bytes,
}

fn default_artifacts() -> PathBuf {
    "artifacts".into()
}

fn default_confirmations() -> u64 {
    1
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Account {
    PrivateKey(B256),
    Mnemonic {
        phrase: String,
        #[serde(default)]
        index: u32,
    },
}

impl Debug for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrivateKey(_) => f.write_str("PrivateKey(SECRET)"),
            Self::Mnemonic { index, .. } => f
                .debug_struct("Mnemonic")
                .field("phrase", &"SECRET")
                .field("index", index)
                .finish(),
        }
    }
}

#[derive(Clone)]
pub struct Network {
    pub name: String,
    pub url: Url,
    pub chain_id: Option<u64>,
    pub confirmations: u64,
    pub receipt_timeout: Option<Duration>,
    pub account: Account,
    pub constructor_args: Bytes,
}

impl Debug for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Hosted node URLs carry API keys in their path or query.
        f.debug_struct("Network")
            .field("name", &self.name)
            .field("url", &self.url.origin().ascii_serialization())
            .field("chain_id", &self.chain_id)
            .field("confirmations", &self.confirmations)
            .field("receipt_timeout", &self.receipt_timeout)
            .field("account", &self.account)
            .field("constructor_args", &self.constructor_args)
            .finish()
    }
}

/// Everything a single deployment needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub network: Network,
    pub artifacts: PathBuf,
    pub contract: String,
}

/// Loads the configuration file at `path` and selects the network to deploy
/// to.
pub async fn load(path: &Path, network: Option<&str>, contract: &str) -> Result<Config> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    let base = path.parent().unwrap_or(Path::new(""));
    parse(&data, base, network, contract).with_context(|| format!("invalid config {path:?}"))
}

fn parse(data: &str, base: &Path, network: Option<&str>, contract: &str) -> Result<Config> {
    // Not printing the detailed error because it could leak private keys.
    let file: File = toml::de::from_str(data).map_err(|_| anyhow!("malformed TOML"))?;

    let name = match network.map(str::to_owned).or(file.default_network) {
        Some(name) => name,
        None => {
            ensure!(
                file.networks.len() == 1,
                "no network selected and no default network configured, available networks: \
                 {:?}",
                file.networks.keys().collect::<Vec<_>>()
            );
            file.networks
                .keys()
                .next()
                .cloned()
                .context("no networks configured")?
        }
    };
    let available = file.networks.keys().cloned().collect::<Vec<_>>();
    let mut networks = file.networks;
    let selected = networks
        .remove(&name)
        .with_context(|| format!("unknown network {name:?}, available networks: {available:?}"))?;
    ensure!(
        selected.confirmations > 0,
        "network {name:?} needs at least one confirmation"
    );

    Ok(Config {
        network: Network {
            name,
            url: selected.url,
            chain_id: selected.chain_id,
            confirmations: selected.confirmations,
            receipt_timeout: selected.receipt_timeout,
            account: selected.account,
            constructor_args: selected.constructor_args,
        },
        artifacts: base.join(file.artifacts),
        contract: contract.to_owned(),
    })
}
