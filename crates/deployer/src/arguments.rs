use {clap::Parser, std::path::PathBuf};

#[derive(Debug, Parser)]
pub struct Arguments {
    /// Path to the TOML file describing the networks contracts can be
    /// deployed to and where the compiled artifacts live.
    #[clap(long, env, default_value = "deployer.toml")]
    pub config: PathBuf,

    /// Name of the network to deploy to. Falls back to the `default-network`
    /// of the config file.
    #[clap(long, env)]
    pub network: Option<String>,

    /// Name of the contract to deploy, either bare (`Ballot`) or fully
    /// qualified (`contracts/Ballot.sol:Ballot`).
    #[clap(long, env, default_value = "Ballot")]
    pub contract: String,

    #[clap(long, env, default_value = "warn,deployer=info,contracts=info,ethrpc=info")]
    pub log_filter: String,

    /// Emit logs as JSON.
    #[clap(long, env)]
    pub log_json: bool,
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            config,
            network,
            contract,
            log_filter,
            log_json,
        } = self;

        writeln!(f, "config: {}", config.display())?;
        writeln!(f, "network: {network:?}")?;
        writeln!(f, "contract: {contract}")?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_json: {log_json}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deploy_ballot() {
        let args = Arguments::parse_from(["deployer"]);
        assert_eq!(args.contract, "Ballot");
        assert_eq!(args.config, PathBuf::from("deployer.toml"));
        assert_eq!(args.network, None);
    }

    #[test]
    fn overrides() {
        let args = Arguments::parse_from([
            "deployer",
            "--config",
            "/etc/deployer.toml",
            "--network",
            "sepolia",
            "--contract",
            "contracts/Ballot.sol:Ballot",
        ]);
        assert_eq!(args.network.as_deref(), Some("sepolia"));
        assert_eq!(args.contract, "contracts/Ballot.sol:Ballot");
    }
}
