pub mod arguments;
pub mod config;
pub mod deployer;
pub mod error;
pub mod factory;
pub mod traits;

use {
    crate::{
        deployer::{Deployer, Deployment},
        error::DeployError,
        factory::ArtifactFactoryProvider,
    },
    std::{io, process::ExitCode},
};

/// Runs one deployment as described by `args` and turns the outcome into the
/// process exit code.
pub async fn start(args: arguments::Arguments) -> ExitCode {
    let outcome = run(&args).await;
    let code = deployer::report(outcome, &mut io::stdout().lock(), &mut io::stderr().lock());
    ExitCode::from(code)
}

/// Loads the config and runs the deployment. The node is only contacted once
/// the contract has been resolved.
pub(crate) async fn run(args: &arguments::Arguments) -> Result<Deployment, DeployError> {
    let config = config::load(&args.config, args.network.as_deref(), &args.contract)
        .await
        .map_err(DeployError::Configuration)?;
    tracing::debug!(?config, "loaded config");

    let provider = ArtifactFactoryProvider::from_config(&config)?;
    Deployer::new(provider, config.contract, config.network.name)
        .run()
        .await
}
