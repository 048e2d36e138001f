use {contracts::ArtifactError, thiserror::Error};

/// Why a deployment run failed. Every variant ends the run with exit code 1.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The contract could not be turned into a deployable factory.
    #[error("failed to resolve contract")]
    Resolution(#[from] ArtifactError),
    /// Submitting or confirming the creation transaction failed.
    #[error("deployment failed")]
    Deployment(#[source] anyhow::Error),
    /// Invalid configuration or a node that does not match it.
    #[error("invalid configuration")]
    Configuration(#[source] anyhow::Error),
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}
