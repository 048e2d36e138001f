pub mod artifact;
pub mod networks;

pub use artifact::{Artifact, ArtifactError, Artifacts};
