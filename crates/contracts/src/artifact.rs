//! Compiled contract artifacts in the layout produced by Hardhat:
//! `<artifacts>/<source path>/<ContractName>.json`, next to
//! `<ContractName>.dbg.json` debug files and a `build-info` directory.

use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        fs,
        io,
        path::{Path, PathBuf},
    },
    thiserror::Error,
};

/// Directory that holds the compiler inputs and outputs. It never contains
/// contract artifacts.
const BUILD_INFO_DIR: &str = "build-info";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact for contract {name:?} not found in {}", root.display())]
    NotFound { name: String, root: PathBuf },
    #[error(
        "there are multiple artifacts for contract {name:?}, use one of the fully qualified \
         names: {candidates:?}"
    )]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
    #[error("malformed artifact {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {} belongs to contract {found:?}, expected {expected:?}", path.display())]
    NameMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("contract {0:?} has no creation bytecode, it is abstract or an interface")]
    NotDeployable(String),
    #[error("contract {name:?} is missing links for the libraries {libraries:?}")]
    Unlinked {
        name: String,
        libraries: Vec<String>,
    },
    #[error("contract {name:?} has invalid creation bytecode")]
    InvalidBytecode { name: String },
    #[error("failed to read artifacts from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A contract artifact that can be deployed.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    /// Creation code, without constructor arguments.
    pub bytecode: Bytes,
}

impl Artifact {
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Number of arguments the constructor expects.
    pub fn constructor_inputs(&self) -> usize {
        self.abi
            .constructor()
            .map(|constructor| constructor.inputs.len())
            .unwrap_or_default()
    }

    fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let data = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_owned(),
            source,
        })?;
        let raw: RawArtifact =
            serde_json::from_slice(&data).map_err(|source| ArtifactError::Malformed {
                path: path.to_owned(),
                source,
            })?;
        raw.try_into()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    source_name: String,
    abi: JsonAbi,
    // Kept as a string since unlinked bytecode contains placeholders that are
    // not valid hex.
    bytecode: String,
    #[serde(default)]
    link_references: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl TryFrom<RawArtifact> for Artifact {
    type Error = ArtifactError;

    fn try_from(raw: RawArtifact) -> Result<Self, Self::Error> {
        let libraries: Vec<String> = raw
            .link_references
            .iter()
            .flat_map(|(source, libraries)| {
                libraries
                    .keys()
                    .map(move |library| format!("{source}:{library}"))
            })
            .collect();
        if !libraries.is_empty() {
            return Err(ArtifactError::Unlinked {
                name: raw.contract_name,
                libraries,
            });
        }

        let bytecode: Bytes = raw
            .bytecode
            .parse()
            .map_err(|_| ArtifactError::InvalidBytecode {
                name: raw.contract_name.clone(),
            })?;
        if bytecode.is_empty() {
            return Err(ArtifactError::NotDeployable(raw.contract_name));
        }

        Ok(Self {
            contract_name: raw.contract_name,
            source_name: raw.source_name,
            abi: raw.abi,
            bytecode,
        })
    }
}

/// Artifacts directory of a compiled project.
#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads the artifact of a contract. `name` is either a bare contract
    /// name (`Ballot`) or a fully qualified one (`contracts/Ballot.sol:Ballot`).
    pub fn read(&self, name: &str) -> Result<Artifact, ArtifactError> {
        let path = match name.rsplit_once(':') {
            Some((source, contract)) => {
                let path = self.root.join(source).join(format!("{contract}.json"));
                if !path.is_file() {
                    return Err(self.not_found(name));
                }
                path
            }
            None => self.find(name)?,
        };
        tracing::debug!(?path, "reading artifact");

        let artifact = Artifact::from_file(&path)?;
        let expected = name.rsplit_once(':').map_or(name, |(_, contract)| contract);
        if artifact.contract_name != expected {
            return Err(ArtifactError::NameMismatch {
                path,
                expected: expected.to_owned(),
                found: artifact.contract_name,
            });
        }
        Ok(artifact)
    }

    fn find(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let file_name = format!("{name}.json");
        let mut matches = Vec::new();
        match self.collect(&self.root, &file_name, &mut matches) {
            Err(ArtifactError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                return Err(self.not_found(name));
            }
            result => result?,
        }

        match matches.len() {
            0 => Err(self.not_found(name)),
            1 => Ok(matches.remove(0)),
            _ => {
                let mut candidates: Vec<_> = matches
                    .iter()
                    .filter_map(|path| self.qualified_name(path, name))
                    .collect();
                candidates.sort();
                Err(ArtifactError::Ambiguous {
                    name: name.to_owned(),
                    candidates,
                })
            }
        }
    }

    fn collect(
        &self,
        dir: &Path,
        file_name: &str,
        matches: &mut Vec<PathBuf>,
    ) -> Result<(), ArtifactError> {
        let io_err = |source: io::Error| ArtifactError::Io {
            path: dir.to_owned(),
            source,
        };
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if entry.file_type().map_err(io_err)?.is_dir() {
                if entry.file_name() != BUILD_INFO_DIR {
                    self.collect(&path, file_name, matches)?;
                }
            } else if entry.file_name() == file_name {
                // Exact match, `<Name>.dbg.json` debug files never qualify.
                matches.push(path);
            }
        }
        Ok(())
    }

    /// `<root>/contracts/Ballot.sol/Ballot.json` -> `contracts/Ballot.sol:Ballot`
    fn qualified_name(&self, path: &Path, name: &str) -> Option<String> {
        let source = path.parent()?.strip_prefix(&self.root).ok()?;
        let source = source
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("{source}:{name}"))
    }

    fn not_found(&self, name: &str) -> ArtifactError {
        ArtifactError::NotFound {
            name: name.to_owned(),
            root: self.root.clone(),
        }
    }
}
