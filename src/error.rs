/// Broad classes of failure, so a caller can decide between "show a
/// placeholder" and "this is a bug".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Lookup,
    Invariant,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("link {source_id} -> {target_id} references missing node `{missing}`")]
    DanglingLink {
        source_id: String,
        target_id: String,
        missing: String,
    },
    #[error("node id `{id}` appears more than once in the same graph")]
    DuplicateNode { id: String },
    #[error("threshold must be a finite number, got {value}")]
    InvalidThreshold { value: f64 },
    #[error("no registry record for id `{id}`")]
    UnknownId { id: String },
    #[error("simulation halted: node `{id}` reached a non-finite position")]
    NonFinitePosition { id: String },
    #[error("simulation is halted until the next successful bind")]
    Halted,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DanglingLink { .. } | Self::DuplicateNode { .. } | Self::InvalidThreshold { .. } => {
                ErrorKind::Validation
            }
            Self::UnknownId { .. } => ErrorKind::Lookup,
            Self::NonFinitePosition { .. } | Self::Halted => ErrorKind::Invariant,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
