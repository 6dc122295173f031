//! Error types for Galatea operations.
//!
//! Every engine failure is a named condition grouped by the entity that
//! raises it. Domain operations return the narrow per-entity error; the
//! service layer lifts them into [`GalateaError`] with `?`.

use std::error::Error;
use std::fmt;

/// Result type for Galatea operations.
pub type Result<T> = std::result::Result<T, GalateaError>;

/// Errors that can occur anywhere in Galatea.
#[derive(Debug, Clone, PartialEq)]
pub enum GalateaError {
    /// Mixed-substrate composition errors.
    Mix(MixError),
    /// Substrate-set consistency errors.
    Set(SetError),
    /// Stage grid errors.
    Stage(StageError),
    /// Persistence errors.
    Store(StoreError),
    /// Caller supplied an unusable value.
    InvalidInput(String),
    /// I/O errors (wrapped).
    Io(String),
    /// Serialization errors.
    Serialization(String),
}

impl fmt::Display for GalateaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalateaError::Mix(e) => write!(f, "Mixed substrate error: {}", e),
            GalateaError::Set(e) => write!(f, "Substrate set error: {}", e),
            GalateaError::Stage(e) => write!(f, "Stage error: {}", e),
            GalateaError::Store(e) => write!(f, "Store error: {}", e),
            GalateaError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            GalateaError::Io(msg) => write!(f, "I/O error: {}", msg),
            GalateaError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl Error for GalateaError {}

impl From<MixError> for GalateaError {
    fn from(e: MixError) -> Self {
        GalateaError::Mix(e)
    }
}

impl From<SetError> for GalateaError {
    fn from(e: SetError) -> Self {
        GalateaError::Set(e)
    }
}

impl From<StageError> for GalateaError {
    fn from(e: StageError) -> Self {
        GalateaError::Stage(e)
    }
}

impl From<StoreError> for GalateaError {
    fn from(e: StoreError) -> Self {
        GalateaError::Store(e)
    }
}

impl From<std::io::Error> for GalateaError {
    fn from(e: std::io::Error) -> Self {
        GalateaError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for GalateaError {
    fn from(e: serde_json::Error) -> Self {
        GalateaError::Serialization(e.to_string())
    }
}

/// Errors raised while composing a mixed substrate.
#[derive(Debug, Clone, PartialEq)]
pub enum MixError {
    /// The substrate is already a component of the mix.
    SubstrateExists(String),
    /// The change would push the total above 100%.
    ExceedsMaxPercentage { attempted: f64 },
    /// The substrate is not a component of the mix.
    SubstrateNotFound(String),
    /// A component percentage is not positive, or the total is not 100%.
    InvalidPercentage(f64),
}

impl fmt::Display for MixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixError::SubstrateExists(id) => write!(f, "substrate already exists in the mix: {}", id),
            MixError::ExceedsMaxPercentage { attempted } => {
                write!(f, "total percentage exceeds 100% ({:.4}%)", attempted)
            }
            MixError::SubstrateNotFound(id) => write!(f, "substrate not found in the mix: {}", id),
            MixError::InvalidPercentage(value) => {
                write!(f, "invalid percentage: {:.4} (components must be positive and total exactly 100%)", value)
            }
        }
    }
}

impl Error for MixError {}

/// Errors raised by substrate-set membership rules.
#[derive(Debug, Clone, PartialEq)]
pub enum SetError {
    SubstrateExistsInSet(String),
    MixedSubstrateExistsInSet(String),
    SubstrateNotFoundInSet(String),
    MixedSubstrateNotFoundInSet(String),
    /// The substrate is still a component of a member mix.
    SubstrateInUse { substrate: String, mix: String },
    /// The mix failed its own percentage validation.
    MixedSubstrateInvalid(String),
    /// The mix references substrates that are not members of the set.
    MixedSubstrateContainsUnknownSubstrates { mix: String, unknown: Vec<String> },
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::SubstrateExistsInSet(id) => {
                write!(f, "substrate already exists in the set: {}", id)
            }
            SetError::MixedSubstrateExistsInSet(id) => {
                write!(f, "mixed substrate already exists in the set: {}", id)
            }
            SetError::SubstrateNotFoundInSet(id) => write!(f, "substrate not found in the set: {}", id),
            SetError::MixedSubstrateNotFoundInSet(id) => {
                write!(f, "mixed substrate not found in the set: {}", id)
            }
            SetError::SubstrateInUse { substrate, mix } => write!(
                f,
                "substrate {} is used in mixed substrate {} and cannot be removed",
                substrate, mix
            ),
            SetError::MixedSubstrateInvalid(id) => write!(f, "mixed substrate is invalid: {}", id),
            SetError::MixedSubstrateContainsUnknownSubstrates { mix, unknown } => write!(
                f,
                "mixed substrate {} contains substrates not in the set: {}",
                mix,
                unknown.join(", ")
            ),
        }
    }
}

impl Error for SetError {}

/// Errors raised by stage grid operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    InvalidPosition { x: usize, y: usize },
    SubstrateNotInSet(String),
    MixedSubstrateNotInSet(String),
    InvalidDimensions { width: usize, height: usize },
    /// Strict policy only: the cell is already occupied.
    CellAlreadyHasContent { x: usize, y: usize },
    /// Strict policy only: the cell is already empty.
    CellHasNoContent { x: usize, y: usize },
    /// The supplied set is not the one associated with the stage.
    SubstrateSetMismatch { expected: String, found: String },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::InvalidPosition { x, y } => write!(f, "invalid position ({}, {})", x, y),
            StageError::SubstrateNotInSet(id) => write!(f, "substrate not in set: {}", id),
            StageError::MixedSubstrateNotInSet(id) => write!(f, "mixed substrate not in set: {}", id),
            StageError::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions {}x{}", width, height)
            }
            StageError::CellAlreadyHasContent { x, y } => {
                write!(f, "cell ({}, {}) already has content", x, y)
            }
            StageError::CellHasNoContent { x, y } => write!(f, "cell ({}, {}) has no content", x, y),
            StageError::SubstrateSetMismatch { expected, found } => write!(
                f,
                "stage uses substrate set {}, got {}",
                expected, found
            ),
        }
    }
}

impl Error for StageError {}

/// Persistence errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    NotFound { kind: &'static str, id: String },
    AlreadyExists { kind: &'static str, id: String },
    /// The entity is still referenced by another stored aggregate.
    InUse { kind: &'static str, id: String, by: String },
    /// The backend itself failed.
    Backend(String),
    /// A stored record could not be decoded.
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { kind, id } => write!(f, "{} not found: {}", kind, id),
            StoreError::AlreadyExists { kind, id } => write!(f, "{} already exists: {}", kind, id),
            StoreError::InUse { kind, id, by } => write!(f, "{} {} is in use by {}", kind, id, by),
            StoreError::Backend(msg) => write!(f, "backend failure: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "corrupt record: {}", msg),
        }
    }
}

impl Error for StoreError {}

// Convenience constructors
impl GalateaError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        GalateaError::Store(StoreError::NotFound { kind, id: id.into() })
    }

    pub fn already_exists(kind: &'static str, id: impl Into<String>) -> Self {
        GalateaError::Store(StoreError::AlreadyExists { kind, id: id.into() })
    }

    pub fn in_use(kind: &'static str, id: impl Into<String>, by: impl Into<String>) -> Self {
        GalateaError::Store(StoreError::InUse {
            kind,
            id: id.into(),
            by: by.into(),
        })
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        GalateaError::InvalidInput(msg.into())
    }
}
