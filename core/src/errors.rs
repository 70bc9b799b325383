use thiserror::Error;

/// User-input validation failures. Surfaced to the user verbatim and the
/// triggering action is aborted without mutating any state.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} has to be a number")]
    NotANumber { field: &'static str },

    #[error("{field} has to be a positive number")]
    NotPositive { field: &'static str },

    #[error("{field} can not be negative")]
    Negative { field: &'static str },

    #[error("unknown workout type '{0}'")]
    UnknownType(String),
}

/// Failures against the blob store or the serialized payload.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored blob exists but does not parse as a workout list.
    /// `path` is the JSON path where deserialization gave up.
    #[error("stored workout data is corrupt at {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize workouts: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("blob store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors a form submission can report back to the host.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Submit arrived while the form was hidden, i.e. no map click has
    /// captured coordinates yet.
    #[error("no map location selected")]
    NoPendingLocation,
}
