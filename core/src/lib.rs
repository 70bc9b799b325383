//! TrailMap core: typed workout records (running & cycling), an ordered
//! in-memory store, a blob-store persistence round-trip, and the interaction
//! layer gluing them to an injected map widget and list view.

pub mod controller;
pub mod errors;
pub mod models;
pub mod storage;
pub mod store;

pub use controller::{FormInput, InteractionController, MapService, WorkoutView};
pub use errors::{ControllerError, StorageError, ValidationError};
pub use models::{Coordinates, Cycling, Running, Workout, WorkoutKind};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore, PersistenceBridge, STORAGE_KEY};
pub use store::WorkoutStore;
