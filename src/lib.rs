mod error;

pub mod config;
pub mod handlers;
pub mod lab;
pub mod microsvc;
pub mod storage;
pub mod telemetry;
pub mod wizard;

#[cfg(feature = "http")]
pub mod server;

pub use config::{ConfigError, LabConfig};
pub use error::LabError;
pub use lab::{LabCollections, LabOperations, LabStats, SharedClock};
pub use storage::{
    Collection, ConfiguredStore, FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore,
    PersistentStore, StorageError,
};
pub use wizard::{FormKind, LocalWizardStore, WizardApi, WizardError};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
