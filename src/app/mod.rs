// Application layer - Use case interactors and wiring

pub mod container;
pub mod metadata_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use metadata_interactor::{ExtractionSettings, MetadataInteractor};
