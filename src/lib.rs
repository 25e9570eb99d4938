pub mod collection;
pub mod error;
pub mod id;
pub mod objects;
pub mod receipts;
pub mod registry;
pub mod snapshot;
pub mod views;

// Re-export the main types for convenience
pub use collection::Collection;
pub use error::RegistryError;
pub use id::{AccountId, IdAllocator, TokenId};
pub use objects::{ItemMetadata, Token};
pub use receipts::{Operation, OperationReceipt};
pub use registry::Registry;
pub use views::{DisplayView, MetadataView, Thumbnail};
