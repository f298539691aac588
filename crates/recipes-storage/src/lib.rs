pub mod error;
pub mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::RecipeStore;
