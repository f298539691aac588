pub mod error;
pub mod id;
pub mod recipe;
pub mod time;

pub use error::{CoreError, ErrorCategory, Result};
pub use id::{generate_id, validate_id};
pub use recipe::{Recipe, RecipeDraft};
pub use time::now_utc;
