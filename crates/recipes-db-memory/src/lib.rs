pub mod storage;

pub use storage::InMemoryRecipeStore;
