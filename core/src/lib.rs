pub mod config;
pub mod engine;
pub mod index;
pub mod tokenizer;

pub use config::{FieldWeights, SearchConfig};
pub use engine::RepositorySearchEngine;
pub use index::{DocId, Field, IndexStats, Repository, SearchHit, SearchOptions};
