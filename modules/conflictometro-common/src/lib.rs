pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use config::Config;
pub use error::ConflictometroError;
pub use normalize::{identity_key, normalize, normalize_opt};
pub use types::*;
