pub mod core;
pub mod source;

pub use self::core::{Language, QuoteBook};
pub use self::source::{PoolSource, WordSource};
