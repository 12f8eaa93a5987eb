pub mod abi;
pub mod locator;
pub mod metadata;

pub use abi::{Address, TokenId};
pub use metadata::Metadata;
