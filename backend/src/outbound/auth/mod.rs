//! Credential lookup adapters.

mod token_directory;

pub use token_directory::TokenDirectory;
