//! Structural inference over a sample of rows

mod headers;
mod types;

pub use headers::{headers_guess, headers_guess_with, HeaderGuessConfig};
pub use types::{type_guess, type_guess_with, TypeGuessConfig};
