pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;

pub use error::{Result, ScaffoldError};
