//! `ish`, a small interactive shell.
//!
//! A line is split on `|` into stages, each stage on whitespace into words.
//! The first `<`, `>` or `>>` of a stage redirects it to a file, neighbouring
//! stages are joined by pipes, and every stage runs as its own child process.
//! A trailing `&` leaves the last stage running in the background.

pub mod builtin;
pub mod config;
pub mod error;
pub mod eval;
pub mod global;
pub mod input;
pub mod job;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod redirect;
pub mod tokenizer;
pub mod types;

pub use error::{Result, ShellError};
