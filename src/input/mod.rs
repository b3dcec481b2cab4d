//! Validated console input: pure parsers plus the retry driver around them.

mod console;
pub mod parse;

pub use console::{Console, StdConsole};

#[cfg(test)]
pub(crate) use console::tests::{scripted, transcript, TestConsole};
