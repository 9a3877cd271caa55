//! CLI command implementations

pub mod asm;
pub mod cmp;
pub mod completions;
pub mod init;
pub mod quote;
pub mod reset;
