//! quran-hybrid - Hybrid Quran Translation Workflow
//!
//! Fetches chapter text and several human translations from the quran.com
//! API and asks a local ollama model for one hybrid translation per verse.

pub mod cli;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod types;
pub mod content;
pub mod assemble;
pub mod synthesis;
pub mod view;
pub mod workflow;

#[cfg(test)]
mod test_support;
