//! Core domain + application logic for the template remover bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the messaging port
//! implemented in the adapter crate.

pub mod cleaner;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod security;
pub mod service;
pub mod templates;
pub mod utils;

pub use errors::{Error, Result};
