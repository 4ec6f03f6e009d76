// src/lib.rs

//! postwatch library
//!
//! Polls a curated link page, detects posts that were not there on the
//! previous check and forwards them to a chat channel.

pub mod commands;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod sink;
pub mod utils;

#[cfg(test)]
mod testing;
