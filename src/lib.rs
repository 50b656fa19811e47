//! Podcaster client library
//!
//! A time-boxed response cache over a shared key/value store, a fetcher that
//! falls back through public CORS proxies, and the podcast directory built on
//! the two.

pub mod cache;
pub mod cli;
pub mod config;
pub mod directory;
pub mod fetcher;
pub mod logging;
