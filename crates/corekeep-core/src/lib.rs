//! corekeep-core: Core library for corekeep
//!
//! This crate implements the userspace side of a kernel crash-dump pipeline:
//! persist the dump stream a crashing process leaves behind, keep the dump
//! directory under a bounded file count, and optionally hand a notice to an
//! external command.
//!
//! # Architecture
//!
//! ```text
//! stdin (kernel) → Ingest Writer → dump file
//!                        ↓
//!                Retention Engine → bounded dump directory
//!                        ↓
//!                    Notifier → external command
//! ```
//!
//! # Modules
//!
//! - `naming`: dump file name generation
//! - `ingest`: dump stream persistence
//! - `retention`: bounded retention engine (scan, order, evict)
//! - `notify`: crash notices over an external command
//! - `config`: per-invocation configuration
//! - `handler`: end-to-end pipeline tying the pieces together
//! - `error`: crate-wide error type
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handler;
pub mod ingest;
pub mod naming;
pub mod notify;
pub mod retention;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
