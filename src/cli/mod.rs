//! # CLI Module
//!
//! Command-line access to the crawler without writing Rust: views and
//! decorators are described in a chain manifest (see [`crate::spec::Manifest`]).
//!
//! ## Commands
//!
//! ### `build`
//!
//! Merge every path of a manifest and print the resulting document:
//!
//! ```bash
//! decorated-crawler build --manifest petstore.yaml --output openapi.yaml
//! ```
//!
//! Options:
//! - `--manifest <FILE>` - Chain manifest (required)
//! - `--output <FILE>` - Write to a file instead of stdout
//! - `--format <yaml|json>` - Output format (default: yaml)
//! - `--strict` - Fail on malformed documentation instead of skipping it
//!
//! ### `inspect`
//!
//! Show each path's decorator chain, outermost first, and what each layer
//! declares:
//!
//! ```bash
//! decorated-crawler inspect --manifest petstore.yaml
//! ```
//!
//! ## Environment
//!
//! `DCRAWL_DEFAULTS_KEY` and `DCRAWL_STRICT_FRAGMENTS` configure the crawler
//! (see [`crate::config`]); `DCRAWL_LOG_*` and `RUST_LOG` configure logging.

mod commands;


pub use commands::{execute, render_inspection, run_cli, Cli, Commands, OutputFormat};
