//! `srcmark_core` is the core library for [srcmark](https://github.com/ifiokjr/srcmark). It finds
//! regions of source files delimited by marker comments and rewrites markdown placeholders so an
//! external documentation generator can inline those regions by explicit line range.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source tree
//!   → Comment extractor (per-language comment lexer)
//!   → Resolver (pairs SOURCE_MARKER_BEGIN_x / SOURCE_MARKER_END_x into line ranges)
//!   → MarkerMapping (absolute path → marker name → `lines=a-b`)
//! Markdown tree
//!   → Rewriter (replaces `&label=x` with `&lines=a-b` in placeholder directives)
//!   → Tree builder (mirrors the tree, copies other files, runs the generator)
//! ```
//!
//! ## Modules
//!
//! - [`comments`]: Content type inference and comment extraction.
//! - [`resolver`]: Marker pairing, blank-line trimming, and the [`MarkerMapping`].
//! - [`rewriter`]: Placeholder directive matching and substitution.
//! - [`tree`]: Output tree mirroring and the [`BuildSummary`].
//! - [`generator`]: The external documentation generator seam.
//! - [`config`]: Configuration loading from `srcmark.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use srcmark_core::NoopGenerator;
//! use srcmark_core::SrcmarkConfig;
//! use srcmark_core::SyntaxCommentExtractor;
//! use srcmark_core::run_pipeline;
//! use std::path::Path;
//! use std::path::PathBuf;
//!
//! let config = SrcmarkConfig::default();
//! let summary = run_pipeline(
//! 	Path::new("docs"),
//! 	&[PathBuf::from("src")],
//! 	Path::new("docs_out"),
//! 	&config,
//! 	&SyntaxCommentExtractor,
//! 	&NoopGenerator,
//! )
//! .unwrap();
//! println!("{} markdown file(s) rewritten", summary.replaced.len());
//! ```

pub use comments::*;
pub use config::*;
pub use error::*;
pub use generator::*;
pub use pipeline::*;
pub use resolver::*;
pub use rewriter::*;
pub use tree::*;

pub mod comments;
pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod generator;
mod pipeline;
pub mod resolver;
pub mod rewriter;
pub mod tree;
pub(crate) mod walk;
