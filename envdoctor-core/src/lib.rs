//! envdoctor-core: reconcile `.env` declarations with environment variable
//! usage in JavaScript and TypeScript projects.
//!
//! A scan walks a project tree once, parses every source file with
//! tree-sitter, collects the environment keys the code references, reads
//! every `.env*` file, and reports the differences:
//!
//! - **missing**: used in code, declared in no `.env` file
//! - **unused**: declared in a `.env` file, never used in code
//!
//! # Recognised access patterns
//!
//! - `process.env.KEY`, `process.env["KEY"]`
//! - `import.meta.env.KEY`, `import.meta.env["KEY"]`
//! - `import { KEY } from "$env/static/private"` (SvelteKit) and
//!   `import { KEY } from "astro:env/server"` (Astro)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use envdoctor_core::prelude::*;
//!
//! let report = EnvDoctor::new("/path/to/project").analyze()?;
//!
//! for key in &report.missing {
//!     println!("Missing key: {}", key);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`scan`]: Project walk and file classification
//! - [`parse`]: tree-sitter parsing with dialect fallback
//! - [`extract`]: Environment key extraction from syntax trees
//! - [`dotenv`]: `.env` file parsing
//! - [`reconcile`]: Missing/unused set differences
//! - [`builder`]: Fluent scan API
//! - [`report`]: Scan report and rendering
//! - [`error`]: Typed error handling

pub mod builder;
pub mod config;
pub mod dotenv;
pub mod error;
pub mod extract;
pub mod keys;
pub mod logging;
pub mod parse;
pub mod prelude;
pub mod reconcile;
pub mod report;
pub mod scan;

// Error types
pub use error::{EnvDoctorError, EnvDoctorResult, IoResultExt};

// Builder API
pub use builder::EnvDoctor;

// Configuration
pub use config::{load_config, EnvDoctorConfig, OutputConfig, OutputFormat, CONFIG_FILE};

// Declaration files
pub use dotenv::{parse_dotenv, read_declaration_file, DeclarationFormat, Declarations, DotenvFormat};

// Extraction
pub use extract::{collect_env_keys, extract_env_keys, ENV_MODULE_PREFIXES};
pub use keys::{is_ignored_key, KeySet};
pub use parse::{Dialect, SourceParser};

// Logging
pub use logging::{init_structured_logging, LogFormat};

// Reconciliation and reporting
pub use reconcile::{reconcile, Reconciliation};
pub use report::{print_json, print_plain, render_json, render_plain, ScanReport};

// File scanning
pub use scan::{
    gather_project_files, is_declaration_file, is_source_file, ProjectFiles, SkipKind,
    SkippedFile, DECLARATION_PREFIX, EXCLUDED_NAMES, SOURCE_EXTENSIONS,
};
