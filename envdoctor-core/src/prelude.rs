//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use envdoctor_core::prelude::*;
//! ```

// Scan entry point and result
pub use crate::builder::EnvDoctor;
pub use crate::report::ScanReport;
pub use crate::error::{EnvDoctorError, EnvDoctorResult};

// Building blocks
pub use crate::dotenv::{DeclarationFormat, DotenvFormat};
pub use crate::extract::extract_env_keys;
pub use crate::keys::KeySet;
pub use crate::parse::SourceParser;
pub use crate::reconcile::reconcile;
pub use crate::scan::gather_project_files;

// Configuration
pub use crate::config::{load_config, EnvDoctorConfig};
