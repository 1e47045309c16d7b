//! # Chunkflow Imports
//!
//! Computes the edits that make a snippet's required imports available in a
//! JavaScript or TypeScript file.
//!
//! ## Architecture
//!
//! ```text
//! file text + [RequiredImport]
//!     │
//!     ├──> Dialect (from extension / language id)
//!     │
//!     ├──> Tree-sitter parse → top-level import declarations
//!     │
//!     ├──> Per package (requests coalesced):
//!     │    ├─> not imported      → insert below the last import
//!     │    ├─> already satisfied → nothing
//!     │    ├─> missing bindings  → replace the declaration
//!     │    └─> kind conflict     → refuse, report ImportConflict
//!     │
//!     └──> Reconciliation { EditSet (fingerprinted), conflicts }
//! ```
//!
//! The reconciler never writes files. [`EditSet::apply`] applies all edits or
//! none, and refuses a text that changed since the edits were computed.
//!
//! ## Example
//!
//! ```rust
//! use chunkflow_imports::{Reconciler, ReconcilerConfig, SourceDialect};
//! use chunkflow_protocol::RequiredImport;
//!
//! let reconciler = Reconciler::new(SourceDialect::TypeScript, ReconcilerConfig::default());
//! let text = "import { Button } from 'ui';\n";
//! let result = reconciler
//!     .reconcile(text, &[RequiredImport::named("ui", ["Icon"])])
//!     .unwrap();
//!
//! assert_eq!(
//!     result.edits.apply(text).unwrap(),
//!     "import { Button, Icon } from 'ui';\n"
//! );
//! ```

mod config;
mod dialect;
mod edits;
mod error;
mod extract;
mod reconciler;
mod render;

pub use config::{QuoteStyle, ReconcilerConfig};
pub use dialect::SourceDialect;
pub use edits::{fingerprint, EditSet, TextEdit};
pub use error::{ImportError, Result};
pub use extract::{ExistingImport, ImportExtractor, ImportedName};
pub use reconciler::{ImportConflict, Reconciler, Reconciliation};
