//! # Chunkflow Snippets
//!
//! Finds the snippets published by the packages of a workspace.
//!
//! ## Architecture
//!
//! ```text
//! WorkspaceSession (owned by the caller, resolved once)
//!     │
//!     ├──> PackageStore (chunkflow-workspace)
//!     │
//!     └──> SnippetLoader, per package root, first hit wins:
//!          ├─> .chunkflow.config.json       (JsonFile)
//!          ├─> .chunkflow.config.js         (ScriptModule, read statically)
//!          └─> package.json "snippets"      (DescriptorField)
//! ```
//!
//! Discovery is best effort: missing sources are skipped quietly, malformed
//! ones are logged at `warn` and skipped. Scope filtering is a separate
//! predicate ([`matches_scope`]) applied by whoever presents the snippets.
//!
//! ## Example
//!
//! ```no_run
//! use chunkflow_snippets::{filter_by_scope, SessionConfig, WorkspaceSession};
//!
//! # async fn run() {
//! let session = WorkspaceSession::open("/repo", SessionConfig::default()).await;
//! if let Some(found) = session.find_for_package(None).await {
//!     for snippet in filter_by_scope(found.snippets, "typescriptreact") {
//!         println!("{} ({})", snippet.label, snippet.package);
//!     }
//! }
//! # }
//! ```

mod config;
mod error;
mod loader;
mod scope;
mod script;
mod session;
mod source;

pub use config::{LoaderConfig, SessionConfig};
pub use error::{Result, SnippetError};
pub use loader::SnippetLoader;
pub use scope::{filter_by_scope, matches_scope};
pub use script::{ScriptEvaluator, ScriptExports, StaticScriptEvaluator};
pub use session::WorkspaceSession;
pub use source::SnippetSource;
