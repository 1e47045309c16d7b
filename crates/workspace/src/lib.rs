//! # Chunkflow Workspace
//!
//! Discovers every package of a JavaScript/TypeScript workspace that could
//! publish snippets.
//!
//! ## Architecture
//!
//! ```text
//! <root>/package.json
//!     │
//!     ├──> Member globs
//!     │    ├─> "workspaces": [..]              (array form)
//!     │    ├─> "workspaces": { "packages": [..] } (object form)
//!     │    └─> pnpm-workspace.yaml `packages:` list
//!     │
//!     ├──> No globs → single-package workspace (root only)
//!     │
//!     └──> Glob expansion → <member>/package.json
//!          └─> PackageStore (name → PackageDescriptor, last writer wins)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use chunkflow_workspace::{WorkspaceConfig, WorkspaceResolver};
//! use std::path::Path;
//!
//! # async fn run() {
//! let resolver = WorkspaceResolver::new(WorkspaceConfig::default());
//! let store = resolver.resolve(Path::new("/repo")).await;
//! for pkg in store.iter() {
//!     println!("{} {} at {}", pkg.name(), pkg.version(), pkg.root_path().display());
//! }
//! # }
//! ```

mod config;
mod descriptor;
mod error;
mod globs;
mod pnpm;
mod resolver;
mod root;
mod store;

pub use config::WorkspaceConfig;
pub use descriptor::{read_descriptor, PackageDescriptor, RawDescriptor};
pub use error::{Result, WorkspaceError};
pub use globs::{ExclusionMatcher, WorkspaceGlobs};
pub use pnpm::recognize_packages;
pub use resolver::WorkspaceResolver;
pub use root::locate_workspace_root;
pub use store::PackageStore;
