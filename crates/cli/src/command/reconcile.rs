use super::workspace_root;
use crate::fs_util::write_atomic;
use crate::{GlobalOptions, ReconcileArgs};
use anyhow::{anyhow, bail, Context, Result};
use chunkflow_imports::{ImportError, Reconciler, Reconciliation, SourceDialect};
use chunkflow_protocol::{serialize_json_pretty, RequiredImport};
use chunkflow_snippets::WorkspaceSession;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportsInput {
    Many(Vec<RequiredImport>),
    One(RequiredImport),
}

impl From<ImportsInput> for Vec<RequiredImport> {
    fn from(input: ImportsInput) -> Self {
        match input {
            ImportsInput::Many(many) => many,
            ImportsInput::One(one) => vec![one],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileReport<'a> {
    file: &'a Path,
    dialect: &'static str,
    written: bool,
    #[serde(flatten)]
    reconciliation: &'a Reconciliation,
}

pub(crate) async fn run_reconcile(args: ReconcileArgs, options: &GlobalOptions) -> Result<()> {
    let dialect = match args.language.as_deref() {
        Some(id) => SourceDialect::from_language_id(id)
            .ok_or_else(|| anyhow!("Unsupported language id '{id}'"))?,
        None => SourceDialect::for_path(&args.file)?,
    };

    let required = required_imports(&args, options).await?;
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let reconciler = Reconciler::new(dialect, args.reconciler_config());
    let reconciliation = reconciler.reconcile(&text, &required)?;

    let mut written = false;
    if args.write && !reconciliation.edits.is_empty() {
        apply_to_file(&args.file, &reconciliation).await?;
        written = true;
        log::info!(
            "Applied {} import edits to {}",
            reconciliation.edits.len(),
            args.file.display()
        );
    }

    let report = ReconcileReport {
        file: &args.file,
        dialect: dialect.as_str(),
        written,
        reconciliation: &reconciliation,
    };
    println!("{}", serialize_json_pretty(&report)?);
    Ok(())
}

async fn required_imports(
    args: &ReconcileArgs,
    options: &GlobalOptions,
) -> Result<Vec<RequiredImport>> {
    if let Some(json) = &args.imports {
        let input: ImportsInput =
            serde_json::from_str(json).context("Invalid --imports JSON")?;
        return Ok(input.into());
    }
    if let Some(path) = &args.imports_file {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let input: ImportsInput = serde_json::from_str(&json)
            .with_context(|| format!("Invalid required imports in {}", path.display()))?;
        return Ok(input.into());
    }
    if let Some(label) = &args.snippet {
        return snippet_imports(label, args, options).await;
    }
    bail!("one of --imports, --imports-file or --snippet is required")
}

async fn snippet_imports(
    label: &str,
    args: &ReconcileArgs,
    options: &GlobalOptions,
) -> Result<Vec<RequiredImport>> {
    let start = file_dir(&args.file);
    let root = workspace_root(options, &start, &options.session.workspace).await;
    let session = WorkspaceSession::open(root, options.session.clone()).await;

    let snippet = session
        .find_for_package(args.package.as_deref())
        .await
        .and_then(|found| found.snippets.into_iter().find(|s| s.label == label))
        .ok_or_else(|| anyhow!("No snippet labelled '{label}' in {}", session.root().display()))?;

    log::debug!(
        "Snippet '{label}' from '{}' requires {} imports",
        snippet.package,
        snippet.required_imports.len()
    );
    Ok(snippet.required_imports)
}

async fn apply_to_file(path: &Path, reconciliation: &Reconciliation) -> Result<()> {
    let current = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to re-read {}", path.display()))?;
    let updated = match reconciliation.edits.apply(&current) {
        Ok(updated) => updated,
        Err(err @ ImportError::StaleEdits { .. }) => {
            return Err(err).context(format!(
                "{} changed while reconciling; run again",
                path.display()
            ));
        }
        Err(err) => return Err(err.into()),
    };

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&path, updated.as_bytes()))
        .await
        .context("Write task failed")?
}

fn file_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => super::current_dir(),
    }
}
