use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `bytes` through a sibling temp file and a rename, so
/// readers see either the old or the new content. The temp file is removed
/// when any step fails.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = parent.join(format!(
        ".{}.tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("chunkflow"),
        std::process::id()
    ));

    let mut file =
        File::create(&tmp).with_context(|| format!("create tmp {}", tmp.display()))?;
    let result = replace_with(&mut file, &tmp, path, bytes);
    drop(file);
    if result.is_err() {
        if let Err(err) = std::fs::remove_file(&tmp) {
            log::debug!("Failed to remove {}: {err}", tmp.display());
        }
    }
    result
}

fn replace_with(file: &mut File, tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    file.write_all(bytes)
        .with_context(|| format!("write tmp {}", tmp.display()))?;
    file.sync_all()
        .with_context(|| format!("sync tmp {}", tmp.display()))?;

    if let Ok(meta) = std::fs::metadata(path) {
        // Keep the original mode (e.g. executable scripts)
        if let Err(err) = std::fs::set_permissions(tmp, meta.permissions()) {
            log::debug!("Failed to copy permissions onto {}: {err}", tmp.display());
        }
    }

    std::fs::rename(tmp, path)
        .with_context(|| format!("rename tmp {} -> {}", tmp.display(), path.display()))
}
