// src/upload.rs

use anyhow::{anyhow, Context, Result};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tokio::task;
use tracing::info;

use crate::dataset::{self, SchemaVariant};
use crate::telegram::BotClient;

/// Download the uploaded document `file_id` and make it the dataset at
/// `dest`. The upload must load under `variant`, otherwise `dest` is left
/// untouched. Returns the number of bytes written.
pub async fn replace_dataset(
    client: &BotClient,
    file_id: &str,
    dest: impl AsRef<Path>,
    variant: &SchemaVariant,
) -> Result<usize> {
    let dest = dest.as_ref();
    let file = client.get_file(file_id).await?;
    let file_path = file
        .file_path
        .ok_or_else(|| anyhow!("getFile returned no path for {}", file_id))?;
    let bytes = client.download_file(&file_path).await?;
    let size = bytes.len();
    let variant = variant.clone();
    write_atomically(dest, bytes, move |tmp| {
        let table = dataset::load(tmp, &variant)?;
        info!(rows = table.len(), "upload is a readable dataset");
        Ok(())
    })
    .await?;
    info!(path = %dest.display(), size, "dataset replaced");
    Ok(size)
}

/// Write `bytes` next to `dest`, run `check` on the written copy and only then
/// rename over `dest`, so a concurrent loader sees either the old file or the
/// new one. A failed check drops the copy.
pub async fn write_atomically<F>(dest: impl AsRef<Path>, bytes: Vec<u8>, check: F) -> Result<()>
where
    F: FnOnce(&Path) -> crate::error::Result<()> + Send + 'static,
{
    let dest: PathBuf = dest.as_ref().to_path_buf();
    task::spawn_blocking(move || {
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(&bytes).context("writing dataset")?;
        tmp.as_file().sync_all().context("syncing dataset")?;
        check(tmp.path()).context("rejecting upload")?;
        tmp.persist(&dest)
            .map_err(|e| anyhow!("replacing {}: {}", dest.display(), e.error))?;
        Ok(())
    })
    .await?
}
