//! Filesystem adapter for NovaForge.
//!
//! Implements the `FileSystem` trait from `novaforge-core` on top of
//! `tokio::fs`. File writes go to a uniquely named temp file in the target
//! directory and are renamed into place, so a concurrent reader sees either
//! the previous content or the new content, never a partial file.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use novaforge_core::service::fs::FileSystem;

/// Local filesystem implementation of the `FileSystem` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

const TEMP_MARKER: &str = ".tmp-";

/// Temp path next to `path`: `.{name}.tmp-{uuid}`.
fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "path has no file name"))?;
    let tmp_name = format!(".{}{TEMP_MARKER}{}", name.to_string_lossy(), Uuid::now_v7().simple());
    Ok(path.with_file_name(tmp_name))
}

/// An in-flight write from [`temp_path_for`].
fn is_temp_file(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') && name.contains(TEMP_MARKER)
}

async fn write_atomic(tmp: &Path, final_path: &Path, data: &[u8]) -> io::Result<()> {
    {
        let mut f = tokio::fs::File::create(tmp).await?;
        f.write_all(data).await?;
        f.sync_all().await?;
    }
    tokio::fs::rename(tmp, final_path).await
}

fn clear_dir_blocking(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

fn copy_dir_blocking(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        if is_temp_file(&entry.file_name()) {
            continue;
        }
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_blocking(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

async fn run_blocking<F>(f: F) -> io::Result<()>
where
    F: FnOnce() -> io::Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| io::Error::other(format!("blocking task failed: {e}")))?
}

impl FileSystem for LocalFileSystem {
    async fn write_file(&self, path: &Path, content: &str) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = temp_path_for(path)?;
        let result = write_atomic(&tmp, path, content.as_bytes()).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }

    async fn read_file(&self, path: &Path) -> Result<String, io::Error> {
        tokio::fs::read_to_string(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), io::Error> {
        tokio::fs::create_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn list_dirs(&self, path: &Path) -> Result<Vec<String>, io::Error> {
        let mut entries = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    async fn clear_dir(&self, path: &Path) -> Result<(), io::Error> {
        let dir = path.to_path_buf();
        run_blocking(move || clear_dir_blocking(&dir)).await
    }

    async fn copy_dir_contents(&self, src: &Path, dst: &Path) -> Result<(), io::Error> {
        let (src, dst) = (src.to_path_buf(), dst.to_path_buf());
        run_blocking(move || copy_dir_blocking(&src, &dst)).await
    }
}
