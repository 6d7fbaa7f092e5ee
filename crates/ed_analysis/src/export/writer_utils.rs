use std::fs::{self, File};
use std::path::Path;

pub(crate) fn ensure_not_empty<T>(items: &[T], what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if items.is_empty() {
        return Err(format!("no {what} to export").into());
    }
    Ok(())
}

/// Create (or truncate) `path`, creating missing parent directories first.
pub(crate) fn create_output_file(
    path: impl AsRef<Path>,
) -> Result<File, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
