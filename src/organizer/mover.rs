//! Moving one file into its category folder

use crate::FileSystemError;
use std::fs;
use std::io;
use std::path::Path;

/// Moves `source` to `destination`, creating the destination folder if needed
///
/// A plain rename is tried first. When that fails (for example across
/// filesystems) the file is copied and the source removed. If the source
/// cannot be removed the copy is deleted again, so the file ends up in exactly
/// one place.
pub fn move_file(source: &Path, destination: &Path) -> Result<(), FileSystemError> {
    if let Some(folder) = destination.parent() {
        if !folder.exists() {
            fs::create_dir_all(folder).map_err(|source| FileSystemError::CreateDir {
                path: folder.to_path_buf(),
                source,
            })?;
            tracing::debug!("Created folder {}", folder.display());
        }
    }

    let move_error = |e: io::Error| FileSystemError::Move {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    };

    if fs::symlink_metadata(destination).is_ok() {
        return Err(move_error(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        )));
    }

    if let Err(rename_err) = fs::rename(source, destination) {
        tracing::debug!(
            "Rename of {} failed ({}), falling back to copy",
            source.display(),
            rename_err
        );

        fs::copy(source, destination).map_err(move_error)?;
        if let Err(e) = fs::remove_file(source) {
            let _ = fs::remove_file(destination);
            return Err(move_error(e));
        }
    }

    Ok(())
}
