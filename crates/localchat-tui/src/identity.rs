//! Persisted client identity.
//!
//! The client id lives in `~/.localchat/id/id.txt` so the server recognises
//! the same user across runs. Dev mode uses a fresh id every time.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Identity file errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No home directory to store the identity in.
    #[error("no home directory found")]
    NoHome,

    /// Reading or writing the identity file failed.
    #[error("identity file {path:?}: {source}")]
    Io {
        /// Identity file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

/// `~/.localchat/id/id.txt`
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".localchat").join("id").join("id.txt"))
}

/// Load the persisted id, creating it on first run. In dev mode return a
/// throwaway id and touch nothing on disk.
pub fn load_or_create(dev: bool) -> Result<String, IdentityError> {
    if dev {
        return Ok(fresh_id());
    }
    let path = default_path().ok_or(IdentityError::NoHome)?;
    load_or_create_at(&path)
}

/// Load the id stored at `path`, or generate and store one.
///
/// A missing or blank file counts as no identity.
pub fn load_or_create_at(path: &Path) -> Result<String, IdentityError> {
    let io_error = |source| IdentityError::Io { path: path.to_path_buf(), source };

    match fs::read_to_string(path) {
        Ok(contents) => {
            let id = contents.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {},
        Err(e) => return Err(io_error(e)),
    }

    let id = fresh_id();
    if let Some(parent) = path.parent() {
        create_private_dir(parent).map_err(io_error)?;
    }
    write_private(path, &id).map_err(io_error)?;
    tracing::info!("created identity file {}", path.display());
    Ok(id)
}

fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private(path: &Path, id: &str) -> io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file =
        fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)?;
    file.write_all(id.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, id: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(id.as_bytes())
}
