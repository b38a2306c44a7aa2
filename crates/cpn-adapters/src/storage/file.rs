//! Backend `file://`.
//!
//! Paths absolutos se usan tal cual; relativos cuelgan de `root`. Las
//! escrituras van a un temporal hermano y se renombran, así un lector nunca
//! ve un fichero a medias.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use cpn_core::{Storage, StorageError, Uri};
use log::debug;

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path en disco para `uri`.
    pub fn resolve(&self, uri: &Uri) -> PathBuf {
        let path = Path::new(uri.path());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Storage for FileStorage {
    fn scheme(&self) -> &str {
        "file"
    }

    fn read(&self, uri: &Uri) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(uri);
        fs::read(&path).map_err(|e| match e.kind() {
                           std::io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
                           _ => StorageError::Io(format!("{}: {e}", path.display())),
                       })
    }

    fn write(&self, uri: &Uri, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(uri);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".partial");
        let tmp = path.with_file_name(tmp_name);

        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;
        debug!("file storage wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
