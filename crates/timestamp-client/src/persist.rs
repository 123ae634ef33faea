//! Artifact persistence.
//!
//! Both artifacts are staged as hidden temporary siblings and renamed into
//! place only after both staged writes succeed, so a failed run never leaves
//! a fresh `data.txt` next to a stale `data.sig` (or the reverse).

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// File name of the canonical payload artifact.
pub const DATA_FILE_NAME: &str = "data.txt";

/// File name of the raw signature artifact.
pub const SIGNATURE_FILE_NAME: &str = "data.sig";

/// Mode for both artifacts: owner read/write, group/other read.
#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;

/// Paths of the artifacts written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifacts {
    pub data_path: PathBuf,
    pub signature_path: PathBuf,
}

/// Writes the data/signature artifact pair into a directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum Artifact {
    Data,
    Signature,
}

impl Artifact {
    fn error(self, path: &Path, message: String) -> ClientError {
        match self {
            Self::Data => ClientError::DataWrite {
                path: path.to_path_buf(),
                message,
            },
            Self::Signature => ClientError::SignatureWrite {
                path: path.to_path_buf(),
                message,
            },
        }
    }
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE_NAME)
    }

    pub fn signature_path(&self) -> PathBuf {
        self.dir.join(SIGNATURE_FILE_NAME)
    }

    /// Persist canonical payload bytes and decoded signature bytes.
    ///
    /// Existing artifacts are overwritten.
    pub async fn persist(
        &self,
        canonical_bytes: &[u8],
        signature_bytes: &[u8],
    ) -> ClientResult<PersistedArtifacts> {
        let data_path = self.data_path();
        let signature_path = self.signature_path();
        let data_tmp = staging_path(&data_path);
        let signature_tmp = staging_path(&signature_path);

        write_staged(&data_tmp, canonical_bytes)
            .await
            .map_err(|e| Artifact::Data.error(&data_path, e))?;

        if let Err(e) = write_staged(&signature_tmp, signature_bytes).await {
            let _ = fs::remove_file(&data_tmp).await;
            return Err(Artifact::Signature.error(&signature_path, e));
        }

        if let Err(e) = fs::rename(&data_tmp, &data_path).await {
            let _ = fs::remove_file(&data_tmp).await;
            let _ = fs::remove_file(&signature_tmp).await;
            return Err(Artifact::Data.error(
                &data_path,
                format!("failed to rename temp file: {}", e),
            ));
        }

        fs::rename(&signature_tmp, &signature_path)
            .await
            .map_err(|e| {
                Artifact::Signature.error(
                    &signature_path,
                    format!("failed to rename temp file: {}", e),
                )
            })?;

        debug!(
            data = %data_path.display(),
            signature = %signature_path.display(),
            data_len = canonical_bytes.len(),
            signature_len = signature_bytes.len(),
            "persisted artifacts"
        );

        Ok(PersistedArtifacts {
            data_path,
            signature_path,
        })
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

async fn write_staged(path: &Path, content: &[u8]) -> Result<(), String> {
    fs::write(path, content)
        .await
        .map_err(|e| format!("failed to write temp file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(ARTIFACT_MODE))
            .await
            .map_err(|e| format!("failed to set permissions: {}", e))?;
    }

    Ok(())
}
