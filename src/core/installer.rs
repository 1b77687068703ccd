use crate::domain::model::{ArchiveKind, Download};
use crate::domain::ports::Workflow;
use crate::utils::error::{Result, ToolkitError};
use flate2::read::GzDecoder;
use reqwest::Client;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tar::Archive;

/// Fetches a release artifact, unpacks it if needed, drops the binary into
/// the bin directory with the executable bit set, and registers that
/// directory on the job PATH.
pub struct Installer<'a> {
    client: Client,
    bin_dir: PathBuf,
    workflow: &'a dyn Workflow,
}

impl<'a> Installer<'a> {
    pub fn new(bin_dir: PathBuf, workflow: &'a dyn Workflow) -> Self {
        Self {
            client: Client::new(),
            bin_dir,
            workflow,
        }
    }

    pub async fn install(&self, download: &Download) -> Result<PathBuf> {
        tracing::info!("Downloading {}", download.url);
        let response = self.client.get(&download.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToolkitError::DownloadError {
                url: download.url.clone(),
                status: status.as_u16(),
            });
        }
        let data = response.bytes().await?.to_vec();
        tracing::debug!("Fetched {} bytes", data.len());

        let binary = match ArchiveKind::from_url(&download.url) {
            ArchiveKind::Plain => data,
            ArchiveKind::TarGz => {
                extract_tarball(data, download.bin_name.clone(), download.url.clone()).await?
            }
            ArchiveKind::Zip => {
                extract_zip(data, download.bin_name.clone(), download.url.clone()).await?
            }
        };

        fs::create_dir_all(&self.bin_dir)?;
        let destination = self.bin_dir.join(&download.bin_name);
        fs::write(&destination, binary)?;
        mark_executable(&destination)?;

        self.workflow.add_path(&self.bin_dir)?;
        tracing::info!("Installed {}", destination.display());
        Ok(destination)
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn blocking_task_error(e: tokio::task::JoinError) -> ToolkitError {
    ToolkitError::IoError(std::io::Error::other(format!(
        "archive extraction task failed: {}",
        e
    )))
}

/// Release tarballs nest the binary under a platform directory
/// (e.g. `linux-amd64/helm`), so the archive is searched for the wanted
/// basename rather than unpacked wholesale.
async fn extract_tarball(data: Vec<u8>, bin_name: String, url: String) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        // A `.tar` without the gzip magic is read as-is.
        let gzipped = data.starts_with(&[0x1f, 0x8b]);
        if gzipped {
            find_tar_entry(Archive::new(GzDecoder::new(Cursor::new(data))), &bin_name, &url)
        } else {
            find_tar_entry(Archive::new(Cursor::new(data)), &bin_name, &url)
        }
    })
    .await
    .map_err(blocking_task_error)?
}

fn find_tar_entry<R: Read>(mut archive: Archive<R>, bin_name: &str, url: &str) -> Result<Vec<u8>> {
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let matches = entry
            .path()?
            .file_name()
            .map(|name| name == std::ffi::OsStr::new(bin_name))
            .unwrap_or(false);
        if matches {
            let mut binary = Vec::new();
            entry.read_to_end(&mut binary)?;
            return Ok(binary);
        }
    }
    Err(ToolkitError::MissingBinaryError {
        url: url.to_string(),
        name: bin_name.to_string(),
    })
}

async fn extract_zip(data: Vec<u8>, bin_name: String, url: String) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if !file.is_file() {
                continue;
            }
            let matches = Path::new(file.name())
                .file_name()
                .map(|name| name == std::ffi::OsStr::new(bin_name.as_str()))
                .unwrap_or(false);
            if matches {
                let mut binary = Vec::new();
                file.read_to_end(&mut binary)?;
                return Ok(binary);
            }
        }
        Err(ToolkitError::MissingBinaryError {
            url,
            name: bin_name,
        })
    })
    .await
    .map_err(blocking_task_error)?
}
