//! Doxygen and theme acquisition.

use crate::config::{DocsConfig, Platform, THEME_DIR_NAME};
use crate::error::DocsError;
use crate::Result;
use flate2::read::GzDecoder;
use ledci_core::{run_command, CommandSpec};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Install Doxygen for `config.platform` and return the executable path.
pub async fn install_doxygen(config: &DocsConfig) -> Result<PathBuf> {
    info!(version = %config.doxygen_version, platform = ?config.platform, "Installing Doxygen");
    match config.platform {
        Platform::Windows => install_doxygen_windows(config).await,
        Platform::Unix => install_doxygen_unix(config).await,
    }
}

/// Zip install: extract, then search the tree for `doxygen.exe`.
async fn install_doxygen_windows(config: &DocsConfig) -> Result<PathBuf> {
    let zip_path = config.tool_dir.join("doxygen.zip");
    let extract_dir = config
        .tool_dir
        .join(format!("doxygen-{}", config.doxygen_version));

    download(&config.windows_archive_url(), &zip_path).await?;
    extract_zip(zip_path, extract_dir.clone()).await?;

    let bin = find_file(&extract_dir, "doxygen.exe")?;
    info!(path = %bin.display(), "Doxygen installed");
    Ok(bin)
}

/// Tarball install: the binary path follows from the archive layout.
async fn install_doxygen_unix(config: &DocsConfig) -> Result<PathBuf> {
    let archive = config.tool_dir.join(config.unix_archive_name());

    download(&config.unix_archive_url(), &archive).await?;
    extract_tarball(archive, config.tool_dir.clone()).await?;

    Ok(unix_doxygen_bin(config))
}

/// `<tool_dir>/doxygen-<version>/bin/doxygen`; not checked for existence.
pub fn unix_doxygen_bin(config: &DocsConfig) -> PathBuf {
    config
        .tool_dir
        .join(format!("doxygen-{}", config.doxygen_version))
        .join("bin")
        .join("doxygen")
}

/// Fetch `url` into `dest`. Non-2xx responses are errors.
pub async fn download(url: &str, dest: &Path) -> Result<()> {
    info!(url = %url, dest = %dest.display(), "Downloading");
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = reqwest::get(url).await?.error_for_status()?.bytes().await?;
    tokio::fs::write(dest, &bytes).await?;
    debug!(bytes = bytes.len(), "Download complete");
    Ok(())
}

/// Unpack a zip archive into `dest`.
pub async fn extract_zip(archive: PathBuf, dest: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&dest)?;
        let mut zip = zip::ZipArchive::new(File::open(&archive)?)?;
        zip.extract(&dest)?;
        Ok(())
    })
    .await?
}

/// Unpack a `.tar.gz` archive into `dest`.
pub async fn extract_tarball(archive: PathBuf, dest: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&dest)?;
        let mut tar = tar::Archive::new(GzDecoder::new(File::open(&archive)?));
        tar.unpack(&dest)?;
        Ok(())
    })
    .await?
}

/// First file named `name` anywhere under `root`.
pub fn find_file(root: &Path, name: &str) -> Result<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path())
        .ok_or_else(|| DocsError::NotFound {
            what: name.to_string(),
            root: root.to_path_buf(),
        })
}

/// Fresh shallow clone of the doxygen-awesome-css theme into the docs dir.
pub async fn install_theme(config: &DocsConfig) -> Result<PathBuf> {
    info!(version = %config.theme_version, "Installing Doxygen Awesome theme");
    let theme_dir = config.theme_dir();
    if tokio::fs::try_exists(&theme_dir).await? {
        debug!(path = %theme_dir.display(), "Removing previous theme checkout");
        tokio::fs::remove_dir_all(&theme_dir).await?;
    }

    let branch = format!("v{}", config.theme_version);
    let spec = CommandSpec::new(
        "git",
        [
            "clone",
            "--depth",
            "1",
            "-b",
            branch.as_str(),
            config.theme_repo.as_str(),
            THEME_DIR_NAME,
        ],
    )
    .current_dir(&config.docs_dir);
    run_command(&spec).await?;

    Ok(theme_dir)
}
