//! Startup: make sure the model directory exists, find the artifact pair in it
//! and load it.

use std::fs::File;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{ArtifactConfig, ArtifactLayout};
use crate::model::NewsClassifier;
use crate::verifier::NewsVerifier;
use crate::{Error, Result};

/// Where the two artifacts were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
}

/// Downloads and unpacks the archive if the model directory is absent.
/// Returns whether a download happened. There are no retries.
pub async fn ensure_model_dir(config: &ArtifactConfig) -> Result<bool> {
    let dir = &config.model_dir;
    if dir.exists() {
        return Ok(false);
    }
    let Some(url) = config.archive_url.as_deref() else {
        return Err(Error::NoArchiveSource(dir.clone()));
    };

    let archive = archive_path(dir);
    tracing::info!(%url, archive = %archive.display(), "⬇️ Downloading model archive");
    let bytes = reqwest::get(url).await?.error_for_status()?.bytes().await?;
    tokio::fs::write(&archive, &bytes).await?;

    let extracted = extract(&archive, dir);
    tokio::fs::remove_file(&archive).await?;
    if let Err(e) = extracted {
        // Leave nothing behind that would look like a usable model directory.
        let _ = std::fs::remove_dir_all(dir);
        return Err(e);
    }

    tracing::info!(dir = %dir.display(), bytes = bytes.len(), "✅ Model archive extracted");
    Ok(true)
}

/// `models` -> `models.zip`, next to the directory.
fn archive_path(dir: &Path) -> PathBuf {
    let mut name = dir.file_name().unwrap_or(dir.as_os_str()).to_os_string();
    name.push(".zip");
    dir.with_file_name(name)
}

fn extract(archive: &Path, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut zip = zip::ZipArchive::new(File::open(archive)?)?;
    zip.extract(dir)?;
    Ok(())
}

/// Finds both artifacts under the model directory according to the layout.
pub fn locate_artifacts(config: &ArtifactConfig) -> Result<ArtifactPaths> {
    match config.layout {
        ArtifactLayout::Walk => Ok(ArtifactPaths {
            model: walk_for(&config.model_dir, &config.model_file)?,
            vectorizer: walk_for(&config.model_dir, &config.vectorizer_file)?,
        }),
        ArtifactLayout::Fixed => {
            tracing::warn!("artifacts.layout = \"fixed\" is deprecated; use \"walk\"");
            Ok(ArtifactPaths {
                model: fixed(&config.model_dir, &config.model_file)?,
                vectorizer: fixed(&config.model_dir, &config.vectorizer_file)?,
            })
        }
    }
}

fn fixed(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::ArtifactMissing {
            name: name.to_owned(),
            dir: dir.to_path_buf(),
        })
    }
}

fn walk_for(dir: &Path, name: &str) -> Result<PathBuf> {
    let mut found = None;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() || entry.file_name() != name {
            continue;
        }
        if found.is_some() {
            return Err(Error::AmbiguousArtifact {
                name: name.to_owned(),
                dir: dir.to_path_buf(),
            });
        }
        found = Some(entry.into_path());
    }

    found.ok_or_else(|| Error::ArtifactMissing {
        name: name.to_owned(),
        dir: dir.to_path_buf(),
    })
}

/// Full startup sequence: fetch if needed, locate, load and pair-check.
pub async fn load_verifier(config: &ArtifactConfig) -> Result<NewsVerifier> {
    ensure_model_dir(config).await?;
    let paths = locate_artifacts(config)?;
    let classifier = NewsClassifier::load(&paths.model, &paths.vectorizer)?;
    Ok(NewsVerifier::new(classifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path) -> ArtifactConfig {
        ArtifactConfig {
            model_dir: dir.to_path_buf(),
            ..ArtifactConfig::default()
        }
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn archive_sits_next_to_the_directory() {
        assert_eq!(archive_path(Path::new("models")), PathBuf::from("models.zip"));
        assert_eq!(
            archive_path(Path::new("/srv/data/models")),
            PathBuf::from("/srv/data/models.zip")
        );
    }

    #[test]
    fn walk_finds_nested_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        touch(&dir.path().join("models/inner").join(&cfg.model_file));
        touch(&dir.path().join(&cfg.vectorizer_file));

        let paths = locate_artifacts(&cfg).unwrap();
        assert_eq!(paths.model, dir.path().join("models/inner").join(&cfg.model_file));
        assert_eq!(paths.vectorizer, dir.path().join(&cfg.vectorizer_file));
    }

    #[test]
    fn walk_rejects_duplicates_and_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        touch(&dir.path().join(&cfg.model_file));
        assert!(matches!(
            locate_artifacts(&cfg),
            Err(Error::ArtifactMissing { name, .. }) if name == cfg.vectorizer_file
        ));

        touch(&dir.path().join(&cfg.vectorizer_file));
        touch(&dir.path().join("copy").join(&cfg.model_file));
        assert!(matches!(
            locate_artifacts(&cfg),
            Err(Error::AmbiguousArtifact { name, .. }) if name == cfg.model_file
        ));
    }

    #[test]
    fn fixed_layout_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ArtifactConfig {
            layout: ArtifactLayout::Fixed,
            ..config(dir.path())
        };
        touch(&dir.path().join("nested").join(&cfg.model_file));
        touch(&dir.path().join(&cfg.vectorizer_file));
        assert!(matches!(
            locate_artifacts(&cfg),
            Err(Error::ArtifactMissing { .. })
        ));

        touch(&dir.path().join(&cfg.model_file));
        let paths = locate_artifacts(&cfg).unwrap();
        assert_eq!(paths.model, dir.path().join(&cfg.model_file));
    }

    #[tokio::test]
    async fn existing_directory_needs_no_download() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!ensure_model_dir(&config(dir.path())).await.unwrap());
    }

    #[tokio::test]
    async fn absent_directory_without_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir.path().join("models"));
        assert!(matches!(
            ensure_model_dir(&cfg).await,
            Err(Error::NoArchiveSource(_))
        ));
    }
}
