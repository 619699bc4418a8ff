//! Vocabulary loading from disk and the network
//!
//! The base vocabulary is a JSON-LD file or an http(s) URL. Extensions
//! live in one directory, each either a folder holding an
//! `ro-crate-metadata.json` or a zip archive of such a folder.

use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;
use zip::ZipArchive;

use crate::build::VocabularyLoader;
use crate::collect::VocabularyDocument;
use crate::error::ProfileError;
use crate::vocab::METADATA_DESCRIPTOR_ID;

/// Where the base vocabulary comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseSource {
    File(PathBuf),
    Url(Url),
}

impl BaseSource {
    /// Treat http(s) URLs as remote, anything else as a local path
    pub fn parse(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => BaseSource::Url(url),
            _ => BaseSource::File(PathBuf::from(source)),
        }
    }
}

impl std::fmt::Display for BaseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseSource::File(path) => write!(f, "{}", path.display()),
            BaseSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Loads the base vocabulary and extensions from the filesystem
#[derive(Debug, Clone)]
pub struct FilesystemLoader {
    base: BaseSource,
    extensions_dir: Option<PathBuf>,
}

impl FilesystemLoader {
    pub fn new(base: BaseSource, extensions_dir: Option<PathBuf>) -> Self {
        Self {
            base,
            extensions_dir,
        }
    }

    fn extension_path(&self, name: &str) -> Result<PathBuf, ProfileError> {
        match &self.extensions_dir {
            Some(dir) => Ok(dir.join(name)),
            None => Err(ProfileError::LoadError {
                path: name.to_string(),
                reason: "no extensions directory configured".to_string(),
            }),
        }
    }
}

impl VocabularyLoader for FilesystemLoader {
    fn load_base(&self) -> Result<VocabularyDocument, ProfileError> {
        let content = match &self.base {
            BaseSource::File(path) => read_file(path)?,
            BaseSource::Url(url) => fetch_url(url.as_str())?,
        };
        VocabularyDocument::parse(&content, self.base.to_string())
    }

    fn extension_names(&self) -> Result<Vec<String>, ProfileError> {
        let Some(dir) = &self.extensions_dir else {
            return Ok(vec![]);
        };
        if !dir.is_dir() {
            info!(dir = %dir.display(), "no extensions directory, building from the base vocabulary only");
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            if path.is_dir() || is_zip(&path) {
                names.push(name);
            } else {
                debug!(entry = %path.display(), "ignoring non-extension entry");
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_extension(&self, name: &str) -> Result<VocabularyDocument, ProfileError> {
        let path = self.extension_path(name)?;
        let content = if path.is_dir() {
            read_file(&find_metadata_in_directory(&path)?)?
        } else if is_zip(&path) {
            load_metadata_from_zip(&path)?
        } else {
            return Err(ProfileError::LoadError {
                path: path.display().to_string(),
                reason: format!("Can't load {}. Does it exist?", METADATA_DESCRIPTOR_ID),
            });
        };
        VocabularyDocument::parse(&content, name)
    }
}

fn is_zip(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("zip"))
            .unwrap_or(false)
}

fn read_file(path: &Path) -> Result<String, ProfileError> {
    if !path.is_file() {
        return Err(ProfileError::InvalidPath(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| ProfileError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Find ro-crate-metadata.json (with optional prefix) in a directory
pub fn find_metadata_in_directory(path: &Path) -> Result<PathBuf, ProfileError> {
    let standard = path.join(METADATA_DESCRIPTOR_ID);
    if standard.is_file() {
        return Ok(standard);
    }

    if let Ok(entries) = fs::read_dir(path) {
        let suffix = format!("-{}", METADATA_DESCRIPTOR_ID);
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(&suffix) {
                    return Ok(entry.path());
                }
            }
        }
    }

    Err(ProfileError::LoadError {
        path: path.display().to_string(),
        reason: format!("No {} found", METADATA_DESCRIPTOR_ID),
    })
}

/// Read the root metadata file out of a zip archive
pub fn load_metadata_from_zip(path: &Path) -> Result<String, ProfileError> {
    let file = File::open(path).map_err(|e| ProfileError::LoadError {
        path: path.display().to_string(),
        reason: format!("Failed to open zip file: {}", e),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| ProfileError::LoadError {
        path: path.display().to_string(),
        reason: format!("Failed to read zip archive: {}", e),
    })?;

    let entry_name = find_root_metadata_in_zip(&mut archive).ok_or_else(|| {
        ProfileError::LoadError {
            path: path.display().to_string(),
            reason: format!("No root {} found in archive", METADATA_DESCRIPTOR_ID),
        }
    })?;

    let mut entry = archive
        .by_name(&entry_name)
        .map_err(|e| ProfileError::LoadError {
            path: path.display().to_string(),
            reason: format!("Failed to extract {}: {}", entry_name, e),
        })?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

/// Name of the root metadata entry
///
/// It sits at the archive root, or directly inside the single top-level
/// folder when the archive was made by zipping a folder.
fn find_root_metadata_in_zip<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let entries: Vec<String> = archive.file_names().map(String::from).collect();

    if let Some(root) = entries
        .iter()
        .find(|e| !e.contains('/') && e.ends_with(METADATA_DESCRIPTOR_ID))
    {
        return Some(root.clone());
    }

    let mut top_level: Vec<&str> = entries
        .iter()
        .filter_map(|e| e.split('/').next())
        .filter(|s| !s.is_empty())
        .collect();
    top_level.sort();
    top_level.dedup();

    match top_level.as_slice() {
        [prefix] => {
            let expected_root = format!("{}/", prefix);
            entries
                .iter()
                .find(|e| {
                    e.strip_prefix(&expected_root)
                        .map(|rest| !rest.contains('/') && rest.ends_with(METADATA_DESCRIPTOR_ID))
                        .unwrap_or(false)
                })
                .cloned()
        }
        _ => None,
    }
}

/// Simple URL fetch
fn fetch_url(url: &str) -> Result<String, ProfileError> {
    info!(url, "fetching base vocabulary");
    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .map_err(|e| ProfileError::LoadError {
            path: url.to_string(),
            reason: format!("HTTP request failed: {}", e),
        })?
        .text()
        .map_err(|e| ProfileError::LoadError {
            path: url.to_string(),
            reason: format!("Failed to read response: {}", e),
        })
}
