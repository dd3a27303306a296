use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR: &str = "BiometricPhoto";

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model {0} not found and no download URL configured")]
    NotFound(String),
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where a model file may come from.
#[derive(Clone, Debug, Default)]
pub struct ModelSource<'a> {
    /// Explicit path supplied by the caller; wins when it exists.
    pub explicit: Option<&'a Path>,
    pub bundled_dir: Option<&'a Path>,
    pub url: Option<&'a str>,
}

/// Resolve a model file by name.
///
/// Resolution order:
/// 1. Explicit path
/// 2. User cache directory (platform-specific)
/// 3. Bundled directory
/// 4. Download from URL into the cache
pub fn resolve(
    name: &str,
    source: &ModelSource<'_>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = source.explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        log::warn!("Model path {} does not exist, searching defaults", path.display());
    }

    let cache_dir = model_cache_dir()?;
    if let Some(found) = find_existing(name, &[Some(cache_dir.as_path()), source.bundled_dir]) {
        return Ok(found);
    }

    let url = source
        .url
        .ok_or_else(|| ModelResolveError::NotFound(name.to_string()))?;
    fs::create_dir_all(&cache_dir).map_err(ModelResolveError::CacheDir)?;
    let cached_path = cache_dir.join(name);
    log::info!("Downloading {name} from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

fn find_existing(name: &str, dirs: &[Option<&Path>]) -> Option<PathBuf> {
    dirs.iter()
        .flatten()
        .map(|dir| dir.join(name))
        .find(|path| path.exists())
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/BiometricPhoto/models/`
/// - Linux: `$XDG_CACHE_HOME/BiometricPhoto/models/` or `~/.cache/BiometricPhoto/models/`
/// - Windows: `%LOCALAPPDATA%/BiometricPhoto/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");

    let result = download_inner(url, dest, &temp_path, progress);

    // Clean up .part file on any error
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(temp_path).map_err(write_err(temp_path))?;

    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(write_err(temp_path))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err(temp_path))?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_err(dest))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("custom.onnx");
        fs::write(&model, b"model").unwrap();

        let source = ModelSource {
            explicit: Some(model.as_path()),
            ..Default::default()
        };
        let resolved = resolve("whatever.onnx", &source, None).unwrap();
        assert_eq!(resolved, model);
    }

    #[test]
    fn test_bundled_dir_is_searched() {
        let tmp = TempDir::new().unwrap();
        let name = "biometric_photo_bundled_test_model.onnx";
        fs::write(tmp.path().join(name), b"bundled").unwrap();

        let source = ModelSource {
            bundled_dir: Some(tmp.path()),
            ..Default::default()
        };
        let resolved = resolve(name, &source, None).unwrap();
        assert_eq!(fs::read(resolved).unwrap(), b"bundled");
    }

    #[test]
    fn test_missing_model_without_url_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.onnx");
        let source = ModelSource {
            explicit: Some(missing.as_path()),
            bundled_dir: Some(tmp.path()),
            url: None,
        };
        let result = resolve("biometric_photo_definitely_missing.onnx", &source, None);
        assert!(matches!(result, Err(ModelResolveError::NotFound(_))));
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR));
        assert!(path.to_string_lossy().contains("models"));
    }

    #[test]
    fn test_download_atomic_no_partial_on_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
