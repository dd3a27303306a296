use std::path::{Path, PathBuf};

use crate::shared::constants::{IMAGE_EXTENSIONS, OUTPUT_PREFIX};
use crate::shared::error::BiometricError;

/// Returns the lowercase extension of `path` if it is an accepted input
/// format.
pub fn accepted_extension(path: &Path) -> Result<String, BiometricError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(BiometricError::UnsupportedFormat(format!(
            "{} (accepted: {})",
            path.display(),
            IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// `<output_dir>/processed_<file name>`; defaults to the input's own
/// directory.
pub fn default_output_path(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf, BiometricError> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BiometricError::InvalidParameter(format!("{} has no file name", input.display())))?;
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(format!("{OUTPUT_PREFIX}{name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.png", "png")]
    #[case("photo.JPG", "jpg")]
    #[case("dir/photo.jpeg", "jpeg")]
    #[case("anim.Gif", "gif")]
    fn test_accepted_extensions(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(accepted_extension(Path::new(path)).unwrap(), expected);
    }

    #[rstest]
    #[case("photo.bmp")]
    #[case("photo.webp")]
    #[case("photo")]
    #[case("png")]
    fn test_rejected_extensions(#[case] path: &str) {
        assert!(matches!(
            accepted_extension(Path::new(path)),
            Err(BiometricError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_default_output_next_to_input() {
        let out = default_output_path(Path::new("/photos/me.jpg"), None).unwrap();
        assert_eq!(out, PathBuf::from("/photos/processed_me.jpg"));
    }

    #[test]
    fn test_default_output_in_output_dir() {
        let out = default_output_path(Path::new("/photos/me.png"), Some(Path::new("/out"))).unwrap();
        assert_eq!(out, PathBuf::from("/out/processed_me.png"));
    }

    #[test]
    fn test_bare_file_name_stays_relative() {
        let out = default_output_path(Path::new("me.png"), None).unwrap();
        assert_eq!(out, PathBuf::from("processed_me.png"));
    }

    #[test]
    fn test_missing_file_name_is_rejected() {
        assert!(default_output_path(Path::new("/"), None).is_err());
    }
}
