use std::io::ErrorKind;
use std::path::Path;

use crate::error::CaptionError;
use crate::paths;

/// Read and trim the caption file, resolving it against the project folder.
pub fn read_caption(file: &Path, project_folder: Option<&Path>) -> Result<String, CaptionError> {
    let path = paths::resolve(file, project_folder);
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(CaptionError::NotFound(path)),
        Err(source) => Err(CaptionError::Unreadable { path, source }),
    }
}

/// Like [`read_caption`], but every failure degrades to an empty caption
/// with a printed warning.
pub fn load_caption(file: &Path, project_folder: Option<&Path>) -> String {
    match read_caption(file, project_folder) {
        Ok(caption) => caption,
        Err(e) => {
            tracing::warn!(error = %e, "caption unavailable");
            println!("Warning: {e}. Using empty caption.");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_relative_caption_is_read_from_project_folder() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Prompts")).unwrap();
        fs::write(dir.path().join("Prompts/cap.txt"), "  hello world \n\n").unwrap();

        let caption = load_caption(Path::new("Prompts/cap.txt"), Some(dir.path()));
        assert_eq!(caption, "hello world");
    }

    #[test]
    fn test_absolute_caption_ignores_project_folder() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cap.txt");
        fs::write(&file, "absolute\n").unwrap();

        let caption = load_caption(&file, Some(Path::new("/definitely/not/here")));
        assert_eq!(caption, "absolute");
    }

    #[test]
    fn test_caption_is_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cap.txt"), "\tsame text  ").unwrap();

        let first = load_caption(Path::new("cap.txt"), Some(dir.path()));
        let second = load_caption(Path::new("cap.txt"), Some(dir.path()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_caption_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_caption(Path::new("missing.txt"), Some(dir.path())), "");
        assert_eq!(load_caption(Path::new("missing-nowhere.txt"), None), "");
        assert!(matches!(
            read_caption(Path::new("missing.txt"), Some(dir.path())),
            Err(CaptionError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_is_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cap.txt"), [0xff, 0xfe, 0xfd]).unwrap();

        assert!(matches!(
            read_caption(Path::new("cap.txt"), Some(dir.path())),
            Err(CaptionError::Unreadable { .. })
        ));
        assert_eq!(load_caption(Path::new("cap.txt"), Some(dir.path())), "");
    }
}
