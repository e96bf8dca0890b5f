use std::path::{Path, PathBuf};

/// Join `path` onto the project folder unless it is already absolute.
pub fn resolve(path: impl AsRef<Path>, project_folder: Option<&Path>) -> PathBuf {
    let path = path.as_ref();
    match project_folder {
        Some(base) if !path.is_absolute() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Expand a leading `~` and make the folder absolute.
pub fn expand_project_folder(raw: &str) -> std::io::Result<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    std::path::absolute(expanded.as_ref())
}

/// File name shown next to the existence checkmark.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_joins_project_folder() {
        let resolved = resolve("img/a.png", Some(Path::new("/proj")));
        assert_eq!(resolved, PathBuf::from("/proj/img/a.png"));
    }

    #[test]
    fn test_absolute_path_passes_through() {
        let resolved = resolve("/abs/a.png", Some(Path::new("/proj")));
        assert_eq!(resolved, PathBuf::from("/abs/a.png"));
    }

    #[test]
    fn test_no_project_folder_leaves_path_alone() {
        assert_eq!(resolve("img/a.png", None), PathBuf::from("img/a.png"));
    }

    #[test]
    fn test_resolve_is_stable() {
        let base = Path::new("/proj");
        let once = resolve("Video/preview.mp4", Some(base));
        let twice = resolve(&once, Some(base));
        assert_eq!(once, twice);
        assert_eq!(once, resolve("Video/preview.mp4", Some(base)));
    }

    #[test]
    fn test_expand_tilde() {
        let home = shellexpand::tilde("~").into_owned();
        let expanded = expand_project_folder("~/projects/demo").unwrap();
        assert!(expanded.is_absolute());
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with("projects/demo"));
    }

    #[test]
    fn test_expand_relative_becomes_absolute() {
        let expanded = expand_project_folder("some/folder").unwrap();
        assert!(expanded.is_absolute());
        assert!(expanded.ends_with("some/folder"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/proj/img/a.png")), "a.png");
    }
}
