use std::env;
use std::path::{Path, PathBuf};

pub fn project_root() -> PathBuf {
    match env::var_os("PROJECT_ROOT") {
        Some(val) => PathBuf::from(val),
        None => {
            // Fall back to current directory if PROJECT_ROOT not set
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

/// Relative paths are taken from the project root; absolute paths pass through.
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root().join(path)
    }
}

/// Burtin's dataset as shipped with the crate.
pub fn bundled_dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/burtin.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_untouched() {
        let abs = bundled_dataset_path();
        assert!(abs.is_absolute());
        assert_eq!(resolve_path(&abs), abs);
    }

    #[test]
    fn relative_paths_hang_off_the_project_root() {
        let resolved = resolve_path(Path::new("out/site"));
        assert!(resolved.ends_with("out/site"));
        assert!(resolved.starts_with(project_root()));
    }

    #[test]
    fn bundled_dataset_exists() {
        assert!(bundled_dataset_path().exists());
    }
}
