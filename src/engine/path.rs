use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};

/// Normalize a path logically (resolving `.` and `..`) without hitting the
/// disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) => {
                    // At root, .. does nothing
                }
                _ => normalized.push(Component::ParentDir),
            },
            _ => normalized.push(component),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(Component::CurDir);
    }

    normalized
}

/// Expand a leading `~` to the home directory and normalize the result.
pub fn expand_home(path_str: &str) -> PathBuf {
    if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return normalize_path(&home.join(rest));
        }
    }
    normalize_path(Path::new(path_str))
}

/// Resolve a program name using the same executable-search convention as
/// the invoking shell: a name containing a separator is checked directly,
/// a bare name is searched through the PATH components in order.
pub fn find_executable(cmd: &str) -> Option<PathBuf> {
    if cmd.contains('/') {
        return check_path(expand_home(cmd));
    }

    let paths = std::env::var("PATH").ok()?;
    std::env::split_paths(&paths).find_map(|dir| check_path(dir.join(cmd)))
}

fn check_path(p: PathBuf) -> Option<PathBuf> {
    let meta = std::fs::metadata(&p).ok()?;
    // A regular file with any execute bit set.
    if meta.is_file() && meta.permissions().mode() & 0o111 != 0 {
        Some(p)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_searches_path() {
        // sh exists on every Unix worth running a shell on.
        let found = find_executable("sh").expect("sh not found on PATH");
        assert!(found.ends_with("sh"));
    }

    #[test]
    fn test_missing_program_resolves_to_none() {
        assert!(find_executable("definitely-not-a-real-program-462").is_none());
    }

    #[test]
    fn test_name_with_separator_checked_directly() {
        assert!(find_executable("/bin/sh").is_some());
        assert!(find_executable("./definitely-not-here-462").is_none());
    }

    #[test]
    fn test_normalize_resolves_dots() {
        assert_eq!(
            normalize_path(Path::new("/usr/./bin/../lib")),
            PathBuf::from("/usr/lib")
        );
    }
}
