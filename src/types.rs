use std::path::PathBuf;

/// Where to search for config files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// The current working directory, as the relative path `.`.
    Cwd,
    /// An explicit directory, absolute or relative to the working directory.
    Path(PathBuf),
    /// Platform config directory for the given app name
    /// (XDG on Linux, ~/Library/Application Support on macOS).
    Platform(String),
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(String),
}

impl From<PathBuf> for SearchPath {
    fn from(path: PathBuf) -> Self {
        SearchPath::Path(path)
    }
}

impl From<&str> for SearchPath {
    fn from(path: &str) -> Self {
        if path == "." {
            SearchPath::Cwd
        } else {
            SearchPath::Path(PathBuf::from(path))
        }
    }
}
