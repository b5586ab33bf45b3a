//! Config file discovery and loading.
//!
//! # Discovery
//!
//! Each [`SearchPath`] resolves to one concrete directory. `Cwd` is the
//! relative path `.`; `Platform` and `Home` go through the `directories`
//! crate and are skipped when they cannot be resolved.
//!
//! # Precedence
//!
//! Basenames and search directories are both listed **most important
//! first**: the first basename in the first directory wins. Files are
//! therefore generated in the reverse of that order, least important first,
//! so that merging them in generation order lets the important ones
//! override:
//!
//! ```text
//! basenames  = [hello.ini, hello.cfg]
//! searchpath = [., more]
//!
//! more/hello.cfg   <- merged first (lowest precedence)
//! more/hello.ini
//! ./hello.cfg
//! ./hello.ini      <- merged last (highest precedence)
//! ```
//!
//! Missing directories and files are silently skipped. Only actual I/O
//! errors while reading an existing file are propagated.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigFileError;
use crate::ini::IniDocument;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath) -> Option<PathBuf> {
    match sp {
        SearchPath::Cwd => Some(PathBuf::from(".")),
        SearchPath::Path(p) => Some(p.clone()),
        SearchPath::Platform(app_name) => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
    }
}

/// Expand search paths into concrete directories, keeping their order.
pub fn expand_search_paths(search_paths: &[SearchPath]) -> Vec<PathBuf> {
    search_paths
        .iter()
        .filter_map(|sp| {
            let dir = resolve_search_path(sp);
            if dir.is_none() {
                log::trace!("search path {sp:?} did not resolve, skipping");
            }
            dir
        })
        .collect()
}

/// Lazily yield every existing config file, lowest precedence first.
///
/// Iterates `searchpath` in reverse and, per directory, `basenames` in
/// reverse. Directories that are not directories are skipped; only regular
/// files are yielded, each path at most once. A `searchpath` of `None`
/// means the current directory.
pub fn generate_configfile_names<'a, B>(
    basenames: &'a [B],
    searchpath: Option<&'a [PathBuf]>,
) -> impl Iterator<Item = PathBuf> + 'a
where
    B: AsRef<Path>,
{
    let dirs: Box<dyn Iterator<Item = PathBuf> + 'a> = match searchpath {
        Some(dirs) => Box::new(dirs.iter().rev().cloned()),
        None => Box::new(std::iter::once(PathBuf::from("."))),
    };

    let mut seen = HashSet::new();
    dirs.filter(|dir| {
        let is_dir = dir.is_dir();
        if !is_dir {
            log::trace!("config dir {} does not exist, skipping", dir.display());
        }
        is_dir
    })
    .flat_map(move |dir| {
        basenames
            .iter()
            .rev()
            .map(move |name| dir.join(name.as_ref()))
    })
    .filter(|path| path.is_file())
    .filter(move |path| seen.insert(path.clone()))
}

/// Read every file in `paths`, in order.
pub fn load_config_files(paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>, ConfigFileError> {
    let mut results = Vec::new();
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("reading config file {}", path.display());
                results.push((path.clone(), content));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(ConfigFileError::Io {
                    path: path.clone(),
                    source: e,
                });
            }
        }
    }
    Ok(results)
}

/// Parse and merge loaded files; later files override earlier ones per key.
pub fn parse_config_files(files: &[(PathBuf, String)]) -> Result<IniDocument, ConfigFileError> {
    let mut merged = IniDocument::new();
    for (path, content) in files {
        merged.merge(IniDocument::parse(content, path)?);
    }
    Ok(merged)
}
