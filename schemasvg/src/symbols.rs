//! Symbol file lookup along a configured search path.
//!
//! Directories are searched depth-first in list order; the first match wins.
//! Paths containing the reserved `gnetman` segment are generated netlist
//! artifacts and never returned.

use std::fs;
use std::path::{Path, PathBuf};

/// Path segment excluded from symbol resolution.
pub const RESERVED_PATH_SEGMENT: &str = "gnetman";

/// Ordered, read-only view of the symbol search directories.
#[derive(Debug, Clone, Copy)]
pub struct SymbolLibrary<'a> {
    paths: &'a [PathBuf],
}

impl<'a> SymbolLibrary<'a> {
    pub fn new(paths: &'a [PathBuf]) -> Self {
        Self { paths }
    }

    /// Locate a symbol file by name. Directories are tried in list order;
    /// within a directory the file itself is checked before recursing into
    /// subdirectories (sorted for deterministic results).
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        for dir in self.paths {
            if let Some(found) = locate_in(dir, name) {
                return Some(found);
            }
        }
        None
    }

    /// Locate and read a symbol file.
    pub fn load(&self, name: &str) -> Option<(PathBuf, String)> {
        let path = self.locate(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => Some((path, content)),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read symbol file");
                None
            }
        }
    }
}

fn locate_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = dir.join(name);
    if candidate.is_file() && !is_reserved(&candidate) {
        return Some(candidate);
    }
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();
    for sub in subdirs {
        if let Some(found) = locate_in(&sub, name) {
            return Some(found);
        }
    }
    None
}

fn is_reserved(path: &Path) -> bool {
    path.to_string_lossy().contains(RESERVED_PATH_SEGMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(path: &Path, content: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn first_listed_directory_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        touch(&a.path().join("R"), "from-a");
        touch(&b.path().join("R"), "from-b");

        let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let lib = SymbolLibrary::new(&paths);
        let (found, content) = lib.load("R").unwrap();
        assert_eq!(found, a.path().join("R"));
        assert_eq!(content, "from-a");

        let reversed = vec![b.path().to_path_buf(), a.path().to_path_buf()];
        let lib = SymbolLibrary::new(&reversed);
        assert_eq!(lib.locate("R").unwrap(), b.path().join("R"));
    }

    #[test]
    fn searches_subdirectories_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("analog").join("passive");
        fs::create_dir_all(&nested).unwrap();
        touch(&nested.join("cap.sym"), "V 0 0 50 3 10 0 0 -1 -1 0 -1 -1 -1 -1 -1");

        let paths = vec![dir.path().to_path_buf()];
        let lib = SymbolLibrary::new(&paths);
        assert_eq!(lib.locate("cap.sym").unwrap(), nested.join("cap.sym"));
    }

    #[test]
    fn reserved_segment_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let reserved = dir.path().join("gnetman");
        fs::create_dir_all(&reserved).unwrap();
        touch(&reserved.join("R"), "hidden");

        let paths = vec![dir.path().to_path_buf()];
        let lib = SymbolLibrary::new(&paths);
        assert!(lib.locate("R").is_none());
    }

    #[test]
    fn missing_symbol_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![dir.path().to_path_buf()];
        let lib = SymbolLibrary::new(&paths);
        assert!(lib.locate("does-not-exist.sym").is_none());
    }
}
