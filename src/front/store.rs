//! Tabulated Pareto fronts.
//!
//! Some problems have no closed-form front; a previously computed set of
//! optimal objective vectors is looked up by key instead. A missing entry is
//! not an error: [`FrontStore::load`] returns `Ok(None)` and the caller falls
//! back to another source or reports the front as unavailable.
//!
//! # Format
//!
//! Plain text, one front point per line, objectives separated by
//! whitespace or commas. Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! # osy.pf
//! -274.0  76.0
//! -250.1  70.3
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::error::{Error, Result};

/// A read-only, key-addressed source of tabulated fronts.
pub trait FrontStore: Send + Sync {
    /// Loads the front stored under `key`.
    ///
    /// Returns `Ok(None)` when no such entry exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be read or parsed.
    fn load(&self, key: &str) -> Result<Option<Array2<f64>>>;
}

/// Fronts stored as `<root>/<key>.<extension>` text files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    extension: String,
}

impl DirectoryStore {
    /// Creates a store reading `<root>/<key>.pf`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "pf".into(),
        }
    }

    /// Sets the file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// The directory searched by this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{}", self.extension))
    }
}

impl FrontStore for DirectoryStore {
    fn load(&self, key: &str) -> Result<Option<Array2<f64>>> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace_debug!(key, path = %path.display(), "no tabulated front");
                return Ok(None);
            }
            Err(e) => return Err(Error::Io(e)),
        };
        parse_front(key, &text).map(Some)
    }
}

/// Fronts held in memory, keyed by name.
///
/// ```
/// use ndarray::array;
/// use u_mop::front::{FrontStore, MemoryStore};
///
/// let store = MemoryStore::new().with_front("tnk", array![[0.1, 1.0], [1.0, 0.1]]);
/// assert!(store.load("tnk").unwrap().is_some());
/// assert!(store.load("osy").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    fronts: HashMap<String, Array2<f64>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a front.
    pub fn with_front(mut self, key: impl Into<String>, front: Array2<f64>) -> Self {
        self.insert(key, front);
        self
    }

    /// Adds (or replaces) a front.
    pub fn insert(&mut self, key: impl Into<String>, front: Array2<f64>) {
        self.fronts.insert(key.into(), front);
    }
}

impl FrontStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Array2<f64>>> {
        Ok(self.fronts.get(key).cloned())
    }
}

/// Parses front text with whitespace- or comma-separated columns.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// [`Error::Resource`] on a non-numeric token, on rows of differing width,
/// or when the text holds no rows at all.
pub fn parse_front(key: &str, text: &str) -> Result<Array2<f64>> {
    let malformed = |reason: String| Error::Resource {
        key: key.to_string(),
        reason,
    };

    let mut values = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let before = values.len();
        let tokens = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());
        for token in tokens {
            let v: f64 = token
                .parse()
                .map_err(|_| malformed(format!("line {}: '{token}' is not a number", line_no + 1)))?;
            values.push(v);
        }
        let n = values.len() - before;
        match width {
            None => width = Some(n),
            Some(w) if w != n => {
                return Err(malformed(format!(
                    "line {}: expected {w} columns, found {n}",
                    line_no + 1
                )));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let width = width.ok_or_else(|| malformed("no front points".into()))?;
    Array2::from_shape_vec((rows, width), values).map_err(|e| malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_parse_front() {
        let text = "# comment\n1.0 2.0\n\n 3.5\t-4e-1 \n";
        let front = parse_front("k", text).unwrap();
        assert_eq!(front, array![[1.0, 2.0], [3.5, -0.4]]);
    }

    #[test]
    fn test_parse_comma_separated() {
        let front = parse_front("k", "0.0,1.0
0.5, 0.5
1.0 ,0.0
").unwrap();
        assert_eq!(front, array![[0.0, 1.0], [0.5, 0.5], [1.0, 0.0]]);
    }

    #[test]
    fn test_parse_ragged_rows() {
        let err = parse_front("k", "1 2\n3\n").unwrap_err();
        assert!(matches!(err, Error::Resource { .. }));
    }

    #[test]
    fn test_parse_bad_token() {
        let err = parse_front("k", "1 x\n").unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_front("k", "# nothing\n").is_err());
    }

    #[test]
    fn test_directory_store_missing_file() {
        let store = DirectoryStore::new(std::env::temp_dir().join("u-mop-no-such-dir"));
        assert!(store.load("osy").unwrap().is_none());
    }

    #[test]
    fn test_directory_store_reads_file() {
        let dir = std::env::temp_dir().join(format!("u-mop-store-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tnk.pf"), "0.1 1.0\n1.0 0.1\n").unwrap();

        let store = DirectoryStore::new(&dir);
        let front = store.load("tnk").unwrap().unwrap();
        assert_eq!(front.shape(), &[2, 2]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_custom_extension() {
        let store = DirectoryStore::new("/fronts").with_extension("txt");
        assert_eq!(store.path_for("zdt1"), PathBuf::from("/fronts/zdt1.txt"));
    }
}
