use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::parse::parse_script;
use super::value::{ScriptKey, ScriptTable, ScriptValue};
use crate::error::{Result, TilesetError};

/// Read access to a script file through a stack of open tables.
///
/// Lookups are relative to the innermost open table (or the globals when no
/// table is open). Failed reads return `None` and are also recorded, so
/// [`is_error_detected`](Self::is_error_detected) can be queried after a
/// batch of reads.
#[derive(Debug, Default)]
pub struct ScriptReader {
    filename: Option<PathBuf>,
    globals: ScriptTable,
    open_tables: Vec<ScriptKey>,
    errors: Vec<String>,
}

impl ScriptReader {
    /// Reader with no file open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and evaluates `path`. Any previously open file is closed first.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so a stray
    /// Latin-1 comment does not reject the file.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        if self.is_file_open() {
            self.close_file();
        }
        let bytes = fs::read(path).map_err(|source| TilesetError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.open_source(path, &String::from_utf8_lossy(&bytes))
    }

    /// Evaluates in-memory script text as though it were read from `path`.
    pub fn open_source(&mut self, path: &Path, text: &str) -> Result<()> {
        let globals = parse_script(text).map_err(|e| TilesetError::Script {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;
        self.globals = globals;
        self.filename = Some(path.to_path_buf());
        self.open_tables.clear();
        self.errors.clear();
        Ok(())
    }

    /// True between a successful open and `close_file`.
    pub fn is_file_open(&self) -> bool {
        self.filename.is_some()
    }

    /// Path of the open file.
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Drops the evaluated script and every open table.
    pub fn close_file(&mut self) {
        if !self.open_tables.is_empty() {
            debug!(
                "closing script {:?} with {} table(s) still open",
                self.filename,
                self.open_tables.len()
            );
        }
        self.filename = None;
        self.globals = ScriptTable::new();
        self.open_tables.clear();
        self.errors.clear();
    }

    fn current(&self) -> Option<&ScriptTable> {
        let mut table = &self.globals;
        for key in &self.open_tables {
            table = table.get(key)?.as_table()?;
        }
        Some(table)
    }

    fn lookup(&self, key: &ScriptKey) -> Option<&ScriptValue> {
        self.current()?.get(key)
    }

    fn record(&mut self, message: String) {
        self.errors.push(message);
    }

    fn table_path(&self) -> String {
        self.open_tables
            .iter()
            .map(|k| match k {
                ScriptKey::Index(i) => format!("[{}]", i),
                ScriptKey::Name(n) => format!(".{}", n),
            })
            .collect::<String>()
            .trim_start_matches('.')
            .to_owned()
    }

    /// Pushes the child table at `key`. Records an error and returns false if
    /// it is missing or not a table.
    pub fn open_table(&mut self, key: impl Into<ScriptKey>) -> bool {
        let key = key.into();
        if !self.is_file_open() {
            self.record(format!("open_table({}) failed: no file open", key));
            return false;
        }
        if self.does_table_exist(key.clone()) {
            self.open_tables.push(key);
            true
        } else {
            let msg = format!(
                "open_table({}) failed: not a table in '{}'",
                key,
                self.table_path()
            );
            self.record(msg);
            false
        }
    }

    /// Leaves the innermost open table.
    pub fn close_table(&mut self) {
        if self.open_tables.pop().is_none() {
            self.record("close_table() failed: no tables open".to_owned());
        }
    }

    /// Leaves every open table, back to the globals.
    pub fn close_all_tables(&mut self) {
        self.open_tables.clear();
    }

    /// Depth of the table stack.
    pub fn open_table_count(&self) -> usize {
        self.open_tables.len()
    }

    /// True when `key` in the current table holds a table.
    pub fn does_table_exist(&self, key: impl Into<ScriptKey>) -> bool {
        matches!(self.lookup(&key.into()), Some(ScriptValue::Table(_)))
    }

    /// Number of entries in the child table `key`, or 0 if it is not a table.
    pub fn table_size(&self, key: impl Into<ScriptKey>) -> usize {
        match self.lookup(&key.into()) {
            Some(ScriptValue::Table(t)) => t.len(),
            _ => 0,
        }
    }

    /// Keys of the innermost open table in file order.
    pub fn table_keys(&self) -> Vec<ScriptKey> {
        self.current()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// String at `key` in the current table.
    pub fn read_string(&mut self, key: impl Into<ScriptKey>) -> Option<String> {
        let key = key.into();
        match self.lookup(&key) {
            Some(ScriptValue::Str(s)) => Some(s.clone()),
            other => {
                let found = other.map_or("nil", ScriptValue::type_name);
                let msg = format!("read_string({}) found {} in '{}'", key, found, self.table_path());
                self.record(msg);
                None
            }
        }
    }

    /// Integer at `key` in the current table.
    pub fn read_int(&mut self, key: impl Into<ScriptKey>) -> Option<i64> {
        let key = key.into();
        match self.lookup(&key).and_then(ScriptValue::as_integer) {
            Some(i) => Some(i),
            None => {
                let msg = format!("read_int({}) found no integer in '{}'", key, self.table_path());
                self.record(msg);
                None
            }
        }
    }

    /// Integer at `key` that fits in a `u32`.
    pub fn read_uint(&mut self, key: impl Into<ScriptKey>) -> Option<u32> {
        let key = key.into();
        match self.read_int(key.clone()) {
            Some(i) => match u32::try_from(i) {
                Ok(v) => Some(v),
                Err(_) => {
                    let msg = format!("read_uint({}) value {} out of range", key, i);
                    self.record(msg);
                    None
                }
            },
            None => None,
        }
    }

    /// Reads the child table `key` as a `1..=n` sequence of integers.
    pub fn read_int_vector(&mut self, key: impl Into<ScriptKey>) -> Option<Vec<i64>> {
        let key = key.into();
        let parsed = match self.lookup(&key) {
            Some(ScriptValue::Table(t)) => {
                let seq = t.sequence();
                if seq.len() == t.len() {
                    seq.iter().map(|v| v.as_integer()).collect::<Option<Vec<_>>>()
                } else {
                    None
                }
            }
            _ => None,
        };
        if parsed.is_none() {
            let msg = format!(
                "read_int_vector({}) found no integer sequence in '{}'",
                key,
                self.table_path()
            );
            self.record(msg);
        }
        parsed
    }

    /// True when a read or table lookup has failed.
    pub fn is_error_detected(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Recorded failures, oldest first.
    pub fn error_messages(&self) -> &[String] {
        &self.errors
    }

    /// Forgets recorded failures.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }
}

impl Drop for ScriptReader {
    fn drop(&mut self) {
        if self.is_file_open() {
            self.close_file();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = r#"
tileset = {}
tileset.image = "img.png"
tileset.rows = {}
tileset.rows[0] = { 1, 2, 3, 4 }
tileset.rows[1] = { 1, "x" }
tileset.sparse = { [2] = 9 }
tileset.neg = -3
"#;

    fn reader() -> ScriptReader {
        let mut r = ScriptReader::new();
        r.open_source(Path::new("test.lua"), SRC).expect("parse");
        r
    }

    #[test]
    fn navigates_nested_tables() {
        let mut r = reader();
        assert!(r.open_table("tileset"));
        assert_eq!(r.read_string("image").as_deref(), Some("img.png"));
        assert_eq!(r.table_size("rows"), 2);
        assert!(r.open_table("rows"));
        assert_eq!(r.table_keys(), [ScriptKey::Index(0), ScriptKey::Index(1)]);
        assert_eq!(r.read_int_vector(0), Some(vec![1, 2, 3, 4]));
        assert!(!r.is_error_detected());
        r.close_table();
        r.close_table();
        assert_eq!(r.open_table_count(), 0);
    }

    #[test]
    fn failed_reads_accumulate_errors() {
        let mut r = reader();
        assert!(r.open_table("tileset"));
        assert_eq!(r.read_int_vector("sparse"), None);
        assert!(r.open_table("rows"));
        assert_eq!(r.read_int_vector(1), None);
        assert!(!r.open_table(7));
        assert_eq!(r.error_messages().len(), 3);
        assert!(r.error_messages()[2].contains("tileset.rows"));
    }

    #[test]
    fn read_uint_rejects_negative() {
        let mut r = reader();
        r.open_table("tileset");
        assert_eq!(r.read_int("neg"), Some(-3));
        assert_eq!(r.read_uint("neg"), None);
        assert!(r.is_error_detected());
    }

    #[test]
    fn close_file_releases_everything() {
        let mut r = reader();
        r.open_table("tileset");
        r.close_file();
        assert!(!r.is_file_open());
        assert_eq!(r.open_table_count(), 0);
        assert!(!r.open_table("tileset"));
    }

    #[test]
    fn missing_file_is_file_open_error() {
        let mut r = ScriptReader::new();
        let err = r.open_file(Path::new("/definitely/not/here.lua")).unwrap_err();
        assert!(matches!(err, TilesetError::FileOpen { .. }));
    }

    #[test]
    fn non_utf8_bytes_in_comments_are_tolerated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("latin1.lua");
        std::fs::write(&path, b"-- r\xe9sum\xe9\ntileset = { image = \"a.png\" }\n").expect("write");

        let mut r = ScriptReader::new();
        r.open_file(&path).expect("open");
        assert!(r.open_table("tileset"));
        assert_eq!(r.read_string("image").as_deref(), Some("a.png"));
    }
}
