use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TilesetError};

enum TableKey {
    Name(String),
    Index(i64),
}

/// Writes a script file as a sequence of path assignments, e.g.
/// `tileset.walkability[0][3] = { 0, 0, 0, 0 }`.
///
/// Output is buffered and written when the file is closed. Misuse (writing
/// an index key with no table open, unbalanced `end_table`) and I/O failures
/// are recorded instead of aborting, and can be queried afterwards.
#[derive(Default)]
pub struct ScriptWriter {
    path: Option<PathBuf>,
    file: Option<File>,
    buffer: String,
    open_tables: Vec<TableKey>,
    errors: Vec<String>,
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

impl ScriptWriter {
    /// Writer with no file open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or truncates) `path` for writing.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        if self.is_file_open() {
            self.close_file();
        }
        if path.exists() {
            debug!("overwriting existing script file {}", path.display());
        }
        let file = File::create(path).map_err(|source| TilesetError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.file = Some(file);
        self.path = Some(path.to_path_buf());
        self.buffer.clear();
        self.open_tables.clear();
        self.errors.clear();
        Ok(())
    }

    /// True between `open_file` and `close_file`.
    pub fn is_file_open(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the file being written.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Text written since the file was opened.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    fn table_path(&self) -> String {
        let mut out = String::new();
        for (i, key) in self.open_tables.iter().enumerate() {
            match key {
                TableKey::Name(n) if i == 0 => out.push_str(n),
                TableKey::Name(n) => {
                    out.push('.');
                    out.push_str(n);
                }
                TableKey::Index(idx) => {
                    let _ = write!(out, "[{}]", idx);
                }
            }
        }
        out
    }

    fn named_target(&self, key: &str) -> String {
        if self.open_tables.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{}", self.table_path(), key)
        }
    }

    fn indexed_target(&mut self, key: i64, what: &str) -> Option<String> {
        if self.open_tables.is_empty() {
            self.errors.push(format!(
                "{}() failed because there were no tables open when writing key [{}]",
                what, key
            ));
            None
        } else {
            Some(format!("{}[{}]", self.table_path(), key))
        }
    }

    fn line(&mut self, target: &str, value: impl fmt::Display) {
        let _ = writeln!(self.buffer, "{} = {}", target, value);
    }

    /// Appends a blank line.
    pub fn insert_new_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Appends `comment` as a `--` line.
    pub fn write_comment(&mut self, comment: &str) {
        for line in comment.lines() {
            let _ = writeln!(self.buffer, "-- {}", line);
        }
    }

    /// Assigns a string to a named field of the current table.
    pub fn write_string(&mut self, key: &str, value: &str) {
        let target = self.named_target(key);
        self.line(&target, format_args!("\"{}\"", escape(value)));
    }

    /// Assigns a string to an index of the current table.
    pub fn write_string_at(&mut self, key: i64, value: &str) {
        if let Some(target) = self.indexed_target(key, "write_string_at") {
            self.line(&target, format_args!("\"{}\"", escape(value)));
        }
    }

    /// Assigns an integer to a named field of the current table.
    pub fn write_int(&mut self, key: &str, value: i64) {
        let target = self.named_target(key);
        self.line(&target, value);
    }

    /// Assigns an integer to an index of the current table.
    pub fn write_int_at(&mut self, key: i64, value: i64) {
        if let Some(target) = self.indexed_target(key, "write_int_at") {
            self.line(&target, value);
        }
    }

    fn write_vector_at<T: fmt::Display>(&mut self, key: i64, values: &[T], what: &str) {
        if values.is_empty() {
            self.errors.push(format!(
                "{}() failed because the vector argument was empty for key [{}]",
                what, key
            ));
            return;
        }
        if let Some(target) = self.indexed_target(key, what) {
            let items = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            self.line(&target, format_args!("{{ {} }}", items));
        }
    }

    /// Assigns `{ a, b, ... }` to an index of the current table.
    pub fn write_int_vector_at(&mut self, key: i64, values: &[i32]) {
        self.write_vector_at(key, values, "write_int_vector_at");
    }

    /// Unsigned variant of [`write_int_vector_at`](Self::write_int_vector_at).
    pub fn write_uint_vector_at(&mut self, key: i64, values: &[u32]) {
        self.write_vector_at(key, values, "write_uint_vector_at");
    }

    /// Declares table `key` and makes it the target of following writes.
    pub fn begin_table(&mut self, key: &str) {
        let target = self.named_target(key);
        self.line(&target, "{}");
        self.open_tables.push(TableKey::Name(key.to_owned()));
    }

    /// Declares table `[key]` inside the current table.
    pub fn begin_table_at(&mut self, key: i64) {
        if let Some(target) = self.indexed_target(key, "begin_table_at") {
            self.line(&target, "{}");
            self.open_tables.push(TableKey::Index(key));
        }
    }

    /// Leaves the innermost table.
    pub fn end_table(&mut self) {
        if self.open_tables.pop().is_none() {
            self.errors
                .push("end_table() failed because no tables were open".to_owned());
        }
    }

    /// True when any misuse or I/O failure was recorded.
    pub fn is_error_detected(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Recorded failures, oldest first.
    pub fn error_messages(&self) -> &[String] {
        &self.errors
    }

    /// Writes the buffered text and releases the file. I/O failures are
    /// recorded; the error list survives the close.
    pub fn close_file(&mut self) {
        let Some(mut file) = self.file.take() else {
            return;
        };
        if !self.open_tables.is_empty() {
            self.errors.push(format!(
                "file closed with {} table(s) still open",
                self.open_tables.len()
            ));
            self.open_tables.clear();
        }
        if let Err(e) = file.write_all(self.buffer.as_bytes()).and_then(|_| file.flush()) {
            self.errors.push(format!("write failed: {}", e));
        }
    }
}

impl Drop for ScriptWriter {
    fn drop(&mut self) {
        if self.is_file_open() {
            debug!("script writer dropped with file still open: {:?}", self.path);
            self.close_file();
        }
    }
}
