//! # Properties Output
//!
//! Builds the text of a `.properties` file: one `key=value` entry per line,
//! ASCII only.
//!
//! Every value goes through [`escape`]: backslashes are doubled and each
//! non-ASCII character becomes a `\uXXXX` escape. Characters outside the
//! Basic Multilingual Plane are written as a UTF-16 surrogate pair, two
//! escapes in a row.
//!
//! Multi-value entries use backslash continuation with one value per line:
//!
//! ```text
//! key=\
//! first,\
//! second
//! ```
//!
//! A [`PropertiesWriter`] is owned by one rendering pass. [`PropertiesWriter::seal`]
//! consumes it and returns an immutable [`Properties`], so nothing can be
//! appended once the output is finalized.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::filesystem::FileSystem;

/// Escape a value for a properties file
///
/// ```
/// use sonar_props::properties::escape;
///
/// assert_eq!(escape(r"C:\a\b"), r"C:\\a\\b");
/// assert_eq!(escape("café"), r"caf\u00E9");
/// assert_eq!(escape("plain"), "plain");
/// ```
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut units = [0u16; 2];
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            c if c.is_ascii() => out.push(c),
            c => {
                for unit in c.encode_utf16(&mut units) {
                    // Writing to a String cannot fail
                    let _ = write!(out, "\\u{:04X}", unit);
                }
            }
        }
    }
    out
}

/// Append-only builder for properties text
#[derive(Debug, Default)]
pub struct PropertiesWriter {
    buf: String,
}

impl PropertiesWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`, escaping the value
    pub fn property(&mut self, key: &str, value: &str) -> &mut Self {
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(&escape(value));
        self.buf.push('\n');
        self
    }

    /// Append a multi-value entry, one escaped value per continuation line
    ///
    /// An empty list is written as `key=`.
    pub fn list<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
        self.buf.push_str(key);
        self.buf.push('=');
        if values.is_empty() {
            self.buf.push('\n');
            return self;
        }
        self.buf.push_str("\\\n");
        for (i, value) in values.iter().enumerate() {
            self.buf.push_str(&escape(value.as_ref()));
            if i + 1 < values.len() {
                self.buf.push_str(",\\");
            }
            self.buf.push('\n');
        }
        self
    }

    pub fn blank_line(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Finalize the output
    pub fn seal(self) -> Properties {
        Properties { text: self.buf }
    }
}

/// Finalized properties text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    text: String,
}

impl Properties {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Persist the text to `path`, replacing any existing file
    pub fn write_to(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        fs.write(path, &self.text)?;
        Ok(())
    }
}
