//! File-existence and enumeration abstraction
//!
//! The pipeline only ever asks three questions of storage: which project
//! directories exist under a root, whether a file exists, and what a record
//! file contains. Its one write is the generated artifact. `HostFs` works on
//! disk; `MemoryFs` keeps everything in memory so phases can be exercised
//! without touching disk.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// View of storage used by the pipeline phases
pub trait FileSystem {
    /// Whether `path` names an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Immediate sub-directories of `root`, sorted by path
    ///
    /// Fails when `root` itself cannot be enumerated.
    fn sub_dirs(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create or replace a file in an existing directory
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Storage backed by the host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FileSystem for HostFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn sub_dirs(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        // read_dir order is platform dependent
        dirs.sort();
        Ok(dirs)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}

/// In-memory storage for fast, hermetic phase tests
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: RefCell<BTreeMap<PathBuf, String>>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFs {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file, creating its ancestor directories
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, content: &str) {
        let path = path.as_ref().to_path_buf();
        self.add_ancestors(&path);
        self.files.get_mut().insert(path, content.to_string());
    }

    /// Add an empty directory and its ancestors
    pub fn add_dir<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();
        self.add_ancestors(&path);
        self.dirs.insert(path);
    }

    /// Remove a file, leaving its directories in place
    pub fn remove_file<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.files.get_mut().remove(path.as_ref()).is_some()
    }

    fn add_ancestors(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() || !self.dirs.insert(dir.to_path_buf()) {
                break;
            }
            current = dir.parent();
        }
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn sub_dirs(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.dirs.contains(root) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {}", root.display()),
            ));
        }
        Ok(self
            .dirs
            .iter()
            .filter(|dir| dir.parent() == Some(root))
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let parent = path.parent().unwrap_or(Path::new(""));
        if !self.dirs.contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {}", parent.display()),
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
