use crate::{FsError, Metadata};

/// Operations every tree-shaped file system backend offers.
///
/// Paths are `/`-separated strings. A leading `/` makes a path absolute, anything else is
/// resolved against the current working directory. `..` climbs one level (and is a no-op at
/// the root), `.` and empty segments are ignored.
pub trait FsBackend {
    /// Names of the immediate children of the current directory, in insertion order.
    fn list(&self) -> Vec<String>;
    fn ls(&self, path: &str) -> Result<Vec<String>>;
    fn tree(&self, path: &str) -> Result<Vec<String>>;
    fn cd(&mut self, path: &str) -> Result<()>;
    fn current_path(&self) -> String;
    fn exists(&self, path: &str) -> bool;
    fn is_dir(&self, path: &str) -> Result<bool>;
    fn is_file(&self, path: &str) -> Result<bool>;
    fn stat(&self, path: &str) -> Result<Metadata>;
    fn mkdir(&mut self, path: &str, create_parents: bool) -> Result<()>;
    fn touch(&mut self, path: &str) -> Result<()>;
    fn write(&mut self, path: &str, data: &[u8], mode: WriteMode) -> Result<()>;
    fn read(&self, path: &str) -> Result<Vec<u8>>;
    fn remove(&mut self, path: &str, recursive: bool) -> Result<()>;
    fn move_node(&mut self, src: &str, dst: &str) -> Result<()>;
    fn copy(&mut self, src: &str, dst: &str) -> Result<()>;
    fn find(&self, substring: &str) -> Result<String>;
    fn cleanup(&mut self);
}

/// How `write` treats the existing content of a file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

pub type Result<T> = std::result::Result<T, FsError>;

pub mod utils {
    pub const SEPARATOR: char = '/';

    /// Splits `path` into its non-empty segments. `//` and a trailing `/` produce nothing.
    pub fn segments(path: &str) -> impl Iterator<Item = &str> {
        path.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    pub fn is_absolute(path: &str) -> bool {
        path.starts_with(SEPARATOR)
    }

    /// A name that may be given to a new entry.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && name != "." && name != ".." && !name.contains(SEPARATOR)
    }

}
