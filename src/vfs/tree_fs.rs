//! This module provides an in-memory file system organised as a tree of entries.

use tracing::{debug, trace};

use super::entry::{Entry, EntryType, Metadata, NodeId};
use super::resolver::{self, Resolution};
use super::tree::Tree;
use crate::FsError;
use crate::core::{FsBackend, Result, WriteMode, utils};

/// A virtual file system (VFS) that keeps a tree of files and directories in memory.
///
/// `TreeFS` offers shell-like operations (`cd`, `mkdir`, `touch`, `write`, `read`, `remove`,
/// `move_node`, `copy`, `find`) over a tree that never touches the host filesystem.
///
/// ### Internal state
///
/// * `tree` — The arena that owns every entry. Entries are addressed by index; the parent link
///   of an entry is an index too and carries no ownership.
/// * `cwd` — Current Working Directory, a handle to a directory entry of `tree`.
///   - Determines how relative paths (e.g., `docs/file.txt`) are resolved.
///   - Default value: the root `/`.
///   - Changed via `cd()`; kept valid by `remove()` and `cleanup()`.
///
/// ### Invariants
///
/// 1. **Root existence**: exactly one root named `/`, of type `Directory`, without a parent.
/// 2. **Single parent**: every other entry appears exactly once in the children of its parent;
///    the tree has no cycles.
/// 3. **Uniqueness**: no two children of one directory share a name.
/// 4. **Kind separation**: files have no children and directories have no content.
///
/// Every operation resolves its paths completely before it edits anything. A failing call
/// returns an [`FsError`] and leaves the tree untouched.
///
/// ### Thread Safety
///
/// This struct is **not thread‑safe by default**. If concurrent access is required, wrap it in
/// a synchronization primitive (e.g., `Arc<Mutex<TreeFS>>`) at the application level.
///
/// ### Example
///
/// ```
/// use treefs_kit::{FsBackend, TreeFS, WriteMode};
///
/// let mut fs = TreeFS::new();
///
/// fs.mkdir("/docs", false).unwrap();
/// fs.write("/docs/note.txt", b"Hello", WriteMode::Overwrite).unwrap();
///
/// assert!(fs.exists("/docs/note.txt"));
/// assert_eq!(fs.find("note").unwrap(), "/docs/note.txt");
///
/// fs.remove("/docs", true).unwrap();
/// assert!(!fs.exists("/docs"));
/// ```
#[derive(Debug)]
pub struct TreeFS {
    tree: Tree,
    cwd: NodeId,
}

impl TreeFS {
    /// Creates new TreeFS instance holding only the root directory.
    /// The current working directory is set to `/`.
    pub fn new() -> Self {
        let tree = Tree::new();
        let cwd = tree.root();
        Self { tree, cwd }
    }

    fn lookup(&self, path: &str) -> Result<NodeId> {
        resolver::lookup(&self.tree, self.cwd, path)
    }

    fn locate(&self, path: &str) -> Result<Resolution> {
        resolver::locate(&self.tree, self.cwd, path)
    }

    fn names(&self, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| self.tree.get(id).name().to_string())
            .collect()
    }

    /// Where `source` lands when moved or copied to `dst`: the target directory and the name
    /// the entry gets there.
    ///
    /// An existing directory receives the entry under its own name; a free name in an
    /// existing directory renames it. An existing file is never replaced.
    fn destination(&self, source: NodeId, dst: &str) -> Result<(NodeId, String)> {
        match self.locate(dst)? {
            Resolution::Existing(dir) if self.tree.is_dir(dir) => {
                let name = self.tree.get(source).name();
                if !utils::is_valid_name(name) {
                    return Err(FsError::InvalidArgument(format!(
                        "{name} must be given a new name"
                    )));
                }
                Ok((dir, name.to_string()))
            }
            Resolution::Existing(file) => {
                Err(FsError::NameCollision(self.tree.path_of(file)))
            }
            Resolution::Vacant { parent, name } => Ok((parent, name)),
        }
    }

    fn ensure_vacant(&self, dir: NodeId, name: &str) -> Result<()> {
        match self.tree.child(dir, name) {
            Some(existing) => Err(FsError::NameCollision(self.tree.path_of(existing))),
            None => Ok(()),
        }
    }
}

impl Default for TreeFS {
    fn default() -> Self {
        Self::new()
    }
}

impl FsBackend for TreeFS {
    /// Returns the names of the entries in the current working directory, in the order they
    /// were created. Does not recurse.
    fn list(&self) -> Vec<String> {
        self.names(self.tree.children(self.cwd))
    }

    /// Lists the **immediate children** of the directory at `path`.
    ///
    /// # Arguments
    /// * `path` - path to the directory to list (must exist in VFS).
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Names of the children in insertion order. If `path` is a file,
    ///   the only item is the name of the file itself.
    /// * `Err(FsError)` - If the specified path does not exist in VFS.
    fn ls(&self, path: &str) -> Result<Vec<String>> {
        let id = self.lookup(path)?;
        let entry = self.tree.get(id);
        if entry.is_file() {
            return Ok(vec![entry.name().to_string()]);
        }
        Ok(self.names(entry.children()))
    }

    /// Returns the absolute paths of everything below `path`, in pre-order.
    ///
    /// # Behavior
    /// - **Recursive traversal**: Includes all nested files and directories.
    /// - **Excludes root**: The starting directory path is not included (only its contents).
    ///   A file yields its own path.
    /// - **Ordering**: A directory comes before its children; siblings keep insertion order.
    fn tree(&self, path: &str) -> Result<Vec<String>> {
        let id = self.lookup(path)?;
        if self.tree.get(id).is_file() {
            return Ok(vec![self.tree.path_of(id)]);
        }
        Ok(self.tree.descendant_paths(id))
    }

    /// Changes the current working directory.
    /// * `path` can be in relative or absolute form, but in both cases it must exist in VFS
    /// and name a directory. On error the current directory is unchanged.
    fn cd(&mut self, path: &str) -> Result<()> {
        let target = self.lookup(path)?;
        if !self.tree.is_dir(target) {
            return Err(FsError::NotADirectory(self.tree.path_of(target)));
        }
        self.cwd = target;
        debug!(path, cwd = %self.tree.path_of(target), "changed directory");
        Ok(())
    }

    /// Absolute path of the current working directory; `/` for the root.
    fn current_path(&self) -> String {
        self.tree.path_of(self.cwd)
    }

    fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    fn is_dir(&self, path: &str) -> Result<bool> {
        let id = self.lookup(path)?;
        Ok(self.tree.get(id).is_dir())
    }

    fn is_file(&self, path: &str) -> Result<bool> {
        let id = self.lookup(path)?;
        Ok(self.tree.get(id).is_file())
    }

    fn stat(&self, path: &str) -> Result<Metadata> {
        let id = self.lookup(path)?;
        Ok(self.tree.get(id).metadata())
    }

    /// Creates a directory.
    ///
    /// # Arguments
    /// * `path` - path of the new directory.
    /// * `create_parents` - create missing intermediate directories instead of failing.
    ///
    /// # Behavior
    /// - **Idempotent**: if the last component already exists (file or directory) nothing
    ///   changes and `Ok(())` is returned.
    /// - Fails with `NotFound` when an intermediate directory is missing and `create_parents`
    ///   is false, and with `NotADirectory` when an intermediate component is a file. No
    ///   directory is created in either case.
    fn mkdir(&mut self, path: &str, create_parents: bool) -> Result<()> {
        let resolution = if create_parents {
            resolver::locate_or_build(&mut self.tree, self.cwd, path)?
        } else {
            self.locate(path)?
        };
        match resolution {
            Resolution::Existing(_) => {
                debug!(path, "mkdir: already exists");
            }
            Resolution::Vacant { parent, name } => {
                let id = self.tree.insert(parent, Entry::new(name, EntryType::Directory));
                debug!(path = %self.tree.path_of(id), "created directory");
            }
        }
        Ok(())
    }

    /// Creates an empty file, or refreshes the modification time of an existing entry.
    /// The parent directory must already exist.
    fn touch(&mut self, path: &str) -> Result<()> {
        match self.locate(path)? {
            Resolution::Existing(id) => {
                self.tree.get_mut(id).touch();
                debug!(path, "touched");
            }
            Resolution::Vacant { parent, name } => {
                let id = self.tree.insert(parent, Entry::new(name, EntryType::File));
                debug!(path = %self.tree.path_of(id), "created file");
            }
        }
        Ok(())
    }

    /// Writes bytes to a file, creating it when it does not exist.
    ///
    /// # Arguments
    /// * `path` - Path to the file. Its parent directory must exist.
    /// * `data` - Byte slice (`&[u8]`) to write.
    /// * `mode` - `Overwrite` replaces the content, `Append` adds `data` at the end.
    ///
    /// # Returns
    /// * `Ok(())` - If the write operation succeeded.
    /// * `Err(FsError)` - If any of the following occurs:
    ///   - The parent directory does not exist (`NotFound`).
    ///   - Path points to a directory (`NotAFile`); the tree is unchanged.
    fn write(&mut self, path: &str, data: &[u8], mode: WriteMode) -> Result<()> {
        let target = match self.locate(path)? {
            Resolution::Existing(id) if self.tree.is_dir(id) => {
                return Err(FsError::NotAFile(self.tree.path_of(id)));
            }
            Resolution::Existing(id) => id,
            Resolution::Vacant { parent, name } => {
                self.tree.insert(parent, Entry::new(name, EntryType::File))
            }
        };
        let entry = self.tree.get_mut(target);
        match mode {
            WriteMode::Overwrite => entry.set_content(data),
            WriteMode::Append => entry.append_content(data),
        }
        debug!(path, bytes = data.len(), ?mode, size = entry.size(), "wrote file");
        Ok(())
    }

    /// Reads the entire contents of a file into a byte vector.
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - File content as a byte vector. Empty files give an empty vector.
    /// * `Err(FsError)` - `NotFound` if nothing exists at `path`, `NotAFile` if it is a
    ///   directory.
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let id = self.lookup(path)?;
        let entry = self.tree.get(id);
        if entry.is_dir() {
            return Err(FsError::NotAFile(self.tree.path_of(id)));
        }
        Ok(entry.content().to_vec())
    }

    /// Removes a file or directory at the specified path.
    ///
    /// - `path`: can be absolute (starting with '/') or relative to the current working
    /// directory (cwd).
    /// - `recursive`: required to remove a directory that still has children.
    ///
    /// The entry and its whole subtree disappear in one step. If the current working
    /// directory was inside the removed subtree, it moves to the parent of the removed entry.
    ///
    /// Returns:
    /// - `Ok(())` on successful removal.
    /// - `Err(_)` if the path does not exist, names the root, or names a non-empty directory
    ///   while `recursive` is false.
    fn remove(&mut self, path: &str, recursive: bool) -> Result<()> {
        let target = self.lookup(path)?;
        let Some(parent) = self.tree.parent(target) else {
            return Err(FsError::InvalidArgument("the root cannot be removed".into()));
        };
        let entry = self.tree.get(target);
        if entry.is_dir() && !entry.children().is_empty() && !recursive {
            return Err(FsError::NonEmptyDirectory(self.tree.path_of(target)));
        }

        let removed = self.tree.path_of(target);
        if self.tree.is_ancestor(target, self.cwd) {
            self.cwd = parent;
            debug!(cwd = %self.tree.path_of(parent), "working directory removed, moved up");
        }
        self.tree.destroy(target);
        debug!(path = %removed, recursive, "removed");
        Ok(())
    }

    /// Moves (or renames) the entry at `src`.
    ///
    /// # Behavior
    /// - If `dst` is an existing directory, the entry moves into it and keeps its name.
    /// - If `dst` does not exist but its parent directory does, the entry moves there under
    ///   the last component of `dst`.
    /// - An existing file at `dst`, or a same-named entry inside the target directory, is a
    ///   `NameCollision`; nothing is overwritten.
    /// - Moving a directory into itself or one of its descendants is rejected.
    /// - Moving an entry onto itself is a no-op.
    /// - A rename inside the same directory keeps the entry's position among its siblings;
    ///   an entry moved to another directory becomes its last child.
    ///
    /// The entry keeps its identity, content and timestamps; the current working directory
    /// stays the same directory even when one of its ancestors moves.
    fn move_node(&mut self, src: &str, dst: &str) -> Result<()> {
        let source = self.lookup(src)?;
        if source == self.tree.root() {
            return Err(FsError::InvalidArgument("the root cannot be moved".into()));
        }
        if self.locate(dst)? == Resolution::Existing(source) {
            return Ok(());
        }
        let (dir, name) = self.destination(source, dst)?;
        if self.tree.parent(source) == Some(dir) && self.tree.get(source).name() == name {
            return Ok(());
        }
        if self.tree.is_ancestor(source, dir) {
            return Err(FsError::InvalidArgument(format!(
                "cannot move {} into itself",
                self.tree.path_of(source)
            )));
        }
        self.ensure_vacant(dir, &name)?;

        let from = self.tree.path_of(source);
        if self.tree.parent(source) == Some(dir) {
            // plain rename keeps the sibling position
            self.tree.get_mut(source).set_name(name);
        } else {
            self.tree.detach(source);
            self.tree.get_mut(source).set_name(name);
            self.tree.attach(dir, source);
        }
        debug!(src = %from, dst = %self.tree.path_of(source), "moved");
        Ok(())
    }

    /// Copies the entry at `src` (recursively for directories) to `dst`.
    ///
    /// Destination rules are the same as for [`move_node`](FsBackend::move_node). The copy is
    /// a brand-new subtree: new entries, fresh timestamps and content that can be changed
    /// without affecting the source.
    fn copy(&mut self, src: &str, dst: &str) -> Result<()> {
        let source = self.lookup(src)?;
        let (dir, name) = self.destination(source, dst)?;
        self.ensure_vacant(dir, &name)?;

        let copy = self.tree.deep_clone(source);
        self.tree.get_mut(copy).set_name(name);
        self.tree.attach(dir, copy);
        debug!(
            src = %self.tree.path_of(source),
            dst = %self.tree.path_of(copy),
            "copied"
        );
        Ok(())
    }

    /// Searches the whole tree, starting at the root, for the first entry whose name contains
    /// `substring` (case-sensitive).
    ///
    /// The search is depth-first pre-order: a directory is checked before its children and
    /// siblings are visited in insertion order, so the answer is stable for an unchanged tree.
    /// The root itself never matches.
    fn find(&self, substring: &str) -> Result<String> {
        if substring.is_empty() {
            return Err(FsError::InvalidArgument("empty search string".into()));
        }
        let found = self.tree.descendants(self.tree.root()).find(|&id| {
            let name = self.tree.get(id).name();
            trace!(name, substring, "find visit");
            name.contains(substring)
        });
        match found {
            Some(id) => {
                let path = self.tree.path_of(id);
                debug!(substring, path = %path, "found");
                Ok(path)
            }
            None => Err(FsError::NotFound(substring.to_string())),
        }
    }

    /// Removes all entries but preserves the root. The working directory returns to `/`.
    fn cleanup(&mut self) {
        self.tree.clear();
        self.cwd = self.tree.root();
        debug!("cleaned up");
    }
}
