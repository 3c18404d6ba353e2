//! Path resolution shared by every operation.
//!
//! A path is walked segment by segment from the root (absolute paths) or from a start
//! directory (relative paths). Walking never touches the tree; the only mode that creates
//! anything, [`Mode::CreateParents`], first produces a complete [`Plan`] and builds the missing
//! directories once the whole path is known to be valid.

use tracing::trace;

use super::entry::{Entry, EntryType, NodeId};
use super::tree::Tree;
use crate::FsError;
use crate::core::{Result, utils};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    /// The final segment must exist.
    Lookup,
    /// The final segment may be missing; every intermediate segment must exist.
    Create,
    /// Like `Create`, but missing intermediate directories are fabricated.
    CreateParents,
}

/// Outcome of a create-style resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// The path names an existing entry.
    Existing(NodeId),
    /// The path names a free slot `name` inside the directory `parent`.
    Vacant { parent: NodeId, name: String },
}

#[derive(Debug)]
enum Leaf {
    /// The walk ended on the cursor itself (`/`, `.`, `..`).
    Cursor,
    Found(NodeId),
    Vacant(String),
}

/// Result of walking a path without mutating anything.
///
/// `missing` lists directories that do not exist yet below `base`, outermost first. It is
/// only ever non-empty in [`Mode::CreateParents`].
#[derive(Debug)]
struct Plan {
    base: NodeId,
    missing: Vec<String>,
    leaf: Leaf,
}

fn plan(tree: &Tree, start: NodeId, path: &str, mode: Mode) -> Result<Plan> {
    if path.is_empty() {
        return Err(FsError::InvalidArgument("empty path".into()));
    }

    let mut cursor = if utils::is_absolute(path) {
        tree.root()
    } else {
        start
    };
    let mut missing: Vec<String> = Vec::new();
    let mut segments = utils::segments(path).peekable();

    while let Some(segment) = segments.next() {
        let is_last = segments.peek().is_none();
        trace!(segment, is_last, ?mode, "resolving");
        match segment {
            "." => {}
            ".." => {
                if missing.pop().is_none() {
                    if let Some(parent) = tree.parent(cursor) {
                        cursor = parent;
                    }
                }
            }
            name if !missing.is_empty() => {
                // Below a directory that is still to be created: nothing can exist here.
                if is_last {
                    return Ok(Plan {
                        base: cursor,
                        missing,
                        leaf: Leaf::Vacant(name.to_string()),
                    });
                }
                missing.push(name.to_string());
            }
            name => match tree.child(cursor, name) {
                Some(child) if is_last => {
                    return Ok(Plan {
                        base: cursor,
                        missing,
                        leaf: Leaf::Found(child),
                    });
                }
                Some(child) if tree.is_dir(child) => cursor = child,
                Some(child) => return Err(FsError::NotADirectory(tree.path_of(child))),
                None if is_last && mode != Mode::Lookup => {
                    return Ok(Plan {
                        base: cursor,
                        missing,
                        leaf: Leaf::Vacant(name.to_string()),
                    });
                }
                None if !is_last && mode == Mode::CreateParents => {
                    missing.push(name.to_string());
                }
                None => return Err(FsError::NotFound(path.to_string())),
            },
        }
    }

    Ok(Plan {
        base: cursor,
        missing,
        leaf: Leaf::Cursor,
    })
}

/// Resolves `path` to an existing entry.
pub(crate) fn lookup(tree: &Tree, start: NodeId, path: &str) -> Result<NodeId> {
    let plan = plan(tree, start, path, Mode::Lookup)?;
    match plan.leaf {
        Leaf::Found(id) => Ok(id),
        Leaf::Cursor => Ok(plan.base),
        Leaf::Vacant(_) => Err(FsError::NotFound(path.to_string())),
    }
}

/// Resolves `path` to an existing entry or to a free name in an existing directory.
pub(crate) fn locate(tree: &Tree, start: NodeId, path: &str) -> Result<Resolution> {
    let plan = plan(tree, start, path, Mode::Create)?;
    debug_assert!(plan.missing.is_empty());
    Ok(match plan.leaf {
        Leaf::Found(id) => Resolution::Existing(id),
        Leaf::Cursor => Resolution::Existing(plan.base),
        Leaf::Vacant(name) => Resolution::Vacant {
            parent: plan.base,
            name,
        },
    })
}

/// Same as [`locate`], but missing intermediate directories are created.
///
/// Nothing is created unless the whole path resolves.
pub(crate) fn locate_or_build(tree: &mut Tree, start: NodeId, path: &str) -> Result<Resolution> {
    let plan = plan(tree, start, path, Mode::CreateParents)?;
    let mut parent = plan.base;
    for name in plan.missing {
        trace!(name = %name, "creating intermediate directory");
        parent = tree.insert(parent, Entry::new(name, EntryType::Directory));
    }
    Ok(match plan.leaf {
        Leaf::Found(id) => Resolution::Existing(id),
        Leaf::Cursor => Resolution::Existing(parent),
        Leaf::Vacant(name) => Resolution::Vacant { parent, name },
    })
}
