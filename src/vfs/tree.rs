//! Arena that owns every entry of the file system and performs the structural edits.
//!
//! Entries refer to each other through [`NodeId`] indices only, so the `parent` link never
//! participates in ownership. Freed slots are recycled through a free list.

use super::entry::{Entry, EntryType, NodeId};

pub(crate) const ROOT_NAME: &str = "/";

#[derive(Debug)]
pub(crate) struct Tree {
    slots: Vec<Option<Entry>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Tree {
    /// A tree holding only the root directory.
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Entry::new(ROOT_NAME, EntryType::Directory))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the live entry behind `id`.
    ///
    /// Ids handed out by the tree stay valid until `destroy`, and no caller keeps one past
    /// that point, so a missing slot is a bug in this module.
    pub fn get(&self, id: NodeId) -> &Entry {
        self.slots[id.0].as_ref().unwrap() // safe unwrap()
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Entry {
        self.slots[id.0].as_mut().unwrap() // safe unwrap()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).children()
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        self.get(id).is_dir()
    }

    /// Looks up the child of `dir` called `name`.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.children(dir)
            .iter()
            .copied()
            .find(|&child| self.get(child).name() == name)
    }

    fn alloc(&mut self, entry: Entry) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(entry);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(entry));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Creates a new entry and appends it to the children of `parent`.
    /// The caller has checked that `parent` is a directory without a child of that name.
    pub fn insert(&mut self, parent: NodeId, entry: Entry) -> NodeId {
        debug_assert!(self.is_dir(parent));
        debug_assert!(self.child(parent, entry.name()).is_none());
        let id = self.alloc(entry);
        self.attach(parent, id);
        id
    }

    /// Appends the detached node `id` to `parent`.
    pub fn attach(&mut self, parent: NodeId, id: NodeId) {
        debug_assert!(self.parent(id).is_none());
        self.get_mut(id).set_parent(Some(parent));
        self.get_mut(parent).children_mut().push(id);
    }

    /// Unlinks `id` from its parent. The subtree under `id` stays intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.get_mut(parent).children_mut().retain(|&child| child != id);
            self.get_mut(id).set_parent(None);
        }
    }

    /// Detaches `id` and releases it together with its whole subtree.
    pub fn destroy(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.slots[current.0].take() {
                stack.extend_from_slice(entry.children());
                self.free.push(current.0);
            }
        }
    }

    /// Builds a detached deep copy of the subtree under `id`.
    ///
    /// Every copied entry gets a new id, fresh timestamps and its own content buffer. The
    /// source subtree is read completely before any copy is attached anywhere.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let top = self.get(id).duplicate();
        let copy = self.alloc(top);
        let mut stack = vec![(id, copy)];
        while let Some((source, target)) = stack.pop() {
            let children = self.children(source).to_vec();
            for child in children {
                let duplicate = self.get(child).duplicate();
                let child_copy = self.alloc(duplicate);
                self.attach(target, child_copy);
                stack.push((child, child_copy));
            }
        }
        copy
    }

    /// Checks whether `ancestor` lies on the parent chain of `id` (or is `id` itself).
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Absolute path of `id`, built by following parent links up to the root.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            names.push(self.get(current).name());
            current = parent;
        }
        if names.is_empty() {
            return ROOT_NAME.to_string();
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// Pre-order walk of the subtree under `start`, excluding `start` itself.
    /// Children are visited in insertion order.
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(start).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Absolute paths of the subtree under `start`, in the same order as [`descendants`].
    ///
    /// Each child's path is built from its parent's, so the walk never climbs back to the
    /// root.
    ///
    /// [`descendants`]: Tree::descendants
    pub fn descendant_paths(&self, start: NodeId) -> Vec<String> {
        let mut prefix = self.path_of(start);
        if prefix != ROOT_NAME {
            prefix.push('/');
        }
        let mut stack: Vec<(NodeId, String)> = self
            .children(start)
            .iter()
            .rev()
            .map(|&id| (id, format!("{prefix}{}", self.get(id).name())))
            .collect();

        let mut paths = Vec::new();
        while let Some((id, path)) = stack.pop() {
            stack.extend(
                self.children(id)
                    .iter()
                    .rev()
                    .map(|&child| (child, format!("{path}/{}", self.get(child).name()))),
            );
            paths.push(path);
        }
        paths
    }

    /// Removes every entry except the root.
    pub fn clear(&mut self) {
        *self = Tree::new();
    }
}

pub(crate) struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
