use std::time::SystemTime;

/// Index of a node inside the tree arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// A single file or directory stored in the tree.
///
/// `children` is meaningful for directories only and `content` for files only; the
/// mutators below keep the other one empty. `parent` is a plain index used for upward
/// navigation, the arena owns every node.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    name: String,
    entry_type: EntryType,
    content: Vec<u8>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    created_at: SystemTime,
    modified_at: SystemTime,
}

impl Entry {
    pub fn new(name: impl Into<String>, entry_type: EntryType) -> Entry {
        let now = SystemTime::now();
        Entry {
            name: name.into(),
            entry_type,
            content: Vec::new(),
            children: Vec::new(),
            parent: None,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn set_content(&mut self, content: &[u8]) {
        debug_assert!(self.is_file());
        self.content = content.to_vec();
        self.touch();
    }

    pub fn append_content(&mut self, content: &[u8]) {
        debug_assert!(self.is_file());
        self.content.extend_from_slice(content);
        self.touch();
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        debug_assert!(self.is_dir());
        &mut self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn modified_at(&self) -> SystemTime {
        self.modified_at
    }

    /// Refreshes the modification time.
    pub fn touch(&mut self) {
        self.modified_at = SystemTime::now();
    }

    /// A detached copy with the same name, kind and content but fresh timestamps.
    /// Children are not copied; the tree rebuilds them.
    pub fn duplicate(&self) -> Entry {
        let mut entry = Entry::new(self.name.clone(), self.entry_type);
        entry.content = self.content.clone();
        entry
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            entry_type: self.entry_type(),
            size: self.size(),
            created_at: self.created_at(),
            modified_at: self.modified_at(),
        }
    }
}

/// Snapshot of an entry's attributes returned by `stat`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub entry_type: EntryType,
    pub size: u64,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}
