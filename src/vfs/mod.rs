mod entry;
mod resolver;
mod tree;
mod tree_fs;

pub use entry::{EntryType, Metadata};
pub use tree_fs::TreeFS;
