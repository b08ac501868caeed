pub mod destinations;
pub mod walker;

pub use destinations::{FileDestination, MemoryDestination, OutputDestination, StdoutDestination};
pub use walker::{find_go_files, FileWalker};
