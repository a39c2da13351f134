// Infrastructure for Wirecraft: filesystem walking, the incremental
// extraction cache, and thread-pool setup.

pub mod concurrency;
pub mod extract_cache;
pub mod project_loader;

pub use extract_cache::{DeclarationCache, DiskDeclarationCache, FileStamp, MemoryDeclarationCache};
pub use project_loader::ProjectLoader;
