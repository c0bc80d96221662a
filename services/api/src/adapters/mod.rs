pub mod blob_dir;
pub mod blob_memory;
pub mod essay_files;

pub use blob_dir::DirBlobStore;
pub use blob_memory::MemoryBlobStore;
pub use essay_files::load_catalog;
