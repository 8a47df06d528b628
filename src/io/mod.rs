mod file_io;
mod storage_fs;
mod storage_memory;

pub use file_io::*;
pub use storage_fs::*;
pub use storage_memory::*;
