use super::fs_backend::FsBackend;
use super::item_store::ItemRepo;
use std::path::{Path, PathBuf};

pub type FileStore = ItemRepo<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        ItemRepo::with_backend(FsBackend::new(root))
    }

    pub fn with_file_ext(self, ext: &str) -> Self {
        ItemRepo::with_backend(self.backend.with_file_ext(ext))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }

    pub fn file_ext(&self) -> &str {
        self.backend.file_ext()
    }
}
