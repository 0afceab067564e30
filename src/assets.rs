use std::{fs, io, path::Path};

/// Reads shader assets into memory.
pub trait AssetReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Assets read straight from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssets;

impl AssetReader for FsAssets {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

impl<A: AssetReader + ?Sized> AssetReader for &A {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}
