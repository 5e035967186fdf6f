use std::io;

/// A read-only store of packaged files, enumerable at the top level only
///
/// On Android this is the APK's asset directory (see
/// `android::ApkAssets`); [`MemoryAssets`] is an in-process store used on
/// the host.
pub trait AssetSource {
    /// Top-level names in the order the store reports them
    fn list(&self) -> io::Result<Vec<String>>;

    /// Reads a whole asset by its relative name
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn list(&self) -> io::Result<Vec<String>> {
        (**self).list()
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        (**self).read(name)
    }
}

impl<T: AssetSource + ?Sized> AssetSource for Box<T> {
    fn list(&self) -> io::Result<Vec<String>> {
        (**self).list()
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        (**self).read(name)
    }
}

/// Asset store held in memory, listed in insertion order
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    files: Vec<(String, Vec<u8>)>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an asset, keeping the position of an existing name
    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        let name = name.into();
        let contents = contents.into();
        match self.files.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, data)) => *data = contents,
            None => self.files.push((name, contents)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn list(&self) -> io::Result<Vec<String>> {
        Ok(self.files.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no asset {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_keeps_insertion_order() {
        let assets = MemoryAssets::new()
            .with("zebra.dae", "z")
            .with("apple.dae", "a")
            .with("zebra.dae", "zz");
        assert_eq!(assets.list().unwrap(), vec!["zebra.dae", "apple.dae"]);
        assert_eq!(assets.read("zebra.dae").unwrap(), b"zz");
    }

    #[test]
    fn missing_asset_is_not_found() {
        let err = MemoryAssets::new().read("nope.obj").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
