use std::ffi::CString;
use std::io::{self, Read};

use ndk::asset::AssetManager;

use crate::AssetSource;

/// The asset directory packaged inside the application's .apk
///
/// Only regular files at the top level are listed; `AAssetDir` doesn't
/// report sub-directories.
pub struct ApkAssets {
    manager: AssetManager,
}

impl ApkAssets {
    pub fn new(manager: AssetManager) -> Self {
        Self { manager }
    }
}

fn c_name(name: &str) -> io::Result<CString> {
    CString::new(name).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
}

impl AssetSource for ApkAssets {
    fn list(&self) -> io::Result<Vec<String>> {
        let dir = self
            .manager
            .open_dir(&c_name("")?)
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "AAssetManager_openDir failed"))?;

        let mut names = Vec::new();
        for name in dir {
            match name.into_string() {
                Ok(name) => names.push(name),
                Err(err) => log::warn!("Skipping asset with non UTF-8 name: {err}"),
            }
        }
        Ok(names)
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let mut asset = self.manager.open(&c_name(name)?).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("Failed to open asset: {name}"))
        })?;

        let length = asset.length();
        let mut buffer = Vec::with_capacity(length);
        asset.read_to_end(&mut buffer)?;
        if buffer.len() != length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Partial read {} of {} bytes", buffer.len(), length),
            ));
        }
        Ok(buffer)
    }
}
