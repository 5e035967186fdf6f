use std::path::{Path, PathBuf};

/// Where the writable model directory lives when nothing better is known
pub const DEFAULT_STORAGE_ROOT: &str = "/sdcard";

/// Directory under external storage that holds user-supplied models
pub const DEFAULT_MODEL_DIR: &str = "SceneViwer";

/// Intent extra carrying [`LaunchDescriptor::model_reference`](crate::LaunchDescriptor::model_reference)
pub const MODEL_EXTRA: &str = "modelName";

/// Intent extra carrying [`LaunchDescriptor::is_asset`](crate::LaunchDescriptor::is_asset)
pub const ASSET_EXTRA: &str = "isAsset";

/// Activity class that hosts the native viewer session
pub const VIEWER_ACTIVITY: &str = "android.app.NativeActivity";

/// System property that can point the writable directory somewhere else
/// (relative to the storage root) without rebuilding the app
pub const MODEL_DIR_PROPERTY: &str = "debug.sviewer.model_dir";

/// Locations and intent keys used when building and handing off a catalog
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CatalogConfig {
    storage_root: PathBuf,
    model_dir: PathBuf,
    model_extra: String,
    asset_extra: String,
    viewer_activity: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            model_extra: MODEL_EXTRA.to_owned(),
            asset_extra: ASSET_EXTRA.to_owned(),
            viewer_activity: VIEWER_ACTIVITY.to_owned(),
        }
    }
}

impl CatalogConfig {
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    pub fn with_viewer_activity(mut self, class_name: impl Into<String>) -> Self {
        self.viewer_activity = class_name.into();
        self
    }

    pub fn with_extras(mut self, model: impl Into<String>, asset: impl Into<String>) -> Self {
        self.model_extra = model.into();
        self.asset_extra = asset.into();
        self
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// The writable directory scanned for user models.
    ///
    /// If `model_dir` is itself absolute it's used as-is, otherwise it's
    /// resolved against the storage root.
    pub fn writable_dir(&self) -> PathBuf {
        self.storage_root.join(&self.model_dir)
    }

    pub fn model_extra(&self) -> &str {
        &self.model_extra
    }

    pub fn asset_extra(&self) -> &str {
        &self.asset_extra
    }

    pub fn viewer_activity(&self) -> &str {
        &self.viewer_activity
    }

    /// Applies overrides from Android system properties
    ///
    /// Currently only [`MODEL_DIR_PROPERTY`] is consulted; an unset or empty
    /// property leaves the configuration untouched.
    #[cfg(target_os = "android")]
    pub fn with_system_properties(self) -> Self {
        let mut prop = android_properties::getprop(MODEL_DIR_PROPERTY);
        match prop.value() {
            Some(dir) if !dir.is_empty() => {
                log::info!("Model directory overridden by {MODEL_DIR_PROPERTY}: {dir}");
                self.with_model_dir(dir)
            }
            _ => self,
        }
    }

    /// Configuration rooted at the device's external storage directory
    ///
    /// Falls back to [`DEFAULT_STORAGE_ROOT`] if the directory can't be
    /// queried through JNI.
    #[cfg(target_os = "android")]
    pub fn for_current_activity() -> Self {
        let config = Self::default();
        let config = match crate::android::external_storage_directory() {
            Ok(Some(root)) => config.with_storage_root(root),
            Ok(None) => {
                log::warn!("External storage directory unavailable, using {DEFAULT_STORAGE_ROOT}");
                config
            }
            Err(err) => {
                log::warn!("Failed to query external storage directory: {err}");
                config
            }
        };
        config.with_system_properties()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_writable_dir_is_under_sdcard() {
        let config = CatalogConfig::default();
        assert_eq!(config.writable_dir(), PathBuf::from("/sdcard/SceneViwer"));
        assert_eq!(config.model_extra(), "modelName");
        assert_eq!(config.asset_extra(), "isAsset");
        assert_eq!(config.viewer_activity(), "android.app.NativeActivity");
    }

    #[test]
    fn absolute_model_dir_replaces_root() {
        let config = CatalogConfig::default()
            .with_storage_root("/ext")
            .with_model_dir("/data/local/tmp/models");
        assert_eq!(config.writable_dir(), PathBuf::from("/data/local/tmp/models"));
    }
}
