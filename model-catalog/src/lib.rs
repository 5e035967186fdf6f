//! Model catalog and launch glue for the sviewer sample apps
//!
//! The launcher lists models from two places, the assets bundled in the
//! APK and a writable directory on external storage, and hands the one
//! the user picks to a native viewer session as a [`LaunchDescriptor`].
//!
//! ```no_run
//! use model_catalog::{CatalogConfig, CatalogView, LaunchDescriptor, LaunchError, MemoryAssets};
//!
//! let assets = MemoryAssets::new().with("duck.dae", "<COLLADA/>");
//! let launcher = |desc: &LaunchDescriptor| -> Result<(), LaunchError> {
//!     println!("viewing {}", desc.model_reference());
//!     Ok(())
//! };
//! let mut view = CatalogView::new(CatalogConfig::default(), assets, launcher);
//! view.open();
//! view.select(0).unwrap();
//! ```

use std::path::Path;

mod assets;
pub use assets::{AssetSource, MemoryAssets};

mod catalog;
pub use catalog::{build_catalog, resolve_selection};

mod config;
pub use config::*;

mod error;
pub use error::{CatalogError, LaunchError, LibraryError, ModelError, Result, SelectError, Source};

mod launch;
pub use launch::{EntryPoint, SessionLauncher};

mod library;
pub use library::{
    NativeLibraries, OpenFlags, ASSIMP_VIEWER_LIBRARIES, SVIEWER_LIBRARIES, TRANSFORM_LIBRARIES,
};

mod model;
pub use model::{read_model, read_requested_model};

mod view;
pub use view::CatalogView;

#[cfg(target_os = "android")]
pub mod android;

/// One selectable model source
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CatalogEntry {
    display_name: String,
    is_bundled: bool,
}

impl CatalogEntry {
    /// An entry for a top-level asset in the bundled store
    pub fn bundled(name: impl Into<String>) -> Self {
        Self {
            display_name: name.into(),
            is_bundled: true,
        }
    }

    /// An entry for a file (or directory) in the writable model directory
    ///
    /// Returns `None` unless `path` is absolute.
    pub fn external(path: impl Into<String>) -> Option<Self> {
        let display_name = path.into();
        if !Path::new(&display_name).is_absolute() {
            return None;
        }
        Some(Self {
            display_name,
            is_bundled: false,
        })
    }

    /// The bundled asset's relative name, or an absolute path
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_bundled(&self) -> bool {
        self.is_bundled
    }
}

/// What a viewer session needs to know to open a model
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LaunchDescriptor {
    model_reference: String,
    is_asset: bool,
}

impl LaunchDescriptor {
    pub fn new(model_reference: impl Into<String>, is_asset: bool) -> Self {
        Self {
            model_reference: model_reference.into(),
            is_asset,
        }
    }

    /// Infers provenance from the name alone: anything not starting with
    /// `/` is taken to be a bundled asset.
    ///
    /// This is how one of the old launchers decided `isAsset`. It ignores
    /// where the entry actually came from, so prefer
    /// [`resolve_selection`] which uses the flag recorded at build time.
    #[deprecated(note = "guesses provenance from a leading '/', use resolve_selection instead")]
    pub fn from_display_name(display_name: &str) -> Self {
        Self::new(display_name, !display_name.starts_with('/'))
    }

    pub fn model_reference(&self) -> &str {
        &self.model_reference
    }

    pub fn is_asset(&self) -> bool {
        self.is_asset
    }

    /// True when no model was requested, e.g. an activity started from the
    /// home screen rather than from the catalog
    pub fn is_empty(&self) -> bool {
        self.model_reference.is_empty()
    }
}

impl From<&CatalogEntry> for LaunchDescriptor {
    fn from(entry: &CatalogEntry) -> Self {
        resolve_selection(entry)
    }
}

#[test]
fn test_external_entries_must_be_absolute() {
    assert!(CatalogEntry::external("c.obj").is_none());
    assert!(CatalogEntry::external("SceneViwer/c.obj").is_none());

    let entry = CatalogEntry::external("/ext/SceneViwer/c.obj").unwrap();
    assert_eq!(entry.display_name(), "/ext/SceneViwer/c.obj");
    assert!(!entry.is_bundled());
}

#[test]
fn test_descriptor_without_model_is_empty() {
    assert!(LaunchDescriptor::new("", false).is_empty());
    assert!(!LaunchDescriptor::new("a.obj", true).is_empty());
}

#[test]
fn test_descriptor_is_send_sync() {
    fn needs_send_sync<T: Send + Sync>() {}
    needs_send_sync::<LaunchDescriptor>();
    needs_send_sync::<CatalogEntry>();
}
