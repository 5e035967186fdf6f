use log::{error, info};

use crate::{
    build_catalog, resolve_selection, AssetSource, CatalogConfig, CatalogEntry, CatalogError,
    LaunchDescriptor, SelectError, SessionLauncher,
};

/// The model picker: a catalog rebuilt on every [`open()`](Self::open)
/// plus the launcher that a selection is handed to
pub struct CatalogView<A, L> {
    config: CatalogConfig,
    assets: A,
    launcher: L,
    entries: Vec<CatalogEntry>,
    last_error: Option<CatalogError>,
}

impl<A: AssetSource, L: SessionLauncher> CatalogView<A, L> {
    pub fn new(config: CatalogConfig, assets: A, launcher: L) -> Self {
        Self {
            config,
            assets,
            launcher,
            entries: Vec::new(),
            last_error: None,
        }
    }

    /// Rebuilds the catalog from scratch
    ///
    /// An enumeration failure doesn't propagate: it's logged, the view is
    /// left with an empty list and the error is kept for
    /// [`last_error()`](Self::last_error).
    pub fn open(&mut self) -> &[CatalogEntry] {
        match build_catalog(&self.config, &self.assets) {
            Ok(entries) => {
                info!("Catalog opened with {} models", entries.len());
                self.entries = entries;
                self.last_error = None;
            }
            Err(err) => {
                error!("Failed to build model catalog: {err:?}");
                self.entries.clear();
                self.last_error = Some(err);
            }
        }
        &self.entries
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Launches the entry at `index` and discards the catalog
    ///
    /// If the launcher fails the catalog is kept so the user can retry.
    pub fn select(&mut self, index: usize) -> Result<LaunchDescriptor, SelectError> {
        let entry = self.entries.get(index).ok_or(SelectError::OutOfRange {
            index,
            len: self.entries.len(),
        })?;
        let descriptor = resolve_selection(entry);
        self.launch(descriptor)
    }

    /// Launches any entry, including one from an earlier build
    pub fn select_entry(&mut self, entry: &CatalogEntry) -> Result<LaunchDescriptor, SelectError> {
        self.launch(resolve_selection(entry))
    }

    fn launch(&mut self, descriptor: LaunchDescriptor) -> Result<LaunchDescriptor, SelectError> {
        info!(
            "Launching viewer for {} (asset: {})",
            descriptor.model_reference(),
            descriptor.is_asset()
        );
        self.launcher.launch(&descriptor)?;
        self.entries.clear();
        Ok(descriptor)
    }
}
