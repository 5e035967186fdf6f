use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{trace, warn};

use crate::error::CatalogError;
use crate::{AssetSource, CatalogConfig, CatalogEntry, LaunchDescriptor, Result};

/// Builds the list of models the user can pick from
///
/// Bundled assets come first, in the order the asset store reports them,
/// followed by everything in the writable directory in filesystem order.
/// Neither half is sorted.
///
/// The writable directory is created if it doesn't exist yet. Failing to
/// create it isn't an error, it's just treated as empty.
pub fn build_catalog<A: AssetSource + ?Sized>(
    config: &CatalogConfig,
    assets: &A,
) -> Result<Vec<CatalogEntry>> {
    let dir = absolute_dir(&config.writable_dir()).map_err(CatalogError::external)?;
    let external = if ensure_dir(&dir) {
        list_external(&dir)?
    } else {
        Vec::new()
    };
    let bundled = assets.list().map_err(CatalogError::bundled)?;

    let mut entries = Vec::with_capacity(bundled.len() + external.len());
    entries.extend(bundled.into_iter().map(CatalogEntry::bundled));
    // Joined onto an absolute dir, so every external path is absolute
    entries.extend(external.into_iter().filter_map(CatalogEntry::external));

    trace!("Built catalog of {} entries from {:?}", entries.len(), dir);
    Ok(entries)
}

/// Turns a picked entry into the payload for a viewer session
///
/// There's no check that `entry` came from the most recent catalog or that
/// the file still exists.
pub fn resolve_selection(entry: &CatalogEntry) -> LaunchDescriptor {
    LaunchDescriptor::new(entry.display_name(), entry.is_bundled())
}

fn absolute_dir(dir: &Path) -> io::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

fn ensure_dir(dir: &Path) -> bool {
    if dir.is_dir() {
        return true;
    }
    match fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(err) => {
            warn!("Failed to create model directory {:?}: {}", dir, err);
            false
        }
    }
}

fn list_external(dir: &Path) -> Result<Vec<String>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(CatalogError::external(err)),
    };

    let mut paths = Vec::new();
    for dir_entry in read_dir {
        let path = dir_entry.map_err(CatalogError::external)?.path();
        match path.into_os_string().into_string() {
            Ok(path) => paths.push(path),
            Err(path) => warn!("Skipping model with non UTF-8 path: {:?}", path),
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryAssets;

    struct BrokenAssets;

    impl AssetSource for BrokenAssets {
        fn list(&self) -> io::Result<Vec<String>> {
            Err(io::Error::new(io::ErrorKind::Other, "asset manager gone"))
        }

        fn read(&self, _name: &str) -> io::Result<Vec<u8>> {
            unreachable!()
        }
    }

    fn config_for(root: &Path) -> CatalogConfig {
        CatalogConfig::default().with_storage_root(root)
    }

    #[test]
    fn empty_sources_give_empty_catalog() {
        let root = tempfile::tempdir().unwrap();
        let catalog = build_catalog(&config_for(root.path()), &MemoryAssets::new()).unwrap();
        assert!(catalog.is_empty());
    }

    // a.obj, b.obj bundled plus <dir>/c.obj on disk, i.e. the
    // ["a.obj", "b.obj"] + ["/ext/SceneViwer/c.obj"] example with a real root
    #[test]
    fn bundled_entries_come_before_external() {
        let root = tempfile::tempdir().unwrap();
        let config = config_for(root.path());
        fs::create_dir_all(config.writable_dir()).unwrap();
        let external = config.writable_dir().join("c.obj");
        fs::write(&external, b"o").unwrap();

        let assets = MemoryAssets::new().with("a.obj", "a").with("b.obj", "b");
        let catalog = build_catalog(&config, &assets).unwrap();

        assert_eq!(
            catalog,
            vec![
                CatalogEntry::bundled("a.obj"),
                CatalogEntry::bundled("b.obj"),
                CatalogEntry::external(external.to_str().unwrap()).unwrap(),
            ]
        );
    }

    #[test]
    fn bundled_order_is_kept_as_reported() {
        let root = tempfile::tempdir().unwrap();
        let assets = MemoryAssets::new()
            .with("zz.dae", "")
            .with("aa.dae", "")
            .with("mm.dae", "");
        let catalog = build_catalog(&config_for(root.path()), &assets).unwrap();
        let names: Vec<_> = catalog.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["zz.dae", "aa.dae", "mm.dae"]);
    }

    #[test]
    fn external_entries_include_directories() {
        let root = tempfile::tempdir().unwrap();
        let config = config_for(root.path());
        let dir = config.writable_dir();
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("deep.obj"), b"").unwrap();
        fs::write(dir.join("top.obj"), b"").unwrap();

        let catalog = build_catalog(&config, &MemoryAssets::new()).unwrap();
        let mut names: Vec<_> = catalog.iter().map(|e| e.display_name().to_owned()).collect();
        names.sort();

        let mut expected = vec![
            dir.join("nested").to_str().unwrap().to_owned(),
            dir.join("top.obj").to_str().unwrap().to_owned(),
        ];
        expected.sort();
        assert_eq!(names, expected);
        assert!(catalog
            .iter()
            .all(|e| !e.is_bundled() && Path::new(e.display_name()).is_absolute()));
    }

    #[test]
    fn missing_dir_is_created_once() {
        let root = tempfile::tempdir().unwrap();
        let config = config_for(root.path());
        assert!(!config.writable_dir().exists());

        build_catalog(&config, &MemoryAssets::new()).unwrap();
        assert!(config.writable_dir().is_dir());

        build_catalog(&config, &MemoryAssets::new()).unwrap();
        assert!(config.writable_dir().is_dir());
    }

    #[test]
    fn uncreatable_dir_is_treated_as_empty() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        let config = CatalogConfig::default()
            .with_storage_root(&blocker)
            .with_model_dir("SceneViwer");

        let assets = MemoryAssets::new().with("a.obj", "");
        let catalog = build_catalog(&config, &assets).unwrap();
        assert_eq!(catalog, vec![CatalogEntry::bundled("a.obj")]);
    }

    #[test]
    fn unreadable_external_dir_is_an_enumeration_error() {
        let root = tempfile::tempdir().unwrap();
        let not_a_dir = root.path().join("SceneViwer");
        fs::write(&not_a_dir, b"").unwrap();

        let err = list_external(&not_a_dir).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Enumeration {
                source_kind: crate::Source::External,
                ..
            }
        ));
    }

    #[test]
    fn missing_external_dir_lists_nothing() {
        let root = tempfile::tempdir().unwrap();
        assert!(list_external(&root.path().join("gone")).unwrap().is_empty());
    }

    // Linux filesystems accept arbitrary bytes in names, others may refuse
    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_external_paths_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir().unwrap();
        let config = config_for(root.path());
        let dir = config.writable_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("ok.obj"), b"").unwrap();
        fs::write(dir.join(OsStr::from_bytes(b"m\xff.obj")), b"").unwrap();

        let assets = MemoryAssets::new().with("a.obj", "");
        let catalog = build_catalog(&config, &assets).unwrap();
        assert_eq!(
            catalog,
            vec![
                CatalogEntry::bundled("a.obj"),
                CatalogEntry::external(dir.join("ok.obj").to_str().unwrap()).unwrap(),
            ]
        );
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let root = tempfile::tempdir().unwrap();
        let config = config_for(root.path());
        fs::create_dir_all(config.writable_dir()).unwrap();
        for name in ["x.obj", "y.dae", "z.3ds"] {
            fs::write(config.writable_dir().join(name), b"").unwrap();
        }
        let assets = MemoryAssets::new().with("b.obj", "").with("a.obj", "");

        let first = build_catalog(&config, &assets).unwrap();
        let second = build_catalog(&config, &assets).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn asset_listing_failure_is_an_enumeration_error() {
        let root = tempfile::tempdir().unwrap();
        let err = build_catalog(&config_for(root.path()), &BrokenAssets).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Enumeration {
                source_kind: crate::Source::Bundled,
                ..
            }
        ));
    }

    #[test]
    fn selection_copies_name_and_provenance() {
        let bundled = resolve_selection(&CatalogEntry::bundled("a.obj"));
        assert_eq!(bundled, LaunchDescriptor::new("a.obj", true));

        let entry = CatalogEntry::external("/ext/SceneViwer/c.obj").unwrap();
        let external = resolve_selection(&entry);
        assert_eq!(external.model_reference(), "/ext/SceneViwer/c.obj");
        assert!(!external.is_asset());
    }

    #[test]
    #[allow(deprecated)]
    fn legacy_heuristic_matches_trusted_flag_for_well_formed_entries() {
        for entry in [
            CatalogEntry::bundled("a.obj"),
            CatalogEntry::external("/ext/SceneViwer/c.obj").unwrap(),
        ] {
            assert_eq!(
                LaunchDescriptor::from_display_name(entry.display_name()),
                resolve_selection(&entry)
            );
        }
    }
}
