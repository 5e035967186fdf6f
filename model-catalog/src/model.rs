use std::fs;

use log::{error, trace};

use crate::{AssetSource, LaunchDescriptor, ModelError};

/// Reads the raw bytes of the model a viewer session was launched with
///
/// Bundled models are read through `assets` by their relative name,
/// everything else straight from the filesystem. The bytes aren't parsed.
pub fn read_model<A: AssetSource + ?Sized>(
    descriptor: &LaunchDescriptor,
    assets: &A,
) -> Result<Vec<u8>, ModelError> {
    let reference = descriptor.model_reference();
    let data = if descriptor.is_asset() {
        assets.read(reference)
    } else {
        fs::read(reference)
    }
    .map_err(|err| {
        error!("Failed to open model {reference}: {err}");
        ModelError::open(reference, err)
    })?;

    if data.is_empty() {
        return Err(ModelError::Empty {
            reference: reference.to_owned(),
        });
    }
    trace!("Read {} bytes for model {}", data.len(), reference);
    Ok(data)
}

/// The viewer-session side of a launch
///
/// An activity started without a model (from the home screen rather than
/// the catalog) gets `None` and should show the catalog instead.
pub fn read_requested_model<A: AssetSource + ?Sized>(
    descriptor: &LaunchDescriptor,
    assets: &A,
) -> Result<Option<Vec<u8>>, ModelError> {
    if descriptor.is_empty() {
        return Ok(None);
    }
    read_model(descriptor, assets).map(Some)
}
