//! NDK and JNI backed pieces: the APK asset store, the external storage
//! root and the Intent that starts a viewer session

mod assets;
pub use assets::ApkAssets;

mod intent;
pub use intent::{ActivityLauncher, Intent};

mod jni_utils;
pub use jni_utils::{external_storage_directory, launch_descriptor_from_intent};
