//! The JNI calls we make here are not part of a Java native method
//! implementation, so we can't assume there's a JNI local frame that will
//! unwind and free local references, and we also can't leave exceptions to
//! get thrown when returning to Java.
//!
//! These helpers attach to the VM, run inside a local frame, and check +
//! clear exceptions, mapping them into Rust errors.

use std::path::PathBuf;

use jni::{
    objects::{JObject, JString, JValue},
    JNIEnv, JavaVM,
};

use crate::{
    error::{InternalError, InternalResult},
    CatalogConfig, LaunchDescriptor, LaunchError,
};

/// Use with `.map_err()` to map `jni::errors::Error::JavaException` into a
/// richer error based on the actual contents of the `JThrowable`
///
/// This will also clear the exception
pub(crate) fn clear_and_map_exception_to_err(
    env: &mut JNIEnv<'_>,
    err: jni::errors::Error,
) -> InternalError {
    if matches!(err, jni::errors::Error::JavaException) {
        let result = env.with_local_frame::<_, _, InternalError>(5, |env| {
            let e = env.exception_occurred()?;
            env.exception_clear()?;
            if e.is_null() {
                return Ok("exception vanished before it could be read".to_owned());
            }

            let msg = env
                .call_method(&e, "getMessage", "()Ljava/lang/String;", &[])?
                .l()?;
            if msg.is_null() {
                let class = env.get_object_class(&e)?;
                let name = env
                    .call_method(&class, "getName", "()Ljava/lang/String;", &[])?
                    .l()?;
                let name: String = env.get_string(&JString::from(name))?.into();
                return Ok(name);
            }
            let msg: String = env.get_string(&JString::from(msg))?.into();
            Ok(msg)
        });

        match result {
            Ok(msg) => InternalError::JniException(msg),
            Err(err) => InternalError::JniException(format!(
                "UNKNOWN (Failed to query JThrowable: {err:?})"
            )),
        }
    } else {
        err.into()
    }
}

/// Runs `f` with an env attached to the current thread and a handle on the
/// current activity (as registered with `ndk-context`)
pub(crate) fn with_activity_env<T>(
    f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<T>,
) -> InternalResult<T> {
    let cx = ndk_context::android_context();
    let vm = unsafe { JavaVM::from_raw(cx.vm().cast())? };
    let mut env = vm.attach_current_thread()?;
    let activity = unsafe { JObject::from_raw(cx.context().cast()) };

    let result = env.with_local_frame(10, |env| f(env, &activity));
    result.map_err(|err| clear_and_map_exception_to_err(&mut env, err))
}

/// Queries `Environment.getExternalStorageDirectory()`
///
/// Returns `None` if external storage isn't currently mounted.
pub fn external_storage_directory() -> Result<Option<PathBuf>, LaunchError> {
    let path = with_activity_env(|env, _activity| {
        let dir = env
            .call_static_method(
                "android/os/Environment",
                "getExternalStorageDirectory",
                "()Ljava/io/File;",
                &[],
            )?
            .l()?;
        if dir.is_null() {
            return Ok(None);
        }
        let path = env
            .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])?
            .l()?;
        let path: String = env.get_string(&JString::from(path))?.into();
        Ok(Some(PathBuf::from(path)))
    })?;
    Ok(path)
}

/// Reads the descriptor a viewer session was started with from the current
/// activity's Intent
///
/// A missing model extra reads as an empty reference and a missing asset
/// extra as `false`.
pub fn launch_descriptor_from_intent(config: &CatalogConfig) -> Result<LaunchDescriptor, LaunchError> {
    let descriptor = with_activity_env(|env, activity| {
        let intent = env
            .call_method(activity, "getIntent", "()Landroid/content/Intent;", &[])?
            .l()?;
        if intent.is_null() {
            return Ok(LaunchDescriptor::new("", false));
        }

        let key = env.new_string(config.model_extra())?;
        let model = env
            .call_method(
                &intent,
                "getStringExtra",
                "(Ljava/lang/String;)Ljava/lang/String;",
                &[JValue::Object(&key)],
            )?
            .l()?;
        let model: String = if model.is_null() {
            String::new()
        } else {
            env.get_string(&JString::from(model))?.into()
        };

        let key = env.new_string(config.asset_extra())?;
        let is_asset = env
            .call_method(
                &intent,
                "getBooleanExtra",
                "(Ljava/lang/String;Z)Z",
                &[JValue::Object(&key), JValue::Bool(jni::sys::JNI_FALSE)],
            )?
            .z()?;

        Ok(LaunchDescriptor::new(model, is_asset))
    })?;
    Ok(descriptor)
}
