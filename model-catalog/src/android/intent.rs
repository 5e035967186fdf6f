use jni::{
    errors::Error,
    objects::{JObject, JValue},
    JNIEnv,
};

use super::jni_utils::with_activity_env;
use crate::{CatalogConfig, LaunchDescriptor, LaunchError, SessionLauncher};

struct Inner<'a, 'env> {
    env: &'a mut JNIEnv<'env>,
    object: JObject<'env>,
}

/// A messaging object used to start another activity of this application
///
/// Errors are carried along the builder chain and surface from
/// [`Intent::start_activity()`].
#[must_use]
pub struct Intent<'a, 'env> {
    inner: Result<Inner<'a, 'env>, Error>,
}

impl<'a, 'env> Intent<'a, 'env> {
    fn from_fn(f: impl FnOnce() -> Result<Inner<'a, 'env>, Error>) -> Self {
        let inner = f();
        Self { inner }
    }

    /// An explicit intent for `class_name` (e.g. `android.app.NativeActivity`)
    /// in the package of `context`
    pub fn explicit(env: &'a mut JNIEnv<'env>, context: &JObject<'_>, class_name: &str) -> Self {
        Self::from_fn(|| {
            let intent = env.new_object("android/content/Intent", "()V", &[])?;
            let class_name = env.new_string(class_name)?;
            env.call_method(
                &intent,
                "setClassName",
                "(Landroid/content/Context;Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(context), JValue::Object(&class_name)],
            )?;

            Ok(Inner {
                env,
                object: intent,
            })
        })
    }

    /// Add a string extra to the intent
    pub fn with_extra(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.and_then(|inner| {
            let key = inner.env.new_string(key.as_ref())?;
            let value = inner.env.new_string(value.as_ref())?;

            inner.env.call_method(
                &inner.object,
                "putExtra",
                "(Ljava/lang/String;Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&key), JValue::Object(&value)],
            )?;

            Ok(inner)
        })
    }

    /// Add a boolean extra to the intent
    pub fn with_bool_extra(self, key: impl AsRef<str>, value: bool) -> Self {
        self.and_then(|inner| {
            let key = inner.env.new_string(key.as_ref())?;

            inner.env.call_method(
                &inner.object,
                "putExtra",
                "(Ljava/lang/String;Z)Landroid/content/Intent;",
                &[JValue::Object(&key), JValue::Bool(value as jni::sys::jboolean)],
            )?;

            Ok(inner)
        })
    }

    pub fn start_activity(self, activity: &JObject<'_>) -> Result<(), Error> {
        self.inner.and_then(|inner| {
            inner.env.call_method(
                activity,
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&inner.object)],
            )?;

            Ok(())
        })
    }

    fn and_then(mut self, f: impl FnOnce(Inner<'a, 'env>) -> Result<Inner<'a, 'env>, Error>) -> Self {
        self.inner = self.inner.and_then(f);
        self
    }
}

/// Starts the viewer activity with the descriptor's two fields as extras
#[derive(Clone, Debug)]
pub struct ActivityLauncher {
    config: CatalogConfig,
}

impl ActivityLauncher {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }
}

impl SessionLauncher for ActivityLauncher {
    fn launch(&self, descriptor: &LaunchDescriptor) -> Result<(), LaunchError> {
        with_activity_env(|env, activity| {
            Intent::explicit(env, activity, self.config.viewer_activity())
                .with_extra(self.config.model_extra(), descriptor.model_reference())
                .with_bool_extra(self.config.asset_extra(), descriptor.is_asset())
                .start_activity(activity)
        })?;
        Ok(())
    }
}
