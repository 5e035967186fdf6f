use std::fmt;

use log::info;

use crate::{LaunchDescriptor, LaunchError};

/// Starts a viewer session for a resolved selection
///
/// Any `Fn(&LaunchDescriptor) -> Result<(), LaunchError>` closure is a
/// launcher, which is how selection handling gets bound to a view without
/// a handler type per screen. On Android, `android::ActivityLauncher`
/// starts the viewer activity through an Intent.
pub trait SessionLauncher {
    fn launch(&self, descriptor: &LaunchDescriptor) -> Result<(), LaunchError>;
}

impl<F> SessionLauncher for F
where
    F: Fn(&LaunchDescriptor) -> Result<(), LaunchError>,
{
    fn launch(&self, descriptor: &LaunchDescriptor) -> Result<(), LaunchError> {
        self(descriptor)
    }
}

/// A parameterless native entry point, such as a test's `testMain()`
///
/// Used as a [`SessionLauncher`] it drops the descriptor: the session it
/// starts doesn't take a model.
#[derive(Clone)]
pub struct EntryPoint {
    name: String,
    func: unsafe extern "C" fn(),
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint").field("name", &self.name).finish()
    }
}

impl EntryPoint {
    pub(crate) fn new(name: String, func: unsafe extern "C" fn()) -> Self {
        Self { name, func }
    }

    /// Wraps a function that's linked into this binary
    pub fn from_fn(name: impl Into<String>, func: extern "C" fn()) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self) {
        info!("Invoking native entry point {}", self.name);
        // Safety: the caller of NativeLibraries::entry_point() vouched for
        // the signature when this was resolved
        unsafe { (self.func)() }
    }
}

impl SessionLauncher for EntryPoint {
    fn launch(&self, _descriptor: &LaunchDescriptor) -> Result<(), LaunchError> {
        self.invoke();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn count_call() {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn closure_receives_descriptor() {
        let seen = RefCell::new(Vec::new());
        let launcher = |desc: &LaunchDescriptor| -> Result<(), LaunchError> {
            seen.borrow_mut().push(desc.clone());
            Ok(())
        };
        launcher
            .launch(&LaunchDescriptor::new("duck.dae", true))
            .unwrap();
        assert_eq!(*seen.borrow(), vec![LaunchDescriptor::new("duck.dae", true)]);
    }

    #[test]
    fn entry_point_ignores_payload() {
        let entry = EntryPoint::from_fn("testMain", count_call);
        let before = CALLS.load(Ordering::SeqCst);
        entry.launch(&LaunchDescriptor::new("ignored", false)).unwrap();
        entry.invoke();
        assert_eq!(CALLS.load(Ordering::SeqCst), before + 2);
        assert_eq!(format!("{entry:?}"), "EntryPoint { name: \"testMain\" }");
    }
}
