//! Ordered, once-per-process loading of the native engine libraries
//!
//! This replaces the static `System.loadLibrary()` blocks of a Java
//! launcher with an explicit step that the app entry point runs first and
//! whose failure it can see. Libraries are never unloaded.

use std::ffi::{c_void, CStr, CString};
use std::ptr::NonNull;

use bitflags::bitflags;
use log::{error, info};

use crate::{EntryPoint, LibraryError};

/// Libraries for the scene viewer, dependencies first
pub const SVIEWER_LIBRARIES: &[&str] = &["gnustl_shared", "aol", "are", "sviewer"];

/// Libraries for the scene viewer builds that import models through assimp
pub const ASSIMP_VIEWER_LIBRARIES: &[&str] = &["gnustl_shared", "aol", "are", "assimp", "sviewer"];

/// Library exposing the transform test entry point
pub const TRANSFORM_LIBRARIES: &[&str] = &["transform"];

bitflags! {
    /// Mode passed to `dlopen()`
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct OpenFlags: i32 {
        const LAZY = libc::RTLD_LAZY;
        const NOW = libc::RTLD_NOW;
        const GLOBAL = libc::RTLD_GLOBAL;
    }
}

impl Default for OpenFlags {
    /// Resolve everything up front and make symbols visible to libraries
    /// loaded later, so dependents can link against earlier loads.
    fn default() -> Self {
        OpenFlags::NOW | OpenFlags::GLOBAL
    }
}

#[derive(Debug)]
struct Handle {
    name: String,
    ptr: NonNull<c_void>,
}

/// Handles for every library loaded so far, in load order
#[derive(Debug)]
pub struct NativeLibraries {
    handles: Vec<Handle>,
}

// The handles are only read after loading and dlsym() is thread safe
unsafe impl Send for NativeLibraries {}
unsafe impl Sync for NativeLibraries {}

impl NativeLibraries {
    /// Loads `lib<name>.so` for each name, in order, with [`OpenFlags::default()`]
    ///
    /// Loading stops at the first library that fails; its name and the
    /// `dlerror()` message are returned. Libraries loaded before the failure
    /// stay loaded.
    pub fn load(names: &[&str]) -> Result<Self, LibraryError> {
        Self::load_with_flags(names, OpenFlags::default())
    }

    pub fn load_with_flags(names: &[&str], flags: OpenFlags) -> Result<Self, LibraryError> {
        let mut handles = Vec::with_capacity(names.len());
        for name in names {
            let ptr = open(name, flags).map_err(|reason| {
                error!("Failed to load native library {name}: {reason}");
                LibraryError::Load {
                    name: name.to_string(),
                    reason,
                }
            })?;
            info!("Loaded native library {name}");
            handles.push(Handle {
                name: name.to_string(),
                ptr,
            });
        }
        Ok(Self { handles })
    }

    /// Names of the loaded libraries in load order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(|h| h.name.as_str())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.handles.iter().any(|h| h.name == name)
    }

    /// Looks up the raw address of `symbol` exported by `library`
    ///
    /// # Safety
    ///
    /// The caller decides what the address points at; nothing about its
    /// type is checked.
    pub unsafe fn symbol(&self, library: &str, symbol: &str) -> Result<NonNull<c_void>, LibraryError> {
        let handle = self
            .handles
            .iter()
            .find(|h| h.name == library)
            .ok_or_else(|| LibraryError::NotLoaded {
                name: library.to_owned(),
            })?;

        let symbol_error = |reason: String| LibraryError::Symbol {
            name: library.to_owned(),
            symbol: symbol.to_owned(),
            reason,
        };
        let c_symbol = CString::new(symbol).map_err(|err| symbol_error(err.to_string()))?;

        // Drop any stale message so last_error() reports this lookup
        libc::dlerror();
        let ptr = libc::dlsym(handle.ptr.as_ptr(), c_symbol.as_ptr());
        NonNull::new(ptr).ok_or_else(|| symbol_error(last_error()))
    }

    /// Looks up a parameterless `extern "C"` function exported by `library`
    ///
    /// # Safety
    ///
    /// The symbol must really be a function taking no arguments and
    /// returning nothing, and it must be safe to call from the thread that
    /// ends up invoking the [`EntryPoint`].
    pub unsafe fn entry_point(&self, library: &str, symbol: &str) -> Result<EntryPoint, LibraryError> {
        let ptr = self.symbol(library, symbol)?;
        let func: unsafe extern "C" fn() = std::mem::transmute(ptr.as_ptr());
        Ok(EntryPoint::new(format!("{library}:{symbol}"), func))
    }
}

fn library_file_name(name: &str) -> String {
    format!("lib{name}.so")
}

fn open(name: &str, flags: OpenFlags) -> Result<NonNull<c_void>, String> {
    let file_name = CString::new(library_file_name(name)).map_err(|err| err.to_string())?;
    let ptr = unsafe { libc::dlopen(file_name.as_ptr(), flags.bits()) };
    NonNull::new(ptr).ok_or_else(last_error)
}

fn last_error() -> String {
    unsafe {
        let msg = libc::dlerror();
        if msg.is_null() {
            "unknown dynamic loader error".to_owned()
        } else {
            CStr::from_ptr(msg).to_string_lossy().into_owned()
        }
    }
}
