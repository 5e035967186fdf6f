use android_activity::input::{InputEvent, MotionAction};
use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};
use log::Level;
use log::{error, info, trace, warn};
use std::ffi::{c_char, CString};
use std::time::Duration;

use model_catalog::android::{launch_descriptor_from_intent, ActivityLauncher, ApkAssets};
use model_catalog::{
    read_requested_model, CatalogConfig, CatalogView, LaunchDescriptor, NativeLibraries,
    SVIEWER_LIBRARIES,
};

/// Maps a tap to a catalog row, treating the window as one evenly split list
fn row_at(y: f32, window_height: i32, rows: usize) -> Option<usize> {
    if rows == 0 || window_height <= 0 || y < 0.0 {
        return None;
    }
    let row = (y / window_height as f32 * rows as f32) as usize;
    (row < rows).then_some(row)
}

/// Exported by libsviewer.so: builds a scene from an in-memory model
type LoadScene = unsafe extern "C" fn(data: *const u8, len: usize, name: *const c_char) -> bool;

const LOAD_SCENE: &str = "sviewer_load_scene";

#[no_mangle]
fn android_main(app: AndroidApp) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_min_level(Level::Info)
            .with_tag("sviewer"),
    );

    // The engine can't run without these, there's nothing to fall back to
    let libraries = NativeLibraries::load(SVIEWER_LIBRARIES)
        .unwrap_or_else(|err| panic!("Failed to initialize native libraries: {err}"));

    let config = CatalogConfig::for_current_activity();
    let assets = ApkAssets::new(app.asset_manager());

    // The catalog starts this same activity again with the pick as extras
    let requested = launch_descriptor_from_intent(&config).unwrap_or_else(|err| {
        warn!("Failed to read launch intent: {err}");
        LaunchDescriptor::new("", false)
    });
    let scene = read_requested_model(&requested, &assets);
    match scene {
        Ok(Some(data)) => run_viewer(&app, &libraries, &requested, &data),
        Ok(None) => run_catalog(&app, config, assets),
        Err(err) => {
            error!("Can't view {}: {err}", requested.model_reference());
            run_catalog(&app, config, assets)
        }
    }
}

fn run_viewer(app: &AndroidApp, libraries: &NativeLibraries, desc: &LaunchDescriptor, data: &[u8]) {
    info!(
        "Viewing {} ({} bytes, asset: {})",
        desc.model_reference(),
        data.len(),
        desc.is_asset()
    );
    let load_scene: LoadScene = match unsafe { libraries.symbol("sviewer", LOAD_SCENE) } {
        Ok(ptr) => unsafe { std::mem::transmute(ptr.as_ptr()) },
        Err(err) => panic!("{err}"),
    };
    let name = CString::new(desc.model_reference()).unwrap_or_default();
    if !unsafe { load_scene(data.as_ptr(), data.len(), name.as_ptr()) } {
        error!("Engine rejected {}", desc.model_reference());
    }

    let mut quit = false;
    while !quit {
        app.poll_events(Some(Duration::from_millis(500)) /* timeout */, |event| {
            if let PollEvent::Main(MainEvent::Destroy) = event {
                quit = true;
            }
        });
    }
}

fn run_catalog(app: &AndroidApp, config: CatalogConfig, assets: ApkAssets) {
    info!("Scanning models in {:?}", config.writable_dir());
    let mut view = CatalogView::new(config.clone(), assets, ActivityLauncher::new(config));

    let mut quit = false;
    let mut selected: Option<usize> = None;

    while !quit {
        app.poll_events(Some(Duration::from_millis(500)) /* timeout */, |event| {
            match event {
                PollEvent::Wake => { trace!("Early wake up"); },
                PollEvent::Timeout => { trace!("Timed out"); },
                PollEvent::Main(main_event) => {
                    info!("Main event: {:?}", main_event);
                    match main_event {
                        MainEvent::InitWindow { .. } | MainEvent::Resume { .. } => {
                            for (i, entry) in view.open().iter().enumerate() {
                                info!(
                                    "[{i}] {} ({})",
                                    entry.display_name(),
                                    if entry.is_bundled() { "bundled" } else { "external" }
                                );
                            }
                            if let Some(err) = view.last_error() {
                                warn!("Model list unavailable: {err}");
                            }
                        },
                        MainEvent::InputAvailable => {
                            let height = app.native_window().map(|w| w.height()).unwrap_or(0);
                            let rows = view.entries().len();
                            match app.input_events_iter() {
                                Ok(mut iter) => loop {
                                    let read = iter.next(|event| {
                                        if let InputEvent::MotionEvent(motion) = event {
                                            if motion.action() == MotionAction::Up {
                                                let y = motion.pointer_at_index(0).y();
                                                selected = row_at(y, height, rows).or(selected);
                                                return InputStatus::Handled;
                                            }
                                        }
                                        InputStatus::Unhandled
                                    });
                                    if !read {
                                        break;
                                    }
                                },
                                Err(err) => error!("Failed to read input events: {err:?}"),
                            }
                        },
                        MainEvent::Destroy => { quit = true },
                        _ => { /* ... */}
                    }
                },
                _ => {}
            }
        });

        if let Some(index) = selected.take() {
            match view.select(index) {
                Ok(desc) => info!("Started viewer for {}", desc.model_reference()),
                Err(err) => error!("Failed to start viewer: {err}"),
            }
        }
    }
}
