use android_activity::input::{InputEvent, MotionAction};
use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};
use log::Level;
use log::{error, info, trace};
use std::time::Duration;

use model_catalog::{NativeLibraries, TRANSFORM_LIBRARIES};

/// Symbol exported by libtransform.so that runs the whole test
const TEST_MAIN: &str = "transform_test_main";

#[no_mangle]
fn android_main(app: AndroidApp) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_min_level(Level::Info)
            .with_tag("transform-test"),
    );

    let libraries = NativeLibraries::load(TRANSFORM_LIBRARIES)
        .unwrap_or_else(|err| panic!("Failed to initialize native libraries: {err}"));
    let test_main = match unsafe { libraries.entry_point("transform", TEST_MAIN) } {
        Ok(entry) => entry,
        Err(err) => panic!("{err}"),
    };

    let mut quit = false;
    let mut run_requested = false;

    while !quit {
        app.poll_events(Some(Duration::from_millis(500)) /* timeout */, |event| {
            match event {
                PollEvent::Wake => { trace!("Early wake up"); },
                PollEvent::Timeout => { trace!("Timed out"); },
                PollEvent::Main(main_event) => {
                    info!("Main event: {:?}", main_event);
                    match main_event {
                        MainEvent::InputAvailable => match app.input_events_iter() {
                            Ok(mut iter) => while iter.next(|event| match event {
                                InputEvent::MotionEvent(motion) if motion.action() == MotionAction::Up => {
                                    run_requested = true;
                                    InputStatus::Handled
                                }
                                _ => InputStatus::Unhandled,
                            }) {},
                            Err(err) => error!("Failed to read input events: {err:?}"),
                        },
                        MainEvent::Destroy => { quit = true },
                        _ => { /* ... */}
                    }
                },
                _ => {}
            }
        });

        // Any tap is the "start test" button
        if std::mem::take(&mut run_requested) {
            test_main.invoke();
            info!("{} finished", test_main.name());
        }
    }
}
