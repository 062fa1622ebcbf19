//! Browser console logging (via `console_log`) and the panic hook.

use log::LevelFilter;

/// Install the console logger and panic hook once. No-op off wasm32.
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            if let Err(e) = console_log::init_with_level(log::Level::Warn) {
                web_sys::console::warn_1(&format!("logger already set: {e}").into());
            }
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Flowcanvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Change the console log level (`"trace"` … `"error"`, or `"off"`).
pub fn set_level(level: &str) -> bool {
    match level.parse::<LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}
