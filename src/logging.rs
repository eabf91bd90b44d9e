//! Logger installation
//!
//! On Android records go to logcat under the `pixprep` tag; everywhere else
//! `env_logger` reads `RUST_LOG`, defaulting to `warn`.

pub const LOG_TAG: &str = "pixprep";

#[cfg(target_os = "android")]
pub fn init() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag(LOG_TAG),
    );
}

#[cfg(not(target_os = "android"))]
pub fn init() {
    // Ignore the error from a second initialization
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
}
