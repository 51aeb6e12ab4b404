//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    if std::env::args().any(|arg| arg == "--shortcuts") {
        flipbook_app::ShortcutRegistry::print_all();
        return;
    }

    log::info!("Starting Flipbook");
    let config = flipbook_app::AppConfig::from_env();
    if let Err(e) = flipbook_app::App::run(config) {
        log::error!("Application error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
