//! ballbox entry point
//!
//! Usage: `ballbox [settings.json]`

use std::env;
use std::process::ExitCode;

use ballbox::{Settings, Simulation};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match env::args().nth(1) {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::warn!("{} ({}), using defaults", e, path);
            Settings::default()
        }),
        None => Settings::default(),
    };

    log::info!("Starting with {:?}", settings);
    match Simulation::new().with_settings(settings).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
