//! CLI smoke entry point.
//!
//! Verifies `later_core` linkage and that the configured store opens with
//! its schema applied.

use later_core::db::migrations::{current_user_version, latest_version};
use later_core::{AppContainer, CoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("later_core ping={}", later_core::ping());
    println!("later_core version={}", later_core::core_version());

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("later_core config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = later_core::init_logging(config.log_level, dir) {
            eprintln!("later_core logging error: {err}");
        }
    }

    let db_path = config.db_path.display().to_string();
    match AppContainer::open(config) {
        Ok(container) => {
            let schema = current_user_version(container.connection()).unwrap_or(0);
            println!(
                "later_core store={db_path} schema={schema}/{}",
                latest_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("later_core store={db_path} error={err}");
            ExitCode::FAILURE
        }
    }
}
