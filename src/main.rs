pub mod models {
    pub mod ecobee;
}

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod units;

use crate::client::{Credentials, EcobeeClient};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use log::{error, info};
use std::io::BufRead;

pub fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env()?;
    info!("Config loaded (base_url={})", cfg.base_url);

    // 2) Init Ecobee client. Login and device discovery happen lazily on the
    // first command, so a bad password surfaces as a spoken apology rather
    // than a startup failure.
    let client = EcobeeClient::with_base_url(
        Credentials {
            username: cfg.username,
            password: cfg.password,
        },
        &cfg.base_url,
    );

    // 3) Dispatch transcribed lines from stdin until EOF
    let mut dispatcher =
        Dispatcher::new(client).map_err(|e| format!("compiling command patterns failed: {}", e))?;
    info!("Listening for commands on stdin");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| format!("reading stdin failed: {}", e))?;
        if let Some(reply) = dispatcher.handle(&line) {
            println!("{}", reply);
        }
    }

    Ok(())
}

fn main() {
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    info!(
        "ecobee-voice {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
