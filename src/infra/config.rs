use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Directory holding `users.json` and `admin.json`
    pub data_dir: PathBuf,
    /// Wall-clock period of the automatic billing sweep
    pub sweep_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or("127.0.0.1:3001".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let cors_origin: HeaderValue = env::var("CORS_ORIGIN")
            .unwrap_or("http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");

        let data_dir: PathBuf = env::var("DATA_DIR").unwrap_or("data".to_string()).into();

        let sweep_interval_secs: u64 = env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or("3600".to_string())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid number");

        Self {
            bind_addr,
            cors_origin,
            data_dir,
            sweep_interval: Duration::from_secs(sweep_interval_secs),
        }
    }
}
