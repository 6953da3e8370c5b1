use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const HUB_PORT: &str = "HUB_PORT";

const DEFAULT_PORT: u16 = 8000;

pub fn get_default_port() -> u16 {
    DEFAULT_PORT
}

const HUB_ADDR: &str = "HUB_ADDR";

const HUB_DATA_DIR: &str = "HUB_DATA_DIR";

/// Apply `HUB_ADDR` / `HUB_PORT` on top of a configured bind address
///
/// Unparsable values are ignored.
pub fn bind_addr_from_env(configured: SocketAddr) -> SocketAddr {
    let ip = std::env::var(HUB_ADDR)
        .ok()
        .and_then(|addr| addr.parse::<IpAddr>().ok())
        .unwrap_or(configured.ip());
    let port = std::env::var(HUB_PORT)
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(configured.port());

    SocketAddr::new(ip, port)
}

pub fn data_dir_from_env(configured: PathBuf) -> PathBuf {
    std::env::var(HUB_DATA_DIR).map_or(configured, PathBuf::from)
}
