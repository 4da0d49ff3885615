use anyhow::Result;

pub const DEFAULT_CROWD_WINDOW_SECONDS: i64 = 5 * 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_path: String,
    pub crowd_window_seconds: i64,
    pub create_default_sniffer: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let database_path = env_string("CROWD_DATABASE_PATH", "./crowd.db");
        if database_path.trim().is_empty() {
            anyhow::bail!("CROWD_DATABASE_PATH resolved to an empty value");
        }

        // A zero or negative window would make every sample trivially empty,
        // so the window is clamped to at least one second.
        let crowd_window_seconds = env_u64(
            "CROWD_WINDOW_SECONDS",
            DEFAULT_CROWD_WINDOW_SECONDS as u64,
        )
        .max(1) as i64;
        let create_default_sniffer = env_bool("CROWD_CREATE_DEFAULT_SNIFFER", true);

        Ok(Self {
            database_path,
            crowd_window_seconds,
            create_default_sniffer,
        })
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|value| value.trim().to_lowercase())
    {
        Some(value) if value == "1" || value == "true" || value == "yes" => true,
        Some(value) if value == "0" || value == "false" || value == "no" => false,
        _ => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
