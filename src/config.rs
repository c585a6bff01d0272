use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub monitor: MonitorSettings,
    pub topology: TopologyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
    /// Aggregate per delivery service in the handler, before results are queued.
    #[serde(default = "default_precompute")]
    pub precompute: bool,
    /// Bounded handler -> consumer queue; a full queue holds up ingestion.
    pub result_channel_capacity: usize,
    /// Entries retained per stat, and snapshots retained per cache.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// How often to log consumer counters at INFO level.
    pub stats_log_interval_secs: u64,
}

fn default_precompute() -> bool {
    true
}

fn default_max_history() -> usize {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopologyConfig {
    /// JSON topology file (cachegroups, types, delivery service domains, monitor config).
    pub path: String,
    pub reload_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.monitor.result_channel_capacity > 0,
            "monitor.result_channel_capacity must be > 0, got {}",
            self.monitor.result_channel_capacity
        );
        anyhow::ensure!(
            self.monitor.max_history > 0,
            "monitor.max_history must be > 0, got {}",
            self.monitor.max_history
        );
        anyhow::ensure!(
            self.monitor.stats_log_interval_secs > 0,
            "monitor.stats_log_interval_secs must be > 0, got {}",
            self.monitor.stats_log_interval_secs
        );
        anyhow::ensure!(
            !self.topology.path.is_empty(),
            "topology.path must be non-empty"
        );
        anyhow::ensure!(
            self.topology.reload_interval_secs > 0,
            "topology.reload_interval_secs must be > 0, got {}",
            self.topology.reload_interval_secs
        );
        Ok(())
    }
}
