use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Transport id of the moderator account that gets review pings.
    #[serde(default)]
    pub moderator_id: Option<i64>,
}

fn default_port() -> u16 {
    3005
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("UNICRUSH").separator("__"))
            .build()?;
        Ok(config.try_deserialize().unwrap_or_else(|_| Self {
            port: default_port(),
            moderator_id: None,
        }))
    }
}
