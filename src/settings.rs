use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Legacy database image. Only its presence is checked.
    pub source_path: PathBuf,
    /// Directory receiving the query file, the JSON export and the import script.
    pub output_dir: PathBuf,
}

/// Trading service the generated script talks to.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub portfolio_type: String,
}

fn defaults() -> Result<Config, ConfigError> {
    let mut s = Config::new();
    s.set_default("app.source_path", "/tmp/original_tradedb.mv.db")?;
    s.set_default("app.output_dir", ".")?;
    s.set_default("api.base_url", "http://localhost:8081")?;
    s.set_default("api.username", "kj")?;
    s.set_default("api.password", "password")?;
    s.set_default("api.portfolio_type", "MARGIN")?;
    Ok(s)
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut s = defaults()?;
        s.merge(Environment::new().separator("__"))?;
        s.try_into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_target_local_margin_portfolio() {
        let settings: Settings = defaults().unwrap().try_into().unwrap();
        assert_eq!(
            settings.app.source_path,
            PathBuf::from("/tmp/original_tradedb.mv.db")
        );
        assert_eq!(settings.app.output_dir, PathBuf::from("."));
        assert_eq!(settings.api.base_url, "http://localhost:8081");
        assert_eq!(settings.api.username, "kj");
        assert_eq!(settings.api.password, "password");
        assert_eq!(settings.api.portfolio_type, "MARGIN");
    }

    #[test]
    fn environment_overrides_defaults() {
        std::env::set_var("API__BASE_URL", "http://trading.local:9000");
        let settings = Settings::new();
        std::env::remove_var("API__BASE_URL");
        let settings = settings.unwrap();
        assert_eq!(settings.api.base_url, "http://trading.local:9000");
        assert_eq!(settings.api.username, "kj");
    }
}
