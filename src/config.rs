use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub content_dir: String,
    pub public_rps: u32,
    pub session_ttl_minutes: i64,
    pub default_passing_score: f64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_address: get_env("SERVER_ADDRESS")?,
            content_dir: get_env("CONTENT_DIR")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            session_ttl_minutes: get_env_parse("SESSION_TTL_MINUTES")?,
            default_passing_score: get_env_parse("DEFAULT_PASSING_SCORE")?,
        };

        if config.session_ttl_minutes < 1 {
            return Err(Error::Config(
                "SESSION_TTL_MINUTES must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&config.default_passing_score) {
            return Err(Error::Config(
                "DEFAULT_PASSING_SCORE must be between 0 and 100".to_string(),
            ));
        }

        Ok(config)
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
