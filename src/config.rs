use crate::error::{Error, Result};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Employers tracked when `HH_EMPLOYER_IDS` is not set.
pub const DEFAULT_EMPLOYER_IDS: [&str; 10] = [
    "5145508",   // MAK IT
    "976061",    // Altenar
    "9739596",   // UAB Cronex
    "10210282",  // Teyca
    "1993100",   // Grindata
    "1781300",   // Drom
    "5810442",   // Udevs
    "124293331", // EGAR
    "10673143",  // KG Friend
    "9739183",   // SoftSR
];

pub const DEFAULT_HH_API_URL: &str = "https://api.hh.ru";
pub const DEFAULT_USER_AGENT: &str = "hh-vacancies/0.1 (vacancy collector)";
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub client_encoding: String,
}

#[derive(Debug, Clone)]
pub struct HhSettings {
    pub api_url: String,
    pub per_page: u32,
    pub user_agent: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    pub hh: HhSettings,
    pub employer_ids: Vec<String>,
}

impl Config {
    /// Loads the env file (required when `path` is given, optional `.env` otherwise)
    /// and then reads settings from the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Configuration file {} not found",
                        path.display()
                    )));
                }
                dotenvy::from_path(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
        };

        let client_encoding =
            lookup("POSTGRES_CLIENT_ENCODING").unwrap_or_else(|| "utf8".to_string());
        check_client_encoding(&client_encoding)?;

        let database = DatabaseSettings {
            host: get("POSTGRES_HOST")?,
            port: parse_value("POSTGRES_PORT", &get("POSTGRES_PORT")?)?,
            user: get("POSTGRES_USER")?,
            password: get("POSTGRES_PASSWORD")?,
            dbname: get("POSTGRES_DB")?,
            client_encoding,
        };

        let per_page = match lookup("HH_PER_PAGE") {
            Some(raw) => parse_value::<u32>("HH_PER_PAGE", &raw)?,
            None => MAX_PER_PAGE,
        };
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "Invalid value for HH_PER_PAGE: {} (expected 1..={})",
                per_page, MAX_PER_PAGE
            )));
        }

        let timeout_secs = match lookup("HH_TIMEOUT_SECS") {
            Some(raw) => parse_value::<u64>("HH_TIMEOUT_SECS", &raw)?,
            None => 30,
        };

        let hh = HhSettings {
            api_url: lookup("HH_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_HH_API_URL.to_string()),
            per_page,
            user_agent: lookup("HH_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let employer_ids = match lookup("HH_EMPLOYER_IDS") {
            Some(raw) => parse_id_list(&raw),
            None => DEFAULT_EMPLOYER_IDS.iter().map(|id| id.to_string()).collect(),
        };

        Ok(Self {
            database,
            hh,
            employer_ids,
        })
    }
}

pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

// sqlx always negotiates UTF-8 with the server.
fn check_client_encoding(encoding: &str) -> Result<()> {
    match encoding.to_ascii_lowercase().replace('-', "").as_str() {
        "utf8" | "unicode" => Ok(()),
        other => Err(Error::Config(format!(
            "Unsupported client encoding {}: only UTF-8 is supported",
            other
        ))),
    }
}
