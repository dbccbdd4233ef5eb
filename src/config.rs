use std::env;

use time::UtcOffset;

use crate::constants::*;

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: String,
    pub session_secret: String,
    /// Offset used to decide which calendar day "today" is
    pub utc_offset: UtcOffset,
    pub production: bool,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port_raw = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let port = port_raw
            .parse::<u16>()
            .map_err(|_| format!("PORT must be a valid port number, got '{}'", port_raw))?;

        let data_path = env::var("DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| "SESSION_SECRET environment variable is required".to_string())?;
        if session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(format!(
                "SESSION_SECRET must be at least {} bytes long",
                MIN_SESSION_SECRET_LENGTH
            ));
        }

        let utc_offset = match env::var("UTC_OFFSET_HOURS") {
            Ok(raw) => parse_utc_offset(&raw)?,
            Err(_) => UtcOffset::UTC,
        };

        let production = env::var("PRODUCTION")
            .map(|val| val.to_lowercase() == "true")
            .unwrap_or(false);

        let frontend_origin =
            env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string());

        Ok(Self {
            host,
            port,
            data_path,
            session_secret,
            utc_offset,
            production,
            frontend_origin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_utc_offset(raw: &str) -> Result<UtcOffset, String> {
    let hours = raw
        .trim()
        .parse::<i8>()
        .map_err(|_| format!("UTC_OFFSET_HOURS must be a whole number, got '{}'", raw))?;
    if !(-12..=14).contains(&hours) {
        return Err(format!(
            "UTC_OFFSET_HOURS must be between -12 and 14, got {}",
            hours
        ));
    }
    UtcOffset::from_hms(hours, 0, 0).map_err(|e| format!("Invalid UTC offset: {}", e))
}
