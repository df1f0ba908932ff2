use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub api: ApiConfig,
    pub capture: CaptureConfig,
    pub cadence: CadenceConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Upstream attendance data API (the CRUD backend).
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
}

/// Periods for the three live-session tasks.
#[derive(Debug, Deserialize)]
pub struct CadenceConfig {
    /// Detection overlay period in milliseconds
    pub detection_ms: u64,
    /// Recognition submission period in seconds
    pub submission_secs: u64,
    /// Roster refresh period in seconds
    pub roster_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
