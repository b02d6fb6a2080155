use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub backend: BackendSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub endpoints: EndpointsConfig,
}

/// Endpoint path templates, relative to `base_url`
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    pub stream_per_track: String,
    pub track_rev_per_dsp: String,
    pub dashboard: String,
    pub expense_trend: String,
    pub advance_trend: String,
    pub advance_overview: String,
    pub advance_type_split: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartsConfig {
    /// How many series are pre-selected when the client sends no selection
    #[serde(default = "default_series")]
    pub default_series: usize,
    /// Year used when a request omits one; the current year if unset
    #[serde(default)]
    pub default_year: Option<i32>,
    /// Upper bound on cached last-good chart responses
    #[serde(default = "default_cache_slots")]
    pub cache_slots: usize,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_series() -> usize {
    2
}

fn default_cache_slots() -> usize {
    1024
}

pub fn load_backend_config() -> anyhow::Result<BackendConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/backend"))
        .add_source(config::Environment::with_prefix("ROYALTY").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_charts_config() -> anyhow::Result<ChartsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/charts").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in an endpoint path
pub fn prepare_path(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
