// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub budget: BudgetConfig,
    pub monitor: MonitorConfig,
    pub stream: StreamConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

/// Seeds the per-item time budget: `base_secs + secs_per_mb * size`, capped.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BudgetConfig {
    pub base_secs: f64,
    pub secs_per_mb: f64,
    pub max_secs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    pub tick_ms: u64,
    pub min_emit_interval_ms: u64,
    pub min_delta: f64,
    pub decay_secs: f64,
    pub linear_share: f64,
    pub call_timeout_factor: f64,
    pub min_call_timeout_secs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamConfig {
    pub poll_timeout_ms: u64,
    pub grace_timeout_ms: u64,
    pub cancel_on_disconnect: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub allowed_extensions: Vec<String>,
    pub max_file_size_mb: usize,
}

impl MonitorConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn min_emit_interval(&self) -> Duration {
        Duration::from_millis(self.min_emit_interval_ms)
    }
}

impl StreamConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn grace_timeout(&self) -> Duration {
        Duration::from_millis(self.grace_timeout_ms)
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            base_secs: 20.0,
            secs_per_mb: 10.0,
            max_secs: 120.0,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            min_emit_interval_ms: 200,
            min_delta: 0.5,
            decay_secs: 5.0,
            linear_share: 0.9,
            call_timeout_factor: 4.0,
            min_call_timeout_secs: 60.0,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 100,
            grace_timeout_ms: 50,
            cancel_on_disconnect: true,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CV_FILTER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.apply_key_fallback();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let mut config = Self {
            analyzer: AnalyzerConfig {
                api_base_url: "https://api.openai.com/v1".to_string(),
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                temperature: 0.3,
                max_tokens: 1000,
                request_timeout_secs: 60,
            },
            budget: BudgetConfig::default(),
            monitor: MonitorConfig::default(),
            stream: StreamConfig::default(),
            input: InputConfig {
                allowed_extensions: vec![".pdf".to_string(), ".docx".to_string()],
                max_file_size_mb: 10,
            },
        };
        config.apply_key_fallback();
        config
    }

    /// The conventional `OPENAI_API_KEY` is honored when no key is configured.
    fn apply_key_fallback(&mut self) {
        if self.analyzer.api_key.as_deref().is_none_or(str::is_empty) {
            self.analyzer.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty() && key != "your_openai_api_key_here");
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.budget.base_secs <= 0.0 || self.budget.max_secs < self.budget.base_secs {
            return Err(PipelineError::Config(
                "budget.base_secs must be positive and not exceed budget.max_secs".to_string(),
            ));
        }

        if self.budget.secs_per_mb < 0.0 {
            return Err(PipelineError::Config(
                "budget.secs_per_mb cannot be negative".to_string(),
            ));
        }

        if self.monitor.tick_ms == 0 || self.stream.poll_timeout_ms == 0 {
            return Err(PipelineError::Config(
                "polling intervals must be greater than 0".to_string(),
            ));
        }

        if self.stream.grace_timeout_ms == 0 {
            return Err(PipelineError::Config(
                "stream.grace_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if !(self.monitor.linear_share > 0.0 && self.monitor.linear_share < 1.0) {
            return Err(PipelineError::Config(
                "monitor.linear_share must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        if self.monitor.decay_secs <= 0.0 || self.monitor.call_timeout_factor < 1.0 {
            return Err(PipelineError::Config(
                "monitor.decay_secs must be positive and call_timeout_factor at least 1"
                    .to_string(),
            ));
        }

        if self.input.max_file_size_mb == 0 {
            return Err(PipelineError::Config(
                "input.max_file_size_mb must be greater than 0".to_string(),
            ));
        }

        if self.input.allowed_extensions.is_empty() {
            return Err(PipelineError::Config(
                "input.allowed_extensions cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
