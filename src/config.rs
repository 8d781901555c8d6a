use crate::error::Error;
use crate::template::NonceEncoding;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;
pub const DEFAULT_PROGRESS_BUFFER: usize = 64;
pub const DEFAULT_THREAD_NAME: &str = "dsha-miner";

/// Engine settings shared by every search it starts.
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[builder(pattern = "owned", build_fn(error = "Error", validate = "Self::validate"))]
#[serde(default)]
pub struct EngineConfig {
    /// Attempts between progress events.
    #[builder(default = "DEFAULT_PROGRESS_INTERVAL")]
    pub progress_interval: u64,
    /// Progress events buffered between the search and the reporter.
    #[builder(default = "DEFAULT_PROGRESS_BUFFER")]
    pub progress_buffer: usize,
    #[builder(default)]
    pub nonce_encoding: NonceEncoding,
    /// Last nonce tried before a search reports exhaustion.
    #[builder(default = "u32::MAX")]
    pub max_nonce: u32,
    #[builder(default = "DEFAULT_THREAD_NAME.to_owned()", setter(into))]
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress_buffer: DEFAULT_PROGRESS_BUFFER,
            nonce_encoding: NonceEncoding::default(),
            max_nonce: u32::MAX,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.progress_interval == 0 {
            return Err(Error::InvalidConfig("progress_interval must be >= 1".into()));
        }
        if self.progress_buffer == 0 {
            return Err(Error::InvalidConfig("progress_buffer must be >= 1".into()));
        }
        if self.thread_name.contains('\0') {
            return Err(Error::InvalidConfig(
                "thread_name must not contain NUL bytes".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl EngineConfigBuilder {
    fn validate(&self) -> Result<(), Error> {
        if self.progress_interval == Some(0) {
            return Err(Error::InvalidConfig("progress_interval must be >= 1".into()));
        }
        if self.progress_buffer == Some(0) {
            return Err(Error::InvalidConfig("progress_buffer must be >= 1".into()));
        }
        if let Some(name) = &self.thread_name {
            if name.contains('\0') {
                return Err(Error::InvalidConfig(
                    "thread_name must not contain NUL bytes".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn build_validated(self) -> Result<EngineConfig, Error> {
        self.validate()?;
        let config = self.build()?;
        config.validate()?;
        Ok(config)
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
