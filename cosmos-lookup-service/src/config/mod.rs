use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Port assigned by the Azure Functions host to a custom handler.
pub const CUSTOM_HANDLER_PORT_VAR: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub function: FunctionConfig,
    pub cosmos: CosmosSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionConfig {
    /// Function name; the host forwards invocations to `/api/<name>`.
    pub name: String,
}

/// Settings applied to every per-invocation Cosmos client.
#[derive(Debug, Clone, Deserialize)]
pub struct CosmosSettings {
    pub api_version: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for CosmosSettings {
    fn default() -> Self {
        Self {
            api_version: "2018-12-31".to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("cosmos-lookup-service/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FunctionConfig {
    pub fn route(&self) -> String {
        format!("/api/{}", self.name)
    }
}

impl LookupConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let mut common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        if let Ok(port) = env::var(CUSTOM_HANDLER_PORT_VAR) {
            common.port = parse_var(CUSTOM_HANDLER_PORT_VAR, &port)?;
        }

        let defaults = CosmosSettings::default();
        let timeout_secs: u64 = parse_var(
            "COSMOS_REQUEST_TIMEOUT_SECS",
            &get_env(
                "COSMOS_REQUEST_TIMEOUT_SECS",
                Some(&defaults.request_timeout.as_secs().to_string()),
                is_prod,
            )?,
        )?;

        Ok(LookupConfig {
            common,
            function: FunctionConfig {
                name: get_env("FUNCTION_NAME", Some("getCosmosDoc"), is_prod)?,
            },
            cosmos: CosmosSettings {
                api_version: get_env("COSMOS_API_VERSION", Some(&defaults.api_version), is_prod)?,
                request_timeout: Duration::from_secs(timeout_secs),
                user_agent: defaults.user_agent,
            },
        })
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, value, e))
    })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
