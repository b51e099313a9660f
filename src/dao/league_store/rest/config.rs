use super::error::{RestDaoError, RestResult};

/// Runtime configuration describing how to reach the REST gateway.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, with or without a trailing slash.
    pub base_url: String,
    /// Key sent both as `apikey` and as the bearer token.
    pub api_key: String,
}

impl RestConfig {
    /// Construct a configuration from an explicit project URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> RestResult<Self> {
        let base_url = std::env::var("SUPABASE_URL").map_err(|_| RestDaoError::MissingEnvVar {
            var: "SUPABASE_URL",
        })?;
        let api_key =
            std::env::var("SUPABASE_ANON_KEY").map_err(|_| RestDaoError::MissingEnvVar {
                var: "SUPABASE_ANON_KEY",
            })?;

        Ok(Self::new(base_url, api_key))
    }

    /// Whether the gateway environment variables are present at all.
    pub fn is_configured() -> bool {
        std::env::var_os("SUPABASE_URL").is_some()
    }
}
