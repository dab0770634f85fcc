use serde::{Deserialize, Serialize};

pub const FUNCTION_VERSION_ENV: &str = "AWS_LAMBDA_FUNCTION_VERSION";
pub const REGION_ENV: &str = "AWS_REGION";
pub const FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";
pub const MEMORY_SIZE_ENV: &str = "AWS_LAMBDA_FUNCTION_MEMORY_SIZE";

/// Deployment metadata the hosting environment supplies to the function.
///
/// Every field is optional: a missing value is reported as unset and never
/// fails an invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LambdaMetadata {
    pub function_version: Option<String>,
    pub region: Option<String>,
    pub function_name: Option<String>,
    pub memory_size: Option<String>,
}

impl LambdaMetadata {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            function_version: read(FUNCTION_VERSION_ENV),
            region: read(REGION_ENV),
            function_name: read(FUNCTION_NAME_ENV),
            memory_size: read(MEMORY_SIZE_ENV),
        }
    }

    /// Value echoed in the version header. Unset versions echo as an empty
    /// string so the header is always present.
    pub fn version_header_value(&self) -> String {
        self.function_version.clone().unwrap_or_default()
    }
}
