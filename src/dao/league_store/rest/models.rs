use serde::Deserialize;

/// Error body returned by the gateway on non-success responses.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorBody {
    /// Primary error text.
    #[serde(default)]
    pub message: Option<String>,
    /// Optional elaboration, often the failing constraint.
    #[serde(default)]
    pub details: Option<String>,
}

impl GatewayErrorBody {
    /// Best available human readable description.
    pub fn into_message(self) -> Option<String> {
        match (self.message, self.details) {
            (Some(message), Some(details)) if !details.is_empty() => {
                Some(format!("{message} ({details})"))
            }
            (Some(message), _) => Some(message),
            (None, details) => details,
        }
    }
}

/// Sort directive appended to a bulk read.
#[derive(Debug, Clone, Copy)]
pub struct OrderBy(pub &'static str);

impl OrderBy {
    /// Ascending `order` value, e.g. `name.asc`.
    pub fn to_query(self) -> String {
        format!("{}.asc", self.0)
    }
}
