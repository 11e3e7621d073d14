use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HEALTH_MESSAGE: &str = "CDS Application is healthy";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "available")]
    pub status: String,
    #[schema(example = "development")]
    pub environment: String,
    #[schema(example = "CDS Application is healthy")]
    pub message: String,
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl HealthResponse {
    pub fn available(environment: &str, version: &str) -> Self {
        Self {
            status: "available".to_string(),
            environment: environment.to_string(),
            message: HEALTH_MESSAGE.to_string(),
            version: version.to_string(),
        }
    }
}
