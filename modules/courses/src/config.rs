use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the courses module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoursesConfig {
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_notice_length")]
    pub max_notice_length: usize,
    /// Create unique indexes on the attendance key and the roster at startup.
    #[serde(default)]
    pub enforce_unique_constraints: bool,
}

impl Default for CoursesConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            max_notice_length: default_max_notice_length(),
            enforce_unique_constraints: false,
        }
    }
}

impl CoursesConfig {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_name_length: self.max_name_length,
            max_notice_length: self.max_notice_length,
        }
    }
}

fn default_max_name_length() -> usize {
    120
}

fn default_max_notice_length() -> usize {
    2000
}
