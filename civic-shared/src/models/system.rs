//! System status reported by the platform.

use serde::{Deserialize, Serialize};

/// Installation state reported by the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    /// True until the first administrator has completed setup.
    pub setup_required: bool,
}

/// Body of the system status endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemStatusResponse {
    /// Current installation state.
    pub system: SystemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_setup_required() {
        let response: SystemStatusResponse =
            serde_json::from_value(json!({ "system": { "setupRequired": true, "version": "2" } }))
                .unwrap();
        assert!(response.system.setup_required);
    }

    #[test]
    fn test_rejects_missing_flag() {
        let result = serde_json::from_value::<SystemStatusResponse>(json!({ "system": {} }));
        assert!(result.is_err());
    }
}
