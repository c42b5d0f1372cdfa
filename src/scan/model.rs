// src/scan/model.rs
use std::fmt;
use std::str::FromStr;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::error::ThreatScopeError;

/// Scan categories understood by the remote API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScanCategory {
    Phone,
    Email,
    Domain,
    Breach,
    Threat,
    Social,
}

impl ScanCategory {
    pub const ALL: [ScanCategory; 6] = [
        ScanCategory::Phone,
        ScanCategory::Email,
        ScanCategory::Domain,
        ScanCategory::Breach,
        ScanCategory::Threat,
        ScanCategory::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanCategory::Phone => "phone",
            ScanCategory::Email => "email",
            ScanCategory::Domain => "domain",
            ScanCategory::Breach => "breach",
            ScanCategory::Threat => "threat",
            ScanCategory::Social => "social",
        }
    }
}

impl fmt::Display for ScanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanCategory {
    type Err = ThreatScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ThreatScopeError::ConfigError(format!("Unknown scan category: {}", s)))
    }
}

/// A single outbound request against the scanning API
#[derive(Debug, Clone, PartialEq)]
pub enum ScanRequest {
    Primary {
        target: String,
        scan_type: ScanCategory,
    },
    Deep {
        target: String,
        scan_types: Vec<ScanCategory>,
    },
}

impl ScanRequest {
    /// Path relative to the configured base URL
    pub fn path(&self) -> String {
        match self {
            ScanRequest::Primary { scan_type, .. } => format!("scan/{}", scan_type),
            ScanRequest::Deep { .. } => "deep-scan".to_string(),
        }
    }

    /// JSON request body
    pub fn body(&self) -> Value {
        match self {
            ScanRequest::Primary { target, .. } => json!({ "target": target }),
            ScanRequest::Deep { target, scan_types } => json!({
                "target": target,
                "scan_types": scan_types,
            }),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            ScanRequest::Primary { target, .. } | ScanRequest::Deep { target, .. } => target,
        }
    }
}

/// Result of a single-category scan. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    #[serde(default, deserialize_with = "lenient")]
    pub threat_level: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub details: Option<String>,
}

/// Result of a multi-category deep scan
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeepScanResult {
    #[serde(default, deserialize_with = "lenient")]
    pub results: Option<Vec<DeepScanEntry>>,
    #[serde(default, deserialize_with = "lenient")]
    pub risk_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub findings: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub recommendations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DeepScanEntry {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub finding: Option<String>,
}

impl DeepScanResult {
    /// Number of findings reported, zero when absent
    pub fn findings_count(&self) -> usize {
        self.findings.as_ref().map_or(0, Vec::len)
    }
}

/// Treat a field of the wrong JSON type the same as a missing one
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
