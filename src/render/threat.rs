// src/render/threat.rs

/// Presentation of a threat level: CSS class plus human label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatDescriptor {
    pub style_class: &'static str,
    pub label: &'static str,
}

/// Recognized threat levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl ThreatLevel {
    /// Case-insensitive; anything unrecognized, including a missing level, is `Unknown`
    pub fn parse(level: Option<&str>) -> Self {
        match level.unwrap_or("unknown").to_lowercase().as_str() {
            "high" => ThreatLevel::High,
            "medium" => ThreatLevel::Medium,
            "low" => ThreatLevel::Low,
            _ => ThreatLevel::Unknown,
        }
    }

    pub fn descriptor(&self) -> ThreatDescriptor {
        match self {
            ThreatLevel::High => ThreatDescriptor { style_class: "threat-high", label: "High Risk" },
            ThreatLevel::Medium => ThreatDescriptor { style_class: "threat-medium", label: "Medium Risk" },
            ThreatLevel::Low => ThreatDescriptor { style_class: "threat-low", label: "Low Risk" },
            ThreatLevel::Unknown => ThreatDescriptor { style_class: "", label: "Unknown Risk" },
        }
    }
}

/// Map a raw threat-level label to its presentation
pub fn classify(level: Option<&str>) -> ThreatDescriptor {
    ThreatLevel::parse(level).descriptor()
}
