// src/render/mod.rs
pub mod template;
pub mod threat;

use chrono::{DateTime, Local};

use crate::display::Region;
use crate::error::{ThreatScopeError, ThreatScopeResult};
use crate::history::HistoryEntry;
use crate::scan::{DeepScanResult, ScanResult};

pub use template::TemplateEngine;
pub use threat::{classify, ThreatDescriptor, ThreatLevel};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HISTORY_TIME_FORMAT: &str = "%H:%M:%S";
const NOT_AVAILABLE: &str = "N/A";

/// Turns scan payloads into display markup. Missing optional fields become
/// placeholders; only a deep scan without a `results` list is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRenderer;

impl ResultRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a primary scan, stamped with the current time
    pub fn render_scan(&self, result: &ScanResult) -> String {
        self.render_scan_at(result, Local::now())
    }

    pub fn render_scan_at(&self, result: &ScanResult, at: DateTime<Local>) -> String {
        let threat = classify(result.threat_level.as_deref());
        let confidence = result.confidence
            .map(|value| format!("{}%", format_number(value)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let details = result.details.as_ref()
            .map(|details| format!("\n        <p><strong>Details:</strong> {}</p>", html_encode(details)))
            .unwrap_or_default();

        format!(
            "<div class=\"{}\">\n    <h4>Scan Results</h4>\n    <div class=\"scan-details\">\n        \
             <p><strong>Threat Level:</strong> {}</p>\n        \
             <p><strong>Confidence:</strong> {}</p>{}\n    </div>\n    \
             <div class=\"scan-timestamp\">Scan completed at {}</div>\n</div>",
            class_list("scan-result", threat.style_class),
            threat.label,
            confidence,
            details,
            at.format(TIMESTAMP_FORMAT),
        )
    }

    /// Render a deep scan, stamped with the current time
    pub fn render_deep_scan(&self, result: &DeepScanResult) -> ThreatScopeResult<String> {
        self.render_deep_scan_at(result, Local::now())
    }

    pub fn render_deep_scan_at(&self, result: &DeepScanResult, at: DateTime<Local>) -> ThreatScopeResult<String> {
        let entries = result.results.as_ref()
            .ok_or_else(|| ThreatScopeError::MissingDataError("deep scan response has no results list".to_string()))?;

        let lines = entries.iter()
            .map(|entry| format!(
                "        <div class=\"deep-result\"><strong>{}:</strong> {}</div>",
                html_encode(entry.kind.as_deref().unwrap_or("Unknown")),
                html_encode(entry.finding.as_deref().unwrap_or(NOT_AVAILABLE)),
            ))
            .collect::<Vec<String>>()
            .join("\n");

        Ok(format!(
            "<div class=\"scan-result\">\n    <h4>Deep Scan Results</h4>\n    \
             <div class=\"scan-details\">\n{}\n    </div>\n    \
             <div class=\"scan-timestamp\">Deep scan completed at {}</div>\n</div>",
            lines,
            at.format(TIMESTAMP_FORMAT),
        ))
    }

    /// Stand-in for a deep scan that could not be rendered
    pub fn render_missing_results(&self) -> String {
        "<div class=\"scan-result\">\n    <h4>Deep Scan Results</h4>\n    \
         <p>No results available</p>\n</div>".to_string()
    }

    /// Combined view of both scans
    pub fn render_summary(&self, scan: &ScanResult, deep: &DeepScanResult) -> String {
        let threat = classify(scan.threat_level.as_deref());
        let risk_score = deep.risk_score
            .map(format_number)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let mut markup = format!(
            "<h3>Scan Summary</h3>\n<div class=\"result-item\">\n    \
             <strong>Threat Level:</strong> {}<br>\n    \
             <strong>Risk Score:</strong> {}<br>\n    \
             <strong>Findings:</strong> {} potential issues found\n</div>",
            threat.label,
            risk_score,
            deep.findings_count(),
        );

        if let Some(recommendations) = deep.recommendations.as_ref().filter(|r| !r.is_empty()) {
            let items = recommendations.iter()
                .map(|rec| format!("        <li>{}</li>", html_encode(rec)))
                .collect::<Vec<String>>()
                .join("\n");
            markup.push_str(&format!(
                "\n<div class=\"result-item\">\n    <strong>Recommendations:</strong>\n    <ul>\n{}\n    </ul>\n</div>",
                items
            ));
        }

        markup
    }

    /// History list, oldest first
    pub fn render_history<'a, I>(&self, entries: I) -> String
    where
        I: IntoIterator<Item = &'a HistoryEntry>,
    {
        let items = entries.into_iter()
            .map(|entry| format!(
                "<div class=\"result-item\">\n    <strong>Target:</strong> {}<br>\n    \
                 <strong>Time:</strong> {}\n</div>",
                html_encode(&entry.target),
                entry.submitted_at.format(HISTORY_TIME_FORMAT),
            ))
            .collect::<Vec<String>>()
            .join("\n");

        format!("<h3>{}</h3>\n{}", Region::History.heading(), items)
    }

    pub fn render_loading(&self, region: Region) -> String {
        format!("<h3>{}</h3>\n<div class=\"loading\"></div>", region.heading())
    }

    pub fn render_error(&self, region: Region, message: &str) -> String {
        format!(
            "<h3>{}</h3>\n<div class=\"scan-result error\">\n    <strong>Error:</strong> {}\n</div>",
            region.heading(),
            html_encode(message),
        )
    }
}

/// Whole numbers print without a fraction
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

fn class_list(base: &str, extra: &str) -> String {
    if extra.is_empty() {
        base.to_string()
    } else {
        format!("{} {}", base, extra)
    }
}

// Helper function to encode HTML special characters
pub(crate) fn html_encode(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regex::Regex;
    use serde_json::json;

    use crate::scan::DeepScanEntry;

    fn scan(value: serde_json::Value) -> ScanResult {
        serde_json::from_value(value).unwrap()
    }

    fn deep(value: serde_json::Value) -> DeepScanResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_render_scan_without_details() {
        let markup = ResultRenderer::new().render_scan(&scan(json!({"threatLevel": "low", "confidence": 87})));

        assert!(markup.contains("Low Risk"));
        assert!(markup.contains("87%"));
        assert!(markup.contains("scan-result threat-low"));
        assert!(!markup.contains("Details:"));
    }

    #[test]
    fn test_render_scan_with_all_fields_absent() {
        let markup = ResultRenderer::new().render_scan(&ScanResult::default());

        assert!(markup.contains("Unknown Risk"));
        assert!(markup.contains("<strong>Confidence:</strong> N/A"));
        assert!(markup.contains("<div class=\"scan-result\">"));
    }

    #[test]
    fn test_render_scan_escapes_details() {
        let markup = ResultRenderer::new().render_scan(&scan(json!({
            "threatLevel": "HIGH",
            "confidence": 12.5,
            "details": "<script>alert('x')</script>"
        })));

        assert!(markup.contains("High Risk"));
        assert!(markup.contains("12.5%"));
        assert!(markup.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!markup.contains("<script>"));
    }

    #[test]
    fn test_render_scan_differs_only_in_timestamp() {
        let renderer = ResultRenderer::new();
        let result = scan(json!({"threatLevel": "medium", "confidence": 40, "details": "mixed signals"}));
        let stamp = Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").unwrap();

        let first = renderer.render_scan_at(&result, Local.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
        let second = renderer.render_scan_at(&result, Local.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap());

        assert_ne!(first, second);
        assert_eq!(stamp.replace_all(&first, "<ts>"), stamp.replace_all(&second, "<ts>"));
    }

    #[test]
    fn test_render_deep_scan_keeps_order() {
        let markup = ResultRenderer::new().render_deep_scan(&deep(json!({
            "results": [
                {"type": "email", "finding": "breach found"},
                {"type": "domain", "finding": "clean"},
                {"type": "email", "finding": "breach found"}
            ]
        }))).unwrap();

        let email = markup.find("<strong>email:</strong> breach found").unwrap();
        let domain = markup.find("<strong>domain:</strong> clean").unwrap();
        assert!(email < domain);
        assert_eq!(markup.matches("breach found").count(), 2);
        assert_eq!(markup.matches("<div class=\"deep-result\">").count(), 3);
        assert!(!markup.contains("recommendation"));
    }

    #[test]
    fn test_render_deep_scan_placeholders_and_missing_results() {
        let renderer = ResultRenderer::new();

        let partial = DeepScanResult {
            results: Some(vec![DeepScanEntry::default()]),
            ..DeepScanResult::default()
        };
        let markup = renderer.render_deep_scan(&partial).unwrap();
        assert!(markup.contains("<strong>Unknown:</strong> N/A"));

        let missing = renderer.render_deep_scan(&DeepScanResult::default());
        assert!(matches!(missing, Err(ThreatScopeError::MissingDataError(_))));
        assert!(renderer.render_missing_results().contains("No results available"));
    }

    #[test]
    fn test_render_summary() {
        let renderer = ResultRenderer::new();
        let markup = renderer.render_summary(
            &scan(json!({"threatLevel": "high"})),
            &deep(json!({"riskScore": 42, "findings": ["a", "b", "c"], "recommendations": ["Do X"]})),
        );

        assert!(markup.contains("High Risk"));
        assert!(markup.contains("<strong>Risk Score:</strong> 42<br>"));
        assert!(markup.contains("3 potential issues found"));
        assert_eq!(markup.matches("<li>").count(), 1);
        assert!(markup.contains("<li>Do X</li>"));

        let bare = renderer.render_summary(&ScanResult::default(), &DeepScanResult::default());
        assert!(bare.contains("Unknown Risk"));
        assert!(bare.contains("<strong>Risk Score:</strong> N/A"));
        assert!(bare.contains("0 potential issues found"));
        assert!(!bare.contains("Recommendations"));
    }

    #[test]
    fn test_render_history() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let entries = vec![
            HistoryEntry::new("first.example", at),
            HistoryEntry::new("a&b@example.com", at),
        ];

        let markup = ResultRenderer::new().render_history(&entries);
        assert!(markup.starts_with("<h3>Input History</h3>"));
        assert!(markup.find("first.example").unwrap() < markup.find("a&amp;b@example.com").unwrap());
        assert!(markup.contains("<strong>Time:</strong> 14:05:07"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(87.25), "87.25");
    }
}
