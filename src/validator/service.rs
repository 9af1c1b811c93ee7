// src/validator/service.rs
// =============================================================================
// The boundary to the external markup validation service.
//
// The service has exactly one operation: "validate this file". It either
// answers with a report (valid or not, plus diagnostics) or the call itself
// fails (file unreadable, network down, reply not understood).
//
// Keeping this behind a trait means the run loop in run.rs can be tested
// against a fake service with no network at all.
// =============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// One message from the validator
///
/// Field names follow the Nu HTML Checker's JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// "error", "info", "non-document-error", ...
    #[serde(rename = "type")]
    pub category: String,
    /// Source line the message points at (last line of the extract)
    #[serde(rename = "lastLine", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    /// The message text
    #[serde(rename = "message", default)]
    pub text: String,
}

impl Diagnostic {
    #[cfg(test)]
    pub fn new(category: &str, line: Option<u64>, text: &str) -> Self {
        Self {
            category: category.to_string(),
            line,
            text: text.to_string(),
        }
    }

    /// True for messages that make the document invalid
    pub fn is_error(&self) -> bool {
        self.category == "error" || self.category == "non-document-error"
    }
}

/// The service's answer for one file
///
/// Validity has been reported under two different field names over the
/// service's lifetime. Both are accepted; see `is_valid` for how they combine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default)]
    pub messages: Vec<Diagnostic>,
}

impl ServiceReport {
    /// Positive if either validity field is `true`
    ///
    /// A reply with neither field set is negative.
    pub fn is_valid(&self) -> bool {
        self.validity == Some(true) || self.valid == Some(true)
    }
}

/// Why a call to the service failed
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("validator answered HTTP {status}")]
    Status { status: u16 },

    #[error("could not decode validator reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can validate a markup file
#[async_trait]
pub trait ValidationService: Send + Sync {
    async fn validate(&self, path: &Path) -> Result<ServiceReport, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either_validity_field_counts() {
        let old: ServiceReport = serde_json::from_str(r#"{"validity": true}"#).unwrap();
        let new: ServiceReport = serde_json::from_str(r#"{"valid": true}"#).unwrap();
        assert!(old.is_valid());
        assert!(new.is_valid());
        assert_eq!(old.is_valid(), new.is_valid());
    }

    #[test]
    fn test_disagreeing_fields_resolve_to_valid() {
        let report: ServiceReport =
            serde_json::from_str(r#"{"validity": false, "valid": true}"#).unwrap();
        assert!(report.is_valid());

        let report: ServiceReport =
            serde_json::from_str(r#"{"validity": true, "valid": false}"#).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_missing_flags_are_negative() {
        let report: ServiceReport = serde_json::from_str(r#"{"messages": []}"#).unwrap();
        assert!(!report.is_valid());
    }

    #[test]
    fn test_decode_nu_message() {
        let json = r#"{
            "type": "error",
            "lastLine": 12,
            "lastColumn": 7,
            "message": "Stray end tag “div”.",
            "extract": "</div>"
        }"#;
        let diagnostic: Diagnostic = serde_json::from_str(json).unwrap();
        assert_eq!(diagnostic, Diagnostic::new("error", Some(12), "Stray end tag “div”."));
        assert!(diagnostic.is_error());

        let info: Diagnostic =
            serde_json::from_str(r#"{"type": "info", "subType": "warning", "message": "x"}"#)
                .unwrap();
        assert_eq!(info.line, None);
        assert!(!info.is_error());
    }
}
