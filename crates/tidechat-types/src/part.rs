//! Typed message content parts.
//!
//! A message body is an ordered sequence of tagged parts. The closed set
//! here covers what the storage layer round-trips; unknown part kinds in
//! historical payloads simply fail to deserialize and are dropped on read.

use serde::{Deserialize, Serialize};

/// One typed unit of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain answer text.
    Text { text: String },

    /// A file reference (uploaded attachment, generated artifact).
    File {
        url: String,
        media_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },

    /// Model chain-of-thought relayed on the reasoning channel.
    Reasoning { text: String },
}

impl Part {
    /// Convenience constructor for a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Convenience constructor for a reasoning part.
    pub fn reasoning(text: impl Into<String>) -> Self {
        Part::Reasoning { text: text.into() }
    }

    /// Whether this part is the file variant.
    pub fn is_file(&self) -> bool {
        matches!(self, Part::File { .. })
    }
}

/// Extract the file-variant parts for the attachments projection.
pub fn file_parts(parts: &[Part]) -> Vec<Part> {
    parts.iter().filter(|p| p.is_file()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_part_serde() {
        let part = Part::text("hello");
        let json = serde_json::to_string(&part).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hello"}"#);
        let parsed: Part = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, part);
    }

    #[test]
    fn test_file_part_omits_missing_filename() {
        let part = Part::File {
            url: "https://files.example/a.png".to_string(),
            media_type: "image/png".to_string(),
            filename: None,
        };
        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains("\"type\":\"file\""));
        assert!(!json.contains("filename"));
    }

    #[test]
    fn test_file_part_roundtrip_with_filename() {
        let part = Part::File {
            url: "https://files.example/report.pdf".to_string(),
            media_type: "application/pdf".to_string(),
            filename: Some("report.pdf".to_string()),
        };
        let json = serde_json::to_string(&part).unwrap();
        let parsed: Part = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, part);
    }

    #[test]
    fn test_unknown_part_kind_fails_to_parse() {
        let result: Result<Part, _> =
            serde_json::from_str(r#"{"type":"tool_call","name":"search"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_parts_projection() {
        let parts = vec![
            Part::text("see attached"),
            Part::File {
                url: "https://files.example/a.png".to_string(),
                media_type: "image/png".to_string(),
                filename: None,
            },
            Part::reasoning("thinking"),
        ];
        let files = file_parts(&parts);
        assert_eq!(files.len(), 1);
        assert!(files[0].is_file());
    }
}
