use serde::{Deserialize, Serialize};

/// One project write-up from the portfolio. Immutable input — the engine
/// never mutates a project after loading.
///
/// `id` is the project title and must be unique and non-empty across the
/// portfolio (validated by the ranker before any scoring happens).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(alias = "title")]
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserializes_from_title_field() {
        // Portfolio files use "title"; the engine calls it "id".
        let json = r#"{
            "title": "Trading Engine",
            "description": "Low-latency order matching in Rust",
            "technologies": ["Rust", "Kafka"],
            "duration": "6 months"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, "Trading Engine");
        assert_eq!(project.technologies, vec!["Rust", "Kafka"]);
        assert_eq!(project.duration.as_deref(), Some("6 months"));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id": "A", "description": "text"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.technologies.is_empty());
        assert!(project.duration.is_none());
    }
}
