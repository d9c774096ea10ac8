//! Skill-list normalization shared by the job forms and profile editing.

use serde::Deserialize;

/// Skill input as submitted by clients: either an already-split array or the
/// comma-separated free-text of the job forms. Both normalize the same way.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

/// Trims entries, drops empties, and dedupes while preserving first-seen
/// order. Skill order is otherwise meaningless for matching.
pub fn normalize_skills(input: Option<SkillsInput>) -> Vec<String> {
    let raw = match input {
        None => return Vec::new(),
        Some(SkillsInput::List(list)) => list,
        Some(SkillsInput::Text(text)) => text.split(',').map(str::to_string).collect(),
    };

    let mut skills: Vec<String> = Vec::with_capacity(raw.len());
    for entry in raw {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !skills.iter().any(|s| s == trimmed) {
            skills.push(trimmed.to_string());
        }
    }
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_text_trimmed_and_deduped() {
        let input = Some(SkillsInput::Text("Solar, PV , ,Solar".to_string()));
        assert_eq!(normalize_skills(input), vec!["Solar", "PV"]);
    }

    #[test]
    fn test_list_input_normalized() {
        let input = Some(SkillsInput::List(vec![
            "  Wiring ".to_string(),
            String::new(),
            "Wiring".to_string(),
            "Roofing".to_string(),
        ]));
        assert_eq!(normalize_skills(input), vec!["Wiring", "Roofing"]);
    }

    #[test]
    fn test_missing_input_is_empty() {
        assert!(normalize_skills(None).is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let input = Some(SkillsInput::Text("c,a,b,a".to_string()));
        assert_eq!(normalize_skills(input), vec!["c", "a", "b"]);
    }
}
