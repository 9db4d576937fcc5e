use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::member::{Bill, Member};

/// Contents of a data file: the member list and, optionally, the bills that
/// link them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Dataset {
    pub members: Vec<Member>,
    #[serde(default)]
    pub bills: Vec<Bill>,
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    parse_dataset(&raw).with_context(|| format!("failed to parse data file {}", path.display()))
}

/// Accepts either `{ "members": [...], "bills": [...] }` or a bare member
/// array, which is what the members endpoint returns.
pub fn parse_dataset(raw: &str) -> Result<Dataset> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON")?;

    let dataset = if parsed.is_array() {
        Dataset {
            members: Vec::<Member>::deserialize(parsed).context("invalid member list")?,
            bills: Vec::new(),
        }
    } else if parsed.is_object() {
        Dataset::deserialize(parsed).context("invalid dataset object")?
    } else {
        return Err(anyhow!("unexpected JSON type; expected an object or array"));
    };

    if dataset.members.is_empty() {
        Err(anyhow!("data file contains no members"))
    } else {
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_member_array() {
        let dataset = parse_dataset(
            r#"[{"id": 1, "name": "A", "parties": ["D"], "counts": {"2": 4}},
                {"id": 2, "name": "B", "parties": ["R"]}]"#,
        )
        .unwrap();
        assert_eq!(dataset.members.len(), 2);
        assert_eq!(dataset.members[0].counts.get("2"), Some(&4));
        assert!(dataset.bills.is_empty());
    }

    #[test]
    fn parses_object_with_bills() {
        let dataset = parse_dataset(
            r#"{"members": [{"id": 1, "name": "A"}],
                "bills": [{"number": 12, "title": "Roads", "sponsors": ["1"], "policyArea": "Transport"}]}"#,
        )
        .unwrap();
        assert_eq!(dataset.bills[0].number, 12);
        assert_eq!(dataset.bills[0].policy_area.as_deref(), Some("Transport"));
    }

    #[test]
    fn rejects_empty_member_list() {
        assert!(parse_dataset(r#"{"members": []}"#).is_err());
        assert!(parse_dataset("42").is_err());
    }
}
