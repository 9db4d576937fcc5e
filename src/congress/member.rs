use std::collections::BTreeMap;

use serde::Deserialize;

use crate::graph::{NodeKind, RegistryEntry};

/// A member of the House as served by the data layer.
#[derive(Clone, Debug, Deserialize)]
pub struct Member {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub parties: Vec<String>,
    #[serde(default)]
    pub districts: Vec<String>,
    #[serde(default)]
    pub state: String,
    /// Bills co-sponsored with each other member, keyed by that member's id.
    #[serde(default)]
    pub counts: BTreeMap<String, u32>,
}

impl Member {
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// Party affiliation is taken from the first listed party.
    pub fn kind(&self) -> NodeKind {
        match self.parties.first().map(|party| party.trim()) {
            Some("D") => NodeKind::Democrat,
            Some("R") => NodeKind::Republican,
            _ => NodeKind::OtherParty,
        }
    }

    /// `Name [D | I - CA - 12 | 13]`
    pub fn display_label(&self) -> String {
        format!(
            "{} [{} - {} - {}]",
            self.name,
            self.parties.join(" | "),
            self.state,
            self.districts.join(" | ")
        )
    }

    pub fn registry_entry(&self) -> RegistryEntry {
        RegistryEntry {
            label: self.display_label(),
            kind: self.kind(),
        }
    }

    pub fn total_cosponsorships(&self) -> u64 {
        self.counts.values().map(|count| u64::from(*count)).sum()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Bill {
    pub number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sponsors: Vec<String>,
    #[serde(default)]
    pub cosponsors: Vec<String>,
    #[serde(default, rename = "policyArea")]
    pub policy_area: Option<String>,
}

impl Bill {
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.sponsors
            .iter()
            .chain(self.cosponsors.iter())
            .map(String::as_str)
    }

    pub fn label(&self) -> String {
        if self.title.is_empty() {
            format!("H.R. {}", self.number)
        } else {
            format!("H.R. {}: {}", self.number, self.title)
        }
    }
}
