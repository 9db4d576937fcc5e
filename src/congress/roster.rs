use std::collections::HashMap;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::error::{Error, Result};
use crate::graph::{self, Graph, RegistryEntry};

use super::load::Dataset;
use super::member::{Bill, Member};

#[derive(Clone, Debug)]
pub struct Roster {
    members: HashMap<String, Member>,
    registry: HashMap<String, RegistryEntry>,
    by_name: Vec<String>,
    bills: Vec<Bill>,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl Roster {
    pub fn new(dataset: Dataset) -> Self {
        let mut members = HashMap::with_capacity(dataset.members.len());
        let mut registry = HashMap::with_capacity(dataset.members.len());
        for member in dataset.members {
            let key = member.key();
            registry.insert(key.clone(), member.registry_entry());
            members.insert(key, member);
        }

        let mut by_name = members.keys().cloned().collect::<Vec<_>>();
        by_name.sort_by(|a, b| {
            let a_member = &members[a];
            let b_member = &members[b];
            a_member
                .name
                .cmp(&b_member.name)
                .then_with(|| a_member.id.cmp(&b_member.id))
        });

        Self {
            members,
            registry,
            by_name,
            bills: dataset.bills,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn registry(&self) -> &HashMap<String, RegistryEntry> {
        &self.registry
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn max_count(&self, focal: &str) -> u32 {
        self.members
            .get(focal)
            .and_then(|member| member.counts.values().copied().max())
            .unwrap_or(0)
    }

    /// The member with the most co-sponsorships overall, used as the default
    /// focal member.
    pub fn most_connected(&self) -> Option<&Member> {
        self.by_name
            .iter()
            .filter_map(|id| self.members.get(id))
            .max_by_key(|member| member.total_cosponsorships())
    }

    /// Builds the focal member's network, optionally with the bills shared by
    /// the members it contains.
    pub fn focal_graph(&self, focal: &str, threshold: f64, include_bills: bool) -> Result<Graph> {
        let member = self.members.get(focal).ok_or_else(|| Error::UnknownId {
            id: focal.to_owned(),
        })?;

        let graph = graph::build(
            focal,
            member.counts.iter().map(|(id, count)| (id.as_str(), *count)),
            &self.registry,
            threshold,
        )?;

        if include_bills {
            graph::attach_bills(graph, &self.bills)
        } else {
            Ok(graph)
        }
    }

    /// Fuzzy search over display labels, best match first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Member> {
        let query = query.trim();
        if query.is_empty() {
            return self
                .by_name
                .iter()
                .filter_map(|id| self.members.get(id))
                .take(limit)
                .collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut ranked = self
            .by_name
            .iter()
            .filter_map(|id| {
                let member = self.members.get(id)?;
                let score = fuzzy_match_score(&matcher, &member.display_label(), query)?;
                Some((score, member))
            })
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.truncate(limit);
        ranked.into_iter().map(|(_score, member)| member).collect()
    }
}
