//! Competitor list management for the setup screen.

use std::collections::HashSet;

use crate::types::CompetitorDescriptor;

pub const MAX_COMPETITORS: usize = 10;

/// Result of [`CompetitorSet::add`]. Only `Added` changes the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
    Full,
    EmptyName,
}

/// Normalizes a user-entered competitor website.
///
/// `"acme"` becomes `"https://acme.com"` and `"acme.io"` becomes
/// `"https://acme.io"`. Input with a scheme and a dotted host is returned
/// as-is. A port stays after the added suffix and `localhost` is left bare.
#[must_use]
pub fn normalize_website(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("https", trimmed),
    };

    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (host, tail) = rest.split_at(host_end);

    let (hostname, port) = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => (name, Some(port)),
        _ => (host, None),
    };

    if hostname.contains('.') || hostname.is_empty() || hostname == "localhost" {
        format!("{scheme}://{host}{tail}")
    } else {
        match port {
            Some(port) => format!("{scheme}://{hostname}.com:{port}{tail}"),
            None => format!("{scheme}://{hostname}.com{tail}"),
        }
    }
}

/// Ordered competitor set, capped at [`MAX_COMPETITORS`] and unique by
/// case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct CompetitorSet {
    entries: Vec<CompetitorDescriptor>,
    seen: HashSet<String>,
}

impl CompetitorSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a competitor, normalizing its website when one is given.
    pub fn add(&mut self, name: &str, website: Option<&str>) -> AddOutcome {
        let name = name.trim();
        if name.is_empty() {
            return AddOutcome::EmptyName;
        }
        if self.entries.len() >= MAX_COMPETITORS {
            return AddOutcome::Full;
        }
        if !self.seen.insert(name.to_lowercase()) {
            return AddOutcome::Duplicate;
        }

        let website = website
            .map(normalize_website)
            .filter(|w| !w.is_empty());

        self.entries.push(CompetitorDescriptor {
            name: Some(name.to_owned()),
            website,
        });
        AddOutcome::Added
    }

    /// Removes a competitor by case-insensitive name.
    pub fn remove(&mut self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        if !self.seen.remove(&key) {
            return false;
        }
        self.entries.retain(|c| {
            c.name
                .as_deref()
                .is_none_or(|n| n.to_lowercase() != key)
        });
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompetitorDescriptor> {
        self.entries.iter()
    }

    #[must_use]
    pub fn into_descriptors(self) -> Vec<CompetitorDescriptor> {
        self.entries
    }
}
