//! Catalog: the closed set of sources and destinations.
//!
//! One table drives both input modalities. The dropdown speaks in keys
//! (`database`, `gcp`), the icon row speaks in labels (`Database`,
//! `Google Cloud`). Forward and reverse lookups read the same rows, so the
//! two views cannot drift apart.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which half of the form a selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Destination,
}

impl Role {
    /// Human name used in log lines and headings.
    pub fn name(self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Destination => "destination",
        }
    }
}

/// A selectable data source or destination kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Identifier {
    Database,
    File,
    Api,
    Aws,
    Azure,
    Gcp,
}

/// One catalog row.
struct Entry {
    id: Identifier,
    role: Role,
    key: &'static str,
    label: &'static str,
}

static CATALOG: &[Entry] = &[
    Entry { id: Identifier::Database, role: Role::Source, key: "database", label: "Database" },
    Entry { id: Identifier::File, role: Role::Source, key: "file", label: "File" },
    Entry { id: Identifier::Api, role: Role::Source, key: "api", label: "API" },
    Entry { id: Identifier::Aws, role: Role::Destination, key: "aws", label: "AWS" },
    Entry { id: Identifier::Azure, role: Role::Destination, key: "azure", label: "Azure" },
    Entry { id: Identifier::Gcp, role: Role::Destination, key: "gcp", label: "Google Cloud" },
];

static SOURCES: &[Identifier] = &[Identifier::Database, Identifier::File, Identifier::Api];
static DESTINATIONS: &[Identifier] = &[Identifier::Aws, Identifier::Azure, Identifier::Gcp];

impl Identifier {
    fn entry(self) -> &'static Entry {
        // Rows are in variant declaration order.
        &CATALOG[self as usize]
    }

    /// Role this identifier can be selected for.
    pub fn role(self) -> Role {
        self.entry().role
    }

    /// Dropdown value (`database`, `gcp`, ...).
    pub fn key(self) -> &'static str {
        self.entry().key
    }

    /// Icon label (`Database`, `Google Cloud`, ...).
    pub fn label(self) -> &'static str {
        self.entry().label
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// All identifiers of a role, in display order.
pub fn identifiers(role: Role) -> &'static [Identifier] {
    match role {
        Role::Source => SOURCES,
        Role::Destination => DESTINATIONS,
    }
}

/// Resolve a dropdown value. Empty or unknown keys yield `None`.
pub fn from_key(role: Role, key: &str) -> Option<Identifier> {
    CATALOG
        .iter()
        .find(|e| e.role == role && e.key == key)
        .map(|e| e.id)
}

/// Resolve an icon label, ignoring ASCII case.
pub fn from_label(role: Role, label: &str) -> Option<Identifier> {
    let label = label.trim();
    CATALOG
        .iter()
        .find(|e| e.role == role && e.label.eq_ignore_ascii_case(label))
        .map(|e| e.id)
}
