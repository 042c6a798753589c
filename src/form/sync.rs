//! InputSyncController: keeps dropdowns and icon rows in agreement.
//!
//! Both modalities are translators into one command: `apply(role, value)`.
//! Neither view ever writes to the other directly; the store is updated
//! first and both views are re-derived from it.

use tracing::debug;

use crate::catalog::{self, Identifier, Role};

use super::gate::{self, DestinationAvailability};
use super::store::SelectionStore;

/// Dropdown view for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dropdown {
    pub value: Option<Identifier>,
}

impl Dropdown {
    /// Value as the dropdown reports it (empty string when unselected).
    pub fn key(&self) -> &'static str {
        self.value.map(Identifier::key).unwrap_or("")
    }
}

/// One clickable icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub label: String,
    pub active: bool,
}

/// The icon row for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRow {
    pub icons: Vec<Icon>,
}

impl IconRow {
    /// Icons for every catalog entry of `role`.
    pub fn for_role(role: Role) -> Self {
        Self::with_labels(catalog::identifiers(role).iter().map(|id| id.label()))
    }

    /// Icons with arbitrary labels.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            icons: labels
                .into_iter()
                .map(|label| Icon {
                    label: label.into(),
                    active: false,
                })
                .collect(),
        }
    }

    /// Label of the highlighted icon, if any.
    pub fn active_label(&self) -> Option<&str> {
        self.icons
            .iter()
            .find(|icon| icon.active)
            .map(|icon| icon.label.as_str())
    }

    pub fn active_count(&self) -> usize {
        self.icons.iter().filter(|icon| icon.active).count()
    }

    fn clear(&mut self) {
        for icon in &mut self.icons {
            icon.active = false;
        }
    }
}

/// Why an input event left the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Dropdown value not in the catalog for this role.
    UnknownKey,
    /// Icon label has no reverse mapping for this role.
    UnknownLabel,
    /// Destination inputs are gated off.
    Gated,
}

/// Result of feeding one input event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied {
        role: Role,
        value: Option<Identifier>,
    },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone)]
struct RoleViews {
    dropdown: Dropdown,
    icons: IconRow,
}

impl RoleViews {
    fn new(role: Role) -> Self {
        Self {
            dropdown: Dropdown::default(),
            icons: IconRow::for_role(role),
        }
    }
}

/// Owns the store and both views of each role.
#[derive(Debug, Clone)]
pub struct InputSyncController {
    store: SelectionStore,
    source: RoleViews,
    destination: RoleViews,
    availability: DestinationAvailability,
}

impl InputSyncController {
    /// Fresh session: nothing selected, destination gated off.
    pub fn new() -> Self {
        Self::with_icon_rows(IconRow::for_role(Role::Source), IconRow::for_role(Role::Destination))
    }

    /// Build with custom icon rows (the rendered icons are an external surface).
    pub fn with_icon_rows(source_icons: IconRow, destination_icons: IconRow) -> Self {
        let mut source = RoleViews::new(Role::Source);
        source.icons = source_icons;
        let mut destination = RoleViews::new(Role::Destination);
        destination.icons = destination_icons;

        let store = SelectionStore::new();
        let availability = gate::evaluate(&store);
        Self {
            store,
            source,
            destination,
            availability,
        }
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn dropdown(&self, role: Role) -> &Dropdown {
        &self.views(role).dropdown
    }

    pub fn icons(&self, role: Role) -> &IconRow {
        &self.views(role).icons
    }

    pub fn availability(&self) -> DestinationAvailability {
        self.availability
    }

    /// Dropdown for `role` changed to `value` (empty string = unselected).
    pub fn dropdown_changed(&mut self, role: Role, value: &str) -> SyncOutcome {
        if role == Role::Destination && !self.availability.enabled {
            debug!(value, "destination dropdown is disabled, ignoring change");
            return SyncOutcome::Ignored(IgnoreReason::Gated);
        }

        let value = value.trim();
        let resolved = if value.is_empty() {
            None
        } else {
            match catalog::from_key(role, value) {
                Some(id) => Some(id),
                None => {
                    debug!(role = role.name(), value, "no catalog entry for dropdown value");
                    return SyncOutcome::Ignored(IgnoreReason::UnknownKey);
                }
            }
        };

        self.apply(role, resolved)
    }

    /// Icon labelled `label` clicked in the `role` row.
    pub fn icon_clicked(&mut self, role: Role, label: &str) -> SyncOutcome {
        if role == Role::Destination && !self.availability.interactive {
            debug!(label, "destination icons are not interactive, ignoring click");
            return SyncOutcome::Ignored(IgnoreReason::Gated);
        }

        let Some(id) = catalog::from_label(role, label) else {
            debug!(role = role.name(), label, "no catalog entry for icon label");
            return SyncOutcome::Ignored(IgnoreReason::UnknownLabel);
        };

        // Same path as the dropdown, so both modalities converge.
        self.dropdown_changed(role, id.key())
    }

    fn apply(&mut self, role: Role, value: Option<Identifier>) -> SyncOutcome {
        debug!(role = role.name(), value = ?value, "selection changed");
        self.store.set(role, value);
        self.render_role(role);
        if role == Role::Source {
            self.recompute_gate();
        }
        SyncOutcome::Applied { role, value }
    }

    /// Re-derive dropdown value and highlight from the store.
    fn render_role(&mut self, role: Role) {
        let value = self.store.get(role);
        let views = self.views_mut(role);
        views.dropdown.value = value;
        views.icons.clear();

        let Some(id) = value else { return };
        match views.icons.icons.iter_mut().find(|icon| icon.label == id.label()) {
            Some(icon) => icon.active = true,
            None => debug!(role = role.name(), label = id.label(), "no icon to highlight"),
        }
    }

    fn recompute_gate(&mut self) {
        self.availability = gate::evaluate(&self.store);
        if !self.availability.enabled && self.store.get(Role::Destination).is_some() {
            debug!("source cleared, clearing destination");
            self.store.set(Role::Destination, None);
            self.render_role(Role::Destination);
        }
    }

    fn views(&self, role: Role) -> &RoleViews {
        match role {
            Role::Source => &self.source,
            Role::Destination => &self.destination,
        }
    }

    fn views_mut(&mut self, role: Role) -> &mut RoleViews {
        match role {
            Role::Source => &mut self.source,
            Role::Destination => &mut self.destination,
        }
    }
}

impl Default for InputSyncController {
    fn default() -> Self {
        Self::new()
    }
}
