//! AvailabilityGate: destination inputs unlock once a source is chosen.

use crate::catalog::Role;

use super::store::SelectionStore;

/// Opacity of the destination section while gated off.
pub const DISABLED_OPACITY: f32 = 0.6;

/// Derived render state of the destination inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestinationAvailability {
    /// Dropdown accepts changes.
    pub enabled: bool,
    /// Icons respond to clicks.
    pub interactive: bool,
    /// 1.0 when enabled, de-emphasized otherwise.
    pub opacity: f32,
}

impl DestinationAvailability {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            interactive: true,
            opacity: 1.0,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            interactive: false,
            opacity: DISABLED_OPACITY,
        }
    }
}

/// Pure function of the source slot.
pub fn evaluate(store: &SelectionStore) -> DestinationAvailability {
    if store.get(Role::Source).is_some() {
        DestinationAvailability::enabled()
    } else {
        DestinationAvailability::disabled()
    }
}
