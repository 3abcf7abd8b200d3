//! Oracle exposing action profile data to the lifecycle runner.

use crate::action::ActionProfile;
use crate::hooks::HookId;

/// Read-only lookup of action profiles by identifier.
///
/// Implemented by the content crate's profile registry; the engine never
/// hard-codes knowledge of individual actions.
pub trait ProfileOracle: Send + Sync {
    /// Returns the profile registered under `id`, if any.
    fn profile(&self, id: &HookId) -> Option<&ActionProfile>;
}
