//! Game content: action types, talents, and conditions.
//!
//! Everything here participates in resolution purely through the hook
//! registry - the engine crate has no knowledge of any identifier defined
//! in this crate. Static action data (costs, ranges, impacts) is
//! data-driven via embedded RON; behavior is Rust hook sets registered
//! under the same identifiers.
//!
//! Call [`register_hooks`] once at startup, and serve [`profiles()`]
//! through the environment's profile oracle.

pub mod actions;
pub mod conditions;
pub mod profiles;
pub mod talents;

pub use profiles::{ActionProfileRegistry, ProfileLoadError};

use rules_core::HookRegistry;

/// Registers every hook set this crate defines.
///
/// Identifiers are registered exactly once each; overlapping registrations
/// of the same content under differing call conventions are a content bug,
/// not something the registry resolves.
pub fn register_hooks(registry: &mut HookRegistry) {
    actions::register(registry);
    talents::register(registry);
    conditions::register(registry);
}

/// Loads the embedded action profile catalog.
pub fn profiles() -> Result<ActionProfileRegistry, ProfileLoadError> {
    ActionProfileRegistry::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_and_catalog_agree_on_action_ids() {
        let mut registry = HookRegistry::new();
        register_hooks(&mut registry);
        let catalog = profiles().expect("embedded catalog must parse");

        // Every profile that needs behavior has a hook set registered
        // under the same id.
        for id in ["strike", "aimed_shot", "reload", "delay"] {
            let id = rules_core::HookId::from_static(id);
            assert!(catalog.get(&id).is_some(), "missing profile for {id}");
            assert!(registry.get(&id).is_some(), "missing hooks for {id}");
        }
    }
}
