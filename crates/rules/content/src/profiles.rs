//! Action profile catalog loaded from embedded RON data.

use std::collections::HashMap;

use rules_core::{ActionProfile, HookId, ProfileOracle};

/// Errors raised while loading the embedded catalog.
#[derive(Debug, thiserror::Error)]
pub enum ProfileLoadError {
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("duplicate action profile id {0}")]
    Duplicate(HookId),
}

/// Registry for action profiles.
///
/// Loads [`ActionProfile`] data from RON files and provides lookup by id.
#[derive(Debug, Clone)]
pub struct ActionProfileRegistry {
    profiles: HashMap<HookId, ActionProfile>,
}

impl ActionProfileRegistry {
    /// Loads all action profiles from the embedded RON data files.
    pub fn load() -> Result<Self, ProfileLoadError> {
        let mut registry = Self {
            profiles: HashMap::new(),
        };
        registry.merge("actions.ron", include_str!("../data/actions.ron"))?;
        Ok(registry)
    }

    fn merge(&mut self, file: &'static str, source: &str) -> Result<(), ProfileLoadError> {
        let profiles: Vec<ActionProfile> =
            ron::from_str(source).map_err(|source| ProfileLoadError::Parse { file, source })?;
        for profile in profiles {
            if self.profiles.contains_key(&profile.id) {
                return Err(ProfileLoadError::Duplicate(profile.id));
            }
            self.profiles.insert(profile.id.clone(), profile);
        }
        Ok(())
    }

    /// Gets an action profile by id.
    pub fn get(&self, id: &HookId) -> Option<&ActionProfile> {
        self.profiles.get(id)
    }

    /// Returns an iterator over all registered profile ids.
    pub fn ids(&self) -> impl Iterator<Item = &HookId> {
        self.profiles.keys()
    }

    /// Returns the number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns true if no profiles are registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileOracle for ActionProfileRegistry {
    fn profile(&self, id: &HookId) -> Option<&ActionProfile> {
        self.profiles.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::{ActionTag, ImpactAmount, ResourceKind};

    #[test]
    fn loads_embedded_catalog() {
        let registry = ActionProfileRegistry::load().expect("catalog must parse");
        assert!(registry.len() >= 6);

        let strike = registry.get(&HookId::from_static("strike")).unwrap();
        assert_eq!(strike.cost.get(ResourceKind::Action), 2);
        assert!(strike.rolls_check);
        assert!(strike.tags.contains(&ActionTag::Attack));

        let rally = registry.get(&HookId::from_static("rally")).unwrap();
        assert!(!rally.rolls_check);
        assert_eq!(
            rally.impact.unwrap().amount,
            ImpactAmount::Fixed(2)
        );

        let bolt = registry.get(&HookId::from_static("bloodbolt")).unwrap();
        assert_eq!(bolt.cost.get(ResourceKind::Focus), 2);
        assert!(bolt.tags.contains(&ActionTag::Spell));
    }

    #[test]
    fn delay_profile_is_free_and_rolls_nothing() {
        let registry = ActionProfileRegistry::load().unwrap();
        let delay = registry.get(&HookId::from_static("delay")).unwrap();
        assert!(delay.cost.is_free());
        assert!(!delay.rolls_check);
        assert!(delay.impact.is_none());
    }
}
