//! Per-actor consumable resource pools.
//!
//! Every mutation of a pool goes through [`ResourcePool::apply_delta`],
//! which clamps to the pool's bounds and reports the delta that actually
//! landed. Callers must use the applied value, not the requested one;
//! assuming a requested delta was fully applied is how resource displays
//! drift out of sync.
//!
//! Pools are never rolled back implicitly. A caller that needs atomicity
//! across several deltas takes a [`PoolSnapshot`] first and restores it on
//! abort (the lifecycle runner does exactly this around its pre-roll
//! phases).

use std::collections::BTreeMap;

/// Named resource pools consumed or restored by actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceKind {
    /// Action points spent to act during a turn.
    Action,
    /// Focus powering spells and special maneuvers.
    Focus,
    /// Health; reaching the floor usually means defeat.
    Health,
    /// Morale; social and fear effects drain it.
    Morale,
}

/// Inclusive floor and ceiling of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolBounds {
    pub min: i32,
    pub max: i32,
}

impl PoolBounds {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// `[0, max]`, the shape of every standard pool.
    pub const fn zero_to(max: i32) -> Self {
        Self { min: 0, max }
    }
}

/// A single consumable pool: current value plus bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    current: i32,
    bounds: PoolBounds,
}

impl ResourcePool {
    /// Creates a pool with `current` clamped into `bounds`.
    pub fn new(current: i32, bounds: PoolBounds) -> Self {
        Self {
            current: current.clamp(bounds.min, bounds.max),
            bounds,
        }
    }

    /// Creates a full pool: `current == max`, floor zero.
    pub fn full(max: i32) -> Self {
        Self::new(max, PoolBounds::zero_to(max))
    }

    pub const fn current(&self) -> i32 {
        self.current
    }

    pub const fn bounds(&self) -> PoolBounds {
        self.bounds
    }

    /// Remaining headroom before the ceiling.
    pub const fn headroom(&self) -> i32 {
        self.bounds.max - self.current
    }

    /// Applies a signed delta, clamped to the pool bounds.
    ///
    /// Returns the delta that was actually applied, which differs from the
    /// requested delta whenever the pool hit its floor or ceiling.
    pub fn apply_delta(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = (before.saturating_add(amount)).clamp(self.bounds.min, self.bounds.max);
        self.current - before
    }

    /// True if spending `amount` would not push the pool below its floor.
    pub fn can_afford(&self, amount: i32) -> bool {
        self.current - amount >= self.bounds.min
    }
}

/// All pools of one actor, keyed by kind.
///
/// `BTreeMap` keeps iteration order deterministic, which matters for
/// reproducible resolution logs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSet {
    pools: BTreeMap<ResourceKind, ResourcePool>,
}

/// A point-in-time copy of a [`ResourceSet`], restorable on abort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolSnapshot {
    pools: BTreeMap<ResourceKind, ResourcePool>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a pool (builder pattern).
    #[must_use]
    pub fn with_pool(mut self, kind: ResourceKind, pool: ResourcePool) -> Self {
        self.pools.insert(kind, pool);
        self
    }

    /// Returns the pool for `kind`, if the actor has one.
    pub fn pool(&self, kind: ResourceKind) -> Option<&ResourcePool> {
        self.pools.get(&kind)
    }

    /// Current value of a pool; 0 when the actor lacks it.
    pub fn current(&self, kind: ResourceKind) -> i32 {
        self.pools.get(&kind).map_or(0, |p| p.current())
    }

    /// Applies a delta to one pool, returning the applied amount.
    ///
    /// A missing pool absorbs the delta entirely (applied = 0); actors
    /// without a morale pool, for instance, simply ignore morale damage.
    pub fn apply_delta(&mut self, kind: ResourceKind, amount: i32) -> i32 {
        self.pools
            .get_mut(&kind)
            .map_or(0, |pool| pool.apply_delta(amount))
    }

    /// True if `amount` can be spent from the pool without crossing its floor.
    pub fn can_afford(&self, kind: ResourceKind, amount: i32) -> bool {
        if amount <= 0 {
            return true;
        }
        self.pools.get(&kind).is_some_and(|p| p.can_afford(amount))
    }

    /// Captures a restorable copy of every pool.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            pools: self.pools.clone(),
        }
    }

    /// Restores a previously captured snapshot, discarding later mutations.
    pub fn restore(&mut self, snapshot: PoolSnapshot) {
        self.pools = snapshot.pools;
    }

    /// Iterates pools in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &ResourcePool)> {
        self.pools.iter().map(|(k, p)| (*k, p))
    }
}
