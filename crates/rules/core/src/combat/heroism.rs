//! Encounter-wide heroism accrual.

/// The heroism meter tracked per combat encounter.
///
/// `actions` counts qualifying actions taken by heroes; crossing a
/// threshold unlocks bonus resources. All derived fields are recomputed in
/// full every time `actions` changes - nothing is incremented, so the
/// meter cannot drift from its inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroismMeter {
    /// Qualifying actions accrued this encounter.
    pub actions: u32,

    /// Actions required per threshold, derived from participant count.
    pub required: u32,

    /// The last threshold crossed.
    pub previous: u32,

    /// The next threshold to cross.
    pub next: u32,

    /// Progress from `previous` toward `next`, as integer percent [0, 100).
    pub pct: u32,
}

impl HeroismMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds accrued actions and recomputes the derived fields.
    pub fn accrue(&mut self, actions: u32, participants: usize, per_participant: u32) {
        self.actions += actions;
        self.recompute(participants, per_participant);
    }

    /// Recomputes `required`, `previous`, `next` and `pct` from scratch.
    ///
    /// Safe to call whenever `actions` or the participant count changed;
    /// the result depends only on the current values.
    pub fn recompute(&mut self, participants: usize, per_participant: u32) {
        self.required = (participants.max(1) as u32) * per_participant.max(1);
        self.previous = (self.actions / self.required) * self.required;
        self.next = self.previous + self.required;
        self.pct = (self.actions - self.previous) * 100 / self.required;
    }

    /// Thresholds fully crossed so far.
    pub fn thresholds_crossed(&self) -> u32 {
        self.previous / self.required.max(1)
    }
}
