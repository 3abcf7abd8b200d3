//! Traits describing the read-only environment a resolution runs against.
//!
//! Oracles expose configuration, deterministic randomness, action profile
//! data, and user-prompt plumbing. The [`Env`] aggregate bundles them so the
//! lifecycle runner can access everything it needs without hard coupling to
//! concrete implementations.
mod error;
mod profiles;
mod prompt;
mod rng;

pub use error::OracleError;
pub use profiles::ProfileOracle;
pub use prompt::{DismissAll, PromptKind, PromptOracle, PromptRequest};
pub use rng::{PcgRng, RngOracle, compute_seed};

use crate::config::RulesConfig;

/// Read-only access to the rules configuration.
///
/// [`RulesConfig`] implements this directly, so a bare config value can be
/// placed into an [`Env`] without a wrapper.
pub trait ConfigOracle: Send + Sync {
    fn rules(&self) -> &RulesConfig;
}

impl ConfigOracle for RulesConfig {
    fn rules(&self) -> &RulesConfig {
        self
    }
}

/// Aggregates read-only oracles required by the lifecycle runner and the
/// combat controller.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, C, R, P, F>
where
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
    P: PromptOracle + ?Sized,
    F: ProfileOracle + ?Sized,
{
    config: Option<&'a C>,
    rng: Option<&'a R>,
    prompts: Option<&'a P>,
    profiles: Option<&'a F>,
}

pub type GameEnv<'a> = Env<
    'a,
    dyn ConfigOracle + 'a,
    dyn RngOracle + 'a,
    dyn PromptOracle + 'a,
    dyn ProfileOracle + 'a,
>;

impl<'a, C, R, P, F> Env<'a, C, R, P, F>
where
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
    P: PromptOracle + ?Sized,
    F: ProfileOracle + ?Sized,
{
    pub fn new(
        config: Option<&'a C>,
        rng: Option<&'a R>,
        prompts: Option<&'a P>,
        profiles: Option<&'a F>,
    ) -> Self {
        Self {
            config,
            rng,
            prompts,
            profiles,
        }
    }

    pub fn with_all(config: &'a C, rng: &'a R, prompts: &'a P, profiles: &'a F) -> Self {
        Self::new(Some(config), Some(rng), Some(prompts), Some(profiles))
    }

    pub fn empty() -> Self {
        Self {
            config: None,
            rng: None,
            prompts: None,
            profiles: None,
        }
    }

    /// Returns the ConfigOracle, or an error if not available.
    pub fn config(&self) -> Result<&'a C, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Returns the PromptOracle, or an error if not available.
    pub fn prompts(&self) -> Result<&'a P, OracleError> {
        self.prompts.ok_or(OracleError::PromptsNotAvailable)
    }

    /// Returns the ProfileOracle, or an error if not available.
    pub fn profiles(&self) -> Result<&'a F, OracleError> {
        self.profiles.ok_or(OracleError::ProfilesNotAvailable)
    }
}

impl<'a, C, R, P, F> Env<'a, C, R, P, F>
where
    C: ConfigOracle + 'a,
    R: RngOracle + 'a,
    P: PromptOracle + 'a,
    F: ProfileOracle + 'a,
{
    /// Converts this environment into a trait-object based [`GameEnv`].
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let config: Option<&'a dyn ConfigOracle> = self.config.map(|config| config as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        let prompts: Option<&'a dyn PromptOracle> = self.prompts.map(|prompts| prompts as _);
        let profiles: Option<&'a dyn ProfileOracle> = self.profiles.map(|profiles| profiles as _);
        Env::new(config, rng, prompts, profiles)
    }
}
