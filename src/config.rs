use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::error::{TbError, TbResult};
use crate::testbench::SimTime;
use crate::utils;

/// What to do with expected beats still queued when the run ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResidualPolicy {
    /// Leftover beats are reported but do not affect the verdict.
    #[default]
    Ignore,
    /// Any leftover beat fails the run.
    Fail,
}

impl FromStr for ResidualPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(ResidualPolicy::Ignore),
            "fail" => Ok(ResidualPolicy::Fail),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TbConfig {
    pub seed: u64,
    pub valid_probability: f64,
    pub last_probability: f64,
    pub ready_probability: f64,
    /// Ticks during which reset is held asserted.
    pub reset_ticks: SimTime,
    pub max_ticks: SimTime,
    pub max_mistakes: u32,
    pub residual_policy: ResidualPolicy,
    /// VCD output, if any.
    pub trace_path: Option<PathBuf>,
    /// JUnit XML output, if any.
    pub junit_path: Option<PathBuf>,
}

impl Default for TbConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            valid_probability: 0.7,
            last_probability: 0.1,
            ready_probability: 0.5,
            reset_ticks: 100,
            max_ticks: 1_000_000,
            max_mistakes: 15,
            residual_policy: ResidualPolicy::Ignore,
            trace_path: None,
            junit_path: None,
        }
    }
}

impl TbConfig {
    /// Defaults overlaid with `AXISTB_*` environment variables.
    ///
    /// `AXISTB_SEED=random` draws a fresh seed, which is logged so the run
    /// can be replayed.
    pub fn from_env() -> TbResult<Self> {
        let mut cfg = Self::default();
        match env::var("AXISTB_SEED") {
            Ok(v) if v.eq_ignore_ascii_case("random") => {
                cfg.seed = utils::fresh_seed();
                info!(seed = cfg.seed, "drew random seed");
            }
            Ok(v) => cfg.seed = parse("AXISTB_SEED", &v)?,
            Err(_) => {}
        }
        if let Some(p) = env_var("AXISTB_VALID_PROB")? {
            cfg.valid_probability = p;
        }
        if let Some(p) = env_var("AXISTB_LAST_PROB")? {
            cfg.last_probability = p;
        }
        if let Some(p) = env_var("AXISTB_READY_PROB")? {
            cfg.ready_probability = p;
        }
        if let Some(t) = env_var("AXISTB_RESET_TICKS")? {
            cfg.reset_ticks = t;
        }
        if let Some(t) = env_var("AXISTB_MAX_TICKS")? {
            cfg.max_ticks = t;
        }
        if let Some(m) = env_var("AXISTB_MAX_MISTAKES")? {
            cfg.max_mistakes = m;
        }
        if let Some(p) = env_var("AXISTB_RESIDUAL")? {
            cfg.residual_policy = p;
        }
        if let Ok(path) = env::var("AXISTB_TRACE") {
            cfg.trace_path = Some(path.into());
        }
        if let Ok(path) = env::var("AXISTB_JUNIT") {
            cfg.junit_path = Some(path.into());
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> TbResult<()> {
        check_probability("valid_probability", self.valid_probability)?;
        check_probability("last_probability", self.last_probability)?;
        check_probability("ready_probability", self.ready_probability)?;
        if self.max_ticks == 0 {
            return Err(TbError::ZeroBound("max_ticks"));
        }
        if self.max_mistakes == 0 {
            return Err(TbError::ZeroBound("max_mistakes"));
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> TbResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TbError::Probability { name, value })
    }
}

/// Reads and parses an environment variable; unset is `None`.
pub fn env_var<T: FromStr>(key: &str) -> TbResult<Option<T>> {
    match env::var(key) {
        Ok(v) => parse(key, &v).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> TbResult<T> {
    value.trim().parse().map_err(|_| TbError::Env {
        key: key.to_string(),
        value: value.to_string(),
    })
}
