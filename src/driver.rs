use rand::Rng;

use crate::signal::Input;
use crate::sim_if::SimIf;
use crate::testbench::Beat;
use crate::utils;

/// Values presented on the upstream port for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Upstream {
    pub valid: bool,
    pub beat: Beat,
}

/// Random upstream source.
///
/// A new beat is only drawn once the current one is no longer pending:
/// an offered beat that was not accepted is held unchanged.
#[derive(Debug)]
pub struct StimulusGen {
    valid_probability: f64,
    last_probability: f64,
    current: Upstream,
}

impl StimulusGen {
    pub fn new(valid_probability: f64, last_probability: f64) -> Self {
        Self {
            valid_probability,
            last_probability,
            current: Upstream::default(),
        }
    }

    /// Next upstream values given whether the current ones were accepted on
    /// the previous sampled edge.
    pub fn step<R: Rng + ?Sized>(&mut self, accepted: bool, rng: &mut R) -> Upstream {
        if !self.current.valid || accepted {
            let valid = utils::chance(rng, self.valid_probability);
            let data = utils::rand_byte(rng);
            let last = utils::chance(rng, self.last_probability);
            self.current = Upstream {
                valid,
                beat: Beat::new(data, last),
            };
        }
        self.current
    }

    pub fn drive<D, R>(&mut self, dut: &mut D, rng: &mut R, accepted: bool) -> Upstream
    where
        D: SimIf + ?Sized,
        R: Rng + ?Sized,
    {
        let up = self.step(accepted, rng);
        dut.set_input(Input::STvalid, up.valid as u32);
        dut.set_input(Input::STdata, up.beat.data as u32);
        dut.set_input(Input::STlast, up.beat.last as u32);
        up
    }
}

/// Random downstream ready, redrawn every cycle.
#[derive(Debug)]
pub struct BackpressureGen {
    ready_probability: f64,
}

impl BackpressureGen {
    pub fn new(ready_probability: f64) -> Self {
        Self { ready_probability }
    }

    pub fn step<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        utils::chance(rng, self.ready_probability)
    }

    pub fn drive<D, R>(&self, dut: &mut D, rng: &mut R) -> bool
    where
        D: SimIf + ?Sized,
        R: Rng + ?Sized,
    {
        let ready = self.step(rng);
        dut.set_input(Input::MTready, ready as u32);
        ready
    }
}
