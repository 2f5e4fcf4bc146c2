use std::fmt;
use std::time::Instant;

use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::config::{ResidualPolicy, TbConfig};
use crate::driver::{BackpressureGen, StimulusGen};
use crate::error::TbResult;
use crate::report::Report;
use crate::signal::Input;
use crate::sim_if::SimIf;
use crate::testbench::{ClockReset, Handshake, Monitor, SimTime, Tick};
use crate::trace::{VcdRecorder, WaveformRecorder};
use crate::utils;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    TimeLimit,
    MistakeLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TimeLimit => f.write_str("time limit"),
            StopReason::MistakeLimit => f.write_str("mistake limit"),
        }
    }
}

/// Runs the DUT in lock step with the clock, drivers and monitor until one
/// of the two bounds is hit.
pub struct Runner<D: SimIf> {
    dut: D,
    cfg: TbConfig,
    clock: ClockReset,
    stimulus: StimulusGen,
    backpressure: BackpressureGen,
    monitor: Monitor,
    rng: StdRng,
    recorder: Option<Box<dyn WaveformRecorder>>,
    last_handshake: Handshake,
}

impl<D: SimIf> Runner<D> {
    pub fn new(mut dut: D, cfg: TbConfig) -> TbResult<Self> {
        cfg.validate()?;
        for sig in Input::ALL {
            dut.set_input(sig, 0);
        }
        dut.eval();
        let recorder: Option<Box<dyn WaveformRecorder>> = match &cfg.trace_path {
            Some(path) => Some(Box::new(VcdRecorder::create(path)?)),
            None => None,
        };
        Ok(Self {
            clock: ClockReset::new(cfg.reset_ticks),
            stimulus: StimulusGen::new(cfg.valid_probability, cfg.last_probability),
            backpressure: BackpressureGen::new(cfg.ready_probability),
            monitor: Monitor::new(),
            rng: utils::seeded_rng(cfg.seed),
            recorder,
            last_handshake: Handshake::default(),
            dut,
            cfg,
        })
    }

    /// Replaces any recorder set up from `trace_path`.
    pub fn with_recorder<R: WaveformRecorder + 'static>(mut self, recorder: R) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    /// Advances one tick.
    ///
    /// On a rising edge out of reset the new inputs are driven and evaluated
    /// before the monitor samples, so every read sees settled outputs.
    pub fn step(&mut self) -> TbResult<Tick> {
        let tick = self.clock.advance(&mut self.dut);
        self.dut.eval();
        if tick.rising && !tick.in_reset {
            self.stimulus
                .drive(&mut self.dut, &mut self.rng, self.last_handshake.input);
            self.backpressure.drive(&mut self.dut, &mut self.rng);
            self.dut.eval();
            self.last_handshake = self.monitor.sample(&self.dut, tick.time);
        }
        if let Some(rec) = self.recorder.as_mut() {
            rec.record(tick.time, &self.dut.snapshot())?;
        }
        Ok(tick)
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.monitor.mistakes() >= self.cfg.max_mistakes {
            Some(StopReason::MistakeLimit)
        } else if self.clock.now() >= self.cfg.max_ticks {
            Some(StopReason::TimeLimit)
        } else {
            None
        }
    }

    pub fn run(&mut self) -> TbResult<Report> {
        info!(
            seed = self.cfg.seed,
            valid_p = self.cfg.valid_probability,
            last_p = self.cfg.last_probability,
            ready_p = self.cfg.ready_probability,
            max_ticks = %utils::fmt_count(self.cfg.max_ticks),
            max_mistakes = self.cfg.max_mistakes,
            "starting run"
        );
        let start = Instant::now();
        let stop_reason = loop {
            if let Some(reason) = self.stop_reason() {
                break reason;
            }
            self.step()?;
        };
        if let Some(rec) = self.recorder.as_mut() {
            rec.finish()?;
        }

        let residual = self.monitor.scoreboard().len();
        let residual_failed = self.cfg.residual_policy == ResidualPolicy::Fail && residual > 0;
        if residual > 0 {
            if residual_failed {
                warn!(residual, "expected beats left unmatched at end of run");
            } else {
                info!(residual, "expected beats left unmatched at end of run");
            }
        }
        let report = Report {
            passed: self.monitor.violations().is_empty() && !residual_failed,
            stop_reason,
            ticks: self.clock.now(),
            mistakes: self.monitor.mistakes(),
            violations: self.monitor.violations().to_vec(),
            stats: self.monitor.scoreboard().stats(),
            residual,
            seed: self.cfg.seed,
            elapsed: start.elapsed(),
        };
        info!(
            verdict = report.verdict(),
            %stop_reason,
            ticks = %utils::fmt_count(report.ticks),
            mistakes = report.mistakes,
            "run finished"
        );
        Ok(report)
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn dut(&self) -> &D {
        &self.dut
    }
}
