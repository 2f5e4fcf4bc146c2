use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, error, info};

use crate::signal::{Input, Output};
use crate::sim_if::SimIf;

/// Simulated time in ticks. Both clock edges advance it by one.
pub type SimTime = u64;

/// One transfer on the stream: a payload byte and its packet-end flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Beat {
    pub data: u8,
    pub last: bool,
}

impl Beat {
    pub fn new(data: u8, last: bool) -> Self {
        Self { data, last }
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x} [L:{}]", self.data, self.last as u8)
    }
}

/*
 * SCOREBOARD
 */
/// Outcome of checking one received beat against the scoreboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compare {
    Match,
    Mismatch { expected: Beat },
    Empty,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreboardStats {
    pub expected: u64,
    pub received: u64,
    pub matched: u64,
    pub errors: u64,
    pub spurious: u64,
    pub peak: usize,
}

/// Expected beats in emission order.
#[derive(Debug, Default)]
pub struct Scoreboard {
    exp_q: VecDeque<Beat>,
    stats: ScoreboardStats,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exp(&mut self, beat: Beat) {
        self.exp_q.push_back(beat);
        self.stats.expected += 1;
        self.stats.peak = self.stats.peak.max(self.exp_q.len());
    }

    /// Checks a received beat against the head and pops it.
    /// Nothing is popped when no beat is expected.
    pub fn add_recv(&mut self, actual: Beat) -> Compare {
        self.stats.received += 1;
        match self.exp_q.pop_front() {
            None => {
                self.stats.spurious += 1;
                Compare::Empty
            }
            Some(expected) if expected == actual => {
                self.stats.matched += 1;
                Compare::Match
            }
            Some(expected) => {
                self.stats.errors += 1;
                Compare::Mismatch { expected }
            }
        }
    }

    pub fn front(&self) -> Option<&Beat> {
        self.exp_q.front()
    }

    pub fn len(&self) -> usize {
        self.exp_q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exp_q.is_empty()
    }

    pub fn stats(&self) -> ScoreboardStats {
        self.stats
    }

    pub fn result_str(&self) -> String {
        let s = &self.stats;
        format!(
            "expected={}, received={}, matched={}, errors={}, spurious={}, expQ: {}",
            s.expected,
            s.received,
            s.matched,
            s.errors,
            s.spurious,
            self.exp_q.len()
        )
    }
}

/*
 * VIOLATIONS
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// Output handshake with nothing expected.
    Spurious,
    Data,
    Last,
    DataAndLast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Violation {
    pub time: SimTime,
    pub kind: ViolationKind,
    pub expected: Option<Beat>,
    pub actual: Beat,
}

impl Violation {
    fn spurious(time: SimTime, actual: Beat) -> Self {
        Self {
            time,
            kind: ViolationKind::Spurious,
            expected: None,
            actual,
        }
    }

    fn mismatch(time: SimTime, expected: Beat, actual: Beat) -> Self {
        let kind = match (expected.data != actual.data, expected.last != actual.last) {
            (true, true) => ViolationKind::DataAndLast,
            (false, true) => ViolationKind::Last,
            _ => ViolationKind::Data,
        };
        Self {
            time,
            kind,
            expected: Some(expected),
            actual,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected {
            Some(exp) => write!(
                f,
                "FAIL! Time: {} | Exp: {} | Got: {}",
                self.time, exp, self.actual
            ),
            None => write!(
                f,
                "DUT asserted valid with no expected data at {} | Got: {}",
                self.time, self.actual
            ),
        }
    }
}

/*
 * MONITOR
 */
/// Handshakes observed on one sampled edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Handshake {
    pub input: bool,
    pub output: bool,
}

/// Watches both stream ports, feeding the scoreboard from the input side and
/// checking the output side against it.
#[derive(Debug, Default)]
pub struct Monitor {
    scoreboard: Scoreboard,
    mistakes: u32,
    violations: Vec<Violation>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples both ports. Call on a rising edge, out of reset, after the
    /// inputs for this edge were driven and evaluated.
    pub fn sample<D: SimIf + ?Sized>(&mut self, dut: &D, time: SimTime) -> Handshake {
        let input = dut.input_high(Input::STvalid) && dut.output_high(Output::STready);
        if input {
            self.record_input(Beat::new(
                dut.get_input(Input::STdata) as u8,
                dut.input_high(Input::STlast),
            ));
        }
        let output = dut.output_high(Output::MTvalid) && dut.input_high(Input::MTready);
        if output {
            let actual = Beat::new(
                dut.get_output(Output::MTdata) as u8,
                dut.output_high(Output::MTlast),
            );
            self.record_output(time, actual);
        }
        Handshake { input, output }
    }

    pub fn record_input(&mut self, beat: Beat) {
        self.scoreboard.add_exp(beat);
    }

    /// Checks an accepted output beat, returning the violation if it is one.
    pub fn record_output(&mut self, time: SimTime, actual: Beat) -> Option<&Violation> {
        let violation = match self.scoreboard.add_recv(actual) {
            Compare::Match => return None,
            Compare::Mismatch { expected } => Violation::mismatch(time, expected, actual),
            Compare::Empty => Violation::spurious(time, actual),
        };
        error!("{}", violation);
        self.mistakes += 1;
        self.violations.push(violation);
        self.violations.last()
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }
}

/*
 * CLOCK / RESET
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub time: SimTime,
    pub rising: bool,
    pub in_reset: bool,
}

/// Toggles the clock once per tick and holds the active-low reset for the
/// first `reset_ticks` ticks. Reset is never asserted again.
#[derive(Debug)]
pub struct ClockReset {
    time: SimTime,
    reset_ticks: SimTime,
    clk: bool,
    released: bool,
}

impl ClockReset {
    pub fn new(reset_ticks: SimTime) -> Self {
        Self {
            time: 0,
            reset_ticks,
            clk: false,
            released: false,
        }
    }

    /// Drives clock and reset for the next tick; the DUT still has to be
    /// evaluated.
    pub fn advance<D: SimIf + ?Sized>(&mut self, dut: &mut D) -> Tick {
        let time = self.time;
        self.time += 1;
        self.clk = !self.clk;
        if !self.released && time >= self.reset_ticks {
            self.released = true;
            info!(time, "reset released");
        }
        dut.set_input(Input::ArstN, self.released as u32);
        dut.set_input(Input::Clk, self.clk as u32);
        debug!(time, clk = self.clk, "tick");
        Tick {
            time,
            rising: self.clk,
            in_reset: !self.released,
        }
    }

    /// Ticks elapsed so far.
    pub fn now(&self) -> SimTime {
        self.time
    }

    pub fn in_reset(&self) -> bool {
        !self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Probe;

    #[test]
    fn scoreboard_is_fifo() {
        let mut sb = Scoreboard::new();
        sb.add_exp(Beat::new(1, false));
        sb.add_exp(Beat::new(2, true));
        assert_eq!(sb.front(), Some(&Beat::new(1, false)));
        assert_eq!(sb.add_recv(Beat::new(1, false)), Compare::Match);
        assert_eq!(sb.add_recv(Beat::new(2, true)), Compare::Match);
        assert!(sb.is_empty());
        assert_eq!(sb.stats().matched, 2);
        assert_eq!(sb.stats().peak, 2);
    }

    #[test]
    fn single_transfer_round_trip() {
        let mut dut = Probe::new();
        let mut mon = Monitor::new();

        dut.set_input(Input::STdata, 0x5a);
        dut.set_input(Input::STlast, 1);
        dut.set_input(Input::STvalid, 1);
        dut.set_output(Output::STready, 1);
        let hs = mon.sample(&dut, 200);
        assert_eq!(hs, Handshake { input: true, output: false });
        assert_eq!(mon.scoreboard().len(), 1);

        dut.set_input(Input::STvalid, 0);
        dut.set_input(Input::MTready, 1);
        dut.set_output(Output::MTvalid, 1);
        dut.set_output(Output::MTdata, 0x5a);
        dut.set_output(Output::MTlast, 1);
        let hs = mon.sample(&dut, 202);
        assert_eq!(hs, Handshake { input: false, output: true });
        assert!(mon.scoreboard().is_empty());
        assert_eq!(mon.mistakes(), 0);
    }

    #[test]
    fn corrupted_output_counts_once() {
        let mut mon = Monitor::new();
        mon.record_input(Beat::new(0x5a, true));
        let v = *mon.record_output(300, Beat::new(0x00, true)).unwrap();
        assert_eq!(v.kind, ViolationKind::Data);
        assert_eq!(v.expected, Some(Beat::new(0x5a, true)));
        assert_eq!(v.actual, Beat::new(0x00, true));
        assert_eq!(v.time, 300);
        assert_eq!(mon.mistakes(), 1);
        assert_eq!(mon.violations().len(), 1);
        assert_eq!(
            v.to_string(),
            "FAIL! Time: 300 | Exp: 0x5a [L:1] | Got: 0x00 [L:1]"
        );
    }

    #[test]
    fn last_flag_mismatch_is_a_violation() {
        let mut mon = Monitor::new();
        mon.record_input(Beat::new(0x11, false));
        let v = *mon.record_output(10, Beat::new(0x11, true)).unwrap();
        assert_eq!(v.kind, ViolationKind::Last);
        mon.record_input(Beat::new(0x11, false));
        let v = *mon.record_output(12, Beat::new(0x12, true)).unwrap();
        assert_eq!(v.kind, ViolationKind::DataAndLast);
        assert_eq!(mon.mistakes(), 2);
    }

    #[test]
    fn spurious_output_does_not_pop() {
        let mut dut = Probe::new();
        let mut mon = Monitor::new();
        dut.set_input(Input::MTready, 1);
        dut.set_output(Output::MTvalid, 1);
        dut.set_output(Output::MTdata, 0x33);
        mon.sample(&dut, 150);
        assert_eq!(mon.mistakes(), 1);
        assert!(mon.scoreboard().is_empty());
        assert_eq!(mon.violations()[0].kind, ViolationKind::Spurious);
        assert_eq!(mon.violations()[0].expected, None);
        assert_eq!(mon.scoreboard().stats().spurious, 1);
    }

    #[test]
    fn stalled_output_is_not_sampled() {
        let mut dut = Probe::new();
        let mut mon = Monitor::new();
        dut.set_output(Output::MTvalid, 1);
        dut.set_input(Input::MTready, 0);
        assert_eq!(mon.sample(&dut, 0), Handshake::default());
        assert_eq!(mon.mistakes(), 0);
    }

    #[test]
    fn clock_toggles_and_reset_releases_once() {
        let mut dut = Probe::new();
        let mut clk = ClockReset::new(100);
        assert!(clk.in_reset());
        let first = clk.advance(&mut dut);
        assert!(first.rising);
        assert!(first.in_reset);
        assert_eq!(dut.get_input(Input::ArstN), 0);
        assert_eq!(dut.get_input(Input::Clk), 1);

        let mut prev = first;
        for _ in 1..100 {
            let t = clk.advance(&mut dut);
            assert_ne!(t.rising, prev.rising);
            assert!(t.in_reset);
            prev = t;
        }
        let released = clk.advance(&mut dut);
        assert_eq!(released.time, 100);
        assert!(!released.in_reset);
        assert!(!clk.in_reset());
        assert_eq!(dut.get_input(Input::ArstN), 1);
        for _ in 0..1000 {
            assert!(!clk.advance(&mut dut).in_reset);
        }
        assert_eq!(clk.now(), 1101);
    }
}
