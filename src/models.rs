//! Software DUTs implementing the stream interface.
//!
//! `AxisFifo` stands in for the HDL FIFO so the harness runs without a
//! simulator. The wrappers inject faults for testing the harness itself.

use std::collections::VecDeque;

use crate::signal::{Input, Output, SignalSnapshot};
use crate::sim_if::SimIf;
use crate::testbench::Beat;

/// Outputs are whatever the caller last set; `eval()` does nothing.
#[derive(Clone, Debug, Default)]
pub struct Probe {
    pins: SignalSnapshot,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_output(&mut self, sig: Output, value: u32) {
        self.pins.set_output(sig, value);
    }
}

impl SimIf for Probe {
    fn set_input(&mut self, sig: Input, value: u32) {
        self.pins.set_input(sig, value);
    }
    fn get_input(&self, sig: Input) -> u32 {
        self.pins.input(sig)
    }
    fn get_output(&self, sig: Output) -> u32 {
        self.pins.output(sig)
    }
    fn eval(&mut self) {}
}

/// Edge detector shared by the clocked models.
#[derive(Clone, Copy, Debug, Default)]
struct EdgeDetect {
    prev: bool,
}

impl EdgeDetect {
    fn rising(&mut self, clk: bool) -> bool {
        let rising = clk && !self.prev;
        self.prev = clk;
        rising
    }
}

/// Synchronous stream FIFO with asynchronous active-low reset.
///
/// Both handshakes are captured on the rising edge from the values present
/// before the edge. `s_axis_tready_o` is high while not full and the head is
/// presented on the master port while not empty.
#[derive(Clone, Debug)]
pub struct AxisFifo {
    pins: SignalSnapshot,
    edge: EdgeDetect,
    mem: VecDeque<Beat>,
    depth: usize,
    drop_every: Option<u64>,
    accepted: u64,
}

impl AxisFifo {
    pub fn new(depth: usize) -> Self {
        Self {
            pins: SignalSnapshot::default(),
            edge: EdgeDetect::default(),
            mem: VecDeque::with_capacity(depth),
            depth: depth.max(1),
            drop_every: None,
            accepted: 0,
        }
    }

    /// A FIFO that acknowledges every `n`-th input beat but never stores it.
    pub fn lossy(depth: usize, n: u64) -> Self {
        Self {
            drop_every: Some(n.max(1)),
            ..Self::new(depth)
        }
    }

    pub fn len(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    fn clock_edge(&mut self) {
        let push = self.pins.input(Input::STvalid) != 0 && self.pins.output(Output::STready) != 0;
        let pop = self.pins.output(Output::MTvalid) != 0 && self.pins.input(Input::MTready) != 0;
        if pop {
            self.mem.pop_front();
        }
        if push {
            self.accepted += 1;
            let dropped = matches!(self.drop_every, Some(n) if self.accepted % n == 0);
            if !dropped {
                self.mem.push_back(Beat::new(
                    self.pins.input(Input::STdata) as u8,
                    self.pins.input(Input::STlast) != 0,
                ));
            }
        }
    }

    fn update_outputs(&mut self) {
        let ready = self.mem.len() < self.depth;
        let head = self.mem.front().copied();
        self.pins.set_output(Output::STready, ready as u32);
        self.pins.set_output(Output::MTvalid, head.is_some() as u32);
        let head = head.unwrap_or_default();
        self.pins.set_output(Output::MTdata, head.data as u32);
        self.pins.set_output(Output::MTlast, head.last as u32);
    }
}

impl SimIf for AxisFifo {
    fn set_input(&mut self, sig: Input, value: u32) {
        self.pins.set_input(sig, value);
    }
    fn get_input(&self, sig: Input) -> u32 {
        self.pins.input(sig)
    }
    fn get_output(&self, sig: Output) -> u32 {
        self.pins.output(sig)
    }
    fn eval(&mut self) {
        let rising = self.edge.rising(self.pins.input(Input::Clk) != 0);
        if self.pins.input(Input::ArstN) == 0 {
            self.mem.clear();
            self.accepted = 0;
            self.pins.set_output(Output::STready, 0);
            self.pins.set_output(Output::MTvalid, 0);
            self.pins.set_output(Output::MTdata, 0);
            self.pins.set_output(Output::MTlast, 0);
            return;
        }
        if rising {
            self.clock_edge();
        }
        self.update_outputs();
    }
}

/// Flips bits of emitted data.
///
/// Counts output handshakes and XORs `m_axis_tdata_o` with `mask` while the
/// beat on the port is the `nth` one (zero based), or on every beat when no
/// index is given.
#[derive(Clone, Debug)]
pub struct Corrupt<D> {
    inner: D,
    nth: Option<u64>,
    mask: u8,
    emitted: u64,
    edge: EdgeDetect,
}

impl<D: SimIf> Corrupt<D> {
    pub fn nth(inner: D, nth: u64, mask: u8) -> Self {
        Self {
            inner,
            nth: Some(nth),
            mask,
            emitted: 0,
            edge: EdgeDetect::default(),
        }
    }

    pub fn every(inner: D, mask: u8) -> Self {
        Self {
            nth: None,
            ..Self::nth(inner, 0, mask)
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn corrupting(&self) -> bool {
        self.nth.map_or(true, |n| n == self.emitted)
    }
}

impl<D: SimIf> SimIf for Corrupt<D> {
    fn set_input(&mut self, sig: Input, value: u32) {
        self.inner.set_input(sig, value)
    }
    fn get_input(&self, sig: Input) -> u32 {
        self.inner.get_input(sig)
    }
    fn get_output(&self, sig: Output) -> u32 {
        let value = self.inner.get_output(sig);
        if sig == Output::MTdata && self.corrupting() {
            value ^ self.mask as u32
        } else {
            value
        }
    }
    fn eval(&mut self) {
        let rising = self.edge.rising(self.inner.input_high(Input::Clk));
        if rising
            && self.inner.input_high(Input::ArstN)
            && self.inner.output_high(Output::MTvalid)
            && self.inner.input_high(Input::MTready)
        {
            self.emitted += 1;
        }
        self.inner.eval()
    }
}

/// Raises `m_axis_tvalid_o` while the wrapped DUT has nothing to send, until
/// `budget` such beats have been accepted.
#[derive(Clone, Debug)]
pub struct Spurious<D> {
    inner: D,
    budget: u32,
    edge: EdgeDetect,
}

impl<D: SimIf> Spurious<D> {
    pub fn new(inner: D, budget: u32) -> Self {
        Self {
            inner,
            budget,
            edge: EdgeDetect::default(),
        }
    }

    fn forcing(&self) -> bool {
        self.budget > 0
            && self.inner.input_high(Input::ArstN)
            && !self.inner.output_high(Output::MTvalid)
    }
}

impl<D: SimIf> SimIf for Spurious<D> {
    fn set_input(&mut self, sig: Input, value: u32) {
        self.inner.set_input(sig, value)
    }
    fn get_input(&self, sig: Input) -> u32 {
        self.inner.get_input(sig)
    }
    fn get_output(&self, sig: Output) -> u32 {
        if sig == Output::MTvalid && self.forcing() {
            1
        } else {
            self.inner.get_output(sig)
        }
    }
    fn eval(&mut self) {
        let rising = self.edge.rising(self.inner.input_high(Input::Clk));
        if rising && self.forcing() && self.inner.input_high(Input::MTready) {
            self.budget -= 1;
        }
        self.inner.eval()
    }
}
