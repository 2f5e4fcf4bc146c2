use std::fmt;

/// Signals driven by the testbench.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    Clk,
    ArstN,
    STdata,
    STvalid,
    STlast,
    MTready,
}

/// Signals driven by the DUT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Output {
    STready,
    MTdata,
    MTvalid,
    MTlast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    In(Input),
    Out(Output),
}

impl Input {
    pub const ALL: [Input; 6] = [
        Input::Clk,
        Input::ArstN,
        Input::STdata,
        Input::STvalid,
        Input::STlast,
        Input::MTready,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Input::Clk => "clk_i",
            Input::ArstN => "arstn_i",
            Input::STdata => "s_axis_tdata_i",
            Input::STvalid => "s_axis_tvalid_i",
            Input::STlast => "s_axis_tlast_i",
            Input::MTready => "m_axis_tready_i",
        }
    }

    pub fn width(self) -> u32 {
        match self {
            Input::STdata => 8,
            _ => 1,
        }
    }
}

impl Output {
    pub const ALL: [Output; 4] = [
        Output::STready,
        Output::MTdata,
        Output::MTvalid,
        Output::MTlast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Output::STready => "s_axis_tready_o",
            Output::MTdata => "m_axis_tdata_o",
            Output::MTvalid => "m_axis_tvalid_o",
            Output::MTlast => "m_axis_tlast_o",
        }
    }

    pub fn width(self) -> u32 {
        match self {
            Output::MTdata => 8,
            _ => 1,
        }
    }
}

impl Signal {
    /// Every signal of the interface, in declaration order.
    pub const ALL: [Signal; 10] = [
        Signal::In(Input::Clk),
        Signal::In(Input::ArstN),
        Signal::In(Input::STdata),
        Signal::In(Input::STvalid),
        Signal::In(Input::STlast),
        Signal::Out(Output::STready),
        Signal::Out(Output::MTdata),
        Signal::Out(Output::MTvalid),
        Signal::Out(Output::MTlast),
        Signal::In(Input::MTready),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Signal::In(i) => i.name(),
            Signal::Out(o) => o.name(),
        }
    }

    pub fn width(self) -> u32 {
        match self {
            Signal::In(i) => i.width(),
            Signal::Out(o) => o.width(),
        }
    }

    pub fn mask(self) -> u32 {
        mask(self.width())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Value of every interface signal at one instant.
///
/// Values are truncated to the signal width on write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalSnapshot {
    inputs: [u32; 6],
    outputs: [u32; 4],
}

impl SignalSnapshot {
    pub fn input(&self, sig: Input) -> u32 {
        self.inputs[sig as usize]
    }

    pub fn output(&self, sig: Output) -> u32 {
        self.outputs[sig as usize]
    }

    pub fn set_input(&mut self, sig: Input, value: u32) {
        self.inputs[sig as usize] = value & mask(sig.width());
    }

    pub fn set_output(&mut self, sig: Output, value: u32) {
        self.outputs[sig as usize] = value & mask(sig.width());
    }

    pub fn get(&self, sig: Signal) -> u32 {
        match sig {
            Signal::In(i) => self.input(i),
            Signal::Out(o) => self.output(o),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_truncated_to_width() {
        let mut snap = SignalSnapshot::default();
        snap.set_input(Input::STdata, 0x1a5);
        snap.set_input(Input::STvalid, 2);
        snap.set_output(Output::MTlast, 3);
        assert_eq!(snap.input(Input::STdata), 0xa5);
        assert_eq!(snap.input(Input::STvalid), 0);
        assert_eq!(snap.output(Output::MTlast), 1);
    }

    #[test]
    fn signal_names_are_unique() {
        let mut names: Vec<_> = Signal::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Signal::ALL.len());
        assert_eq!(Signal::In(Input::STdata).mask(), 0xff);
    }
}
