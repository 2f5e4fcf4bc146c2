use crate::signal::{Input, Output, SignalSnapshot};

/// Access to the device under test.
///
/// Inputs may be written at any time. Outputs only reflect the current
/// inputs after `eval()` has been called.
pub trait SimIf {
    fn set_input(&mut self, sig: Input, value: u32);
    fn get_input(&self, sig: Input) -> u32;
    fn get_output(&self, sig: Output) -> u32;
    fn eval(&mut self);

    fn input_high(&self, sig: Input) -> bool {
        self.get_input(sig) != 0
    }

    fn output_high(&self, sig: Output) -> bool {
        self.get_output(sig) != 0
    }

    fn snapshot(&self) -> SignalSnapshot {
        let mut snap = SignalSnapshot::default();
        for i in Input::ALL {
            snap.set_input(i, self.get_input(i));
        }
        for o in Output::ALL {
            snap.set_output(o, self.get_output(o));
        }
        snap
    }
}

impl<T: SimIf + ?Sized> SimIf for Box<T> {
    fn set_input(&mut self, sig: Input, value: u32) {
        (**self).set_input(sig, value)
    }
    fn get_input(&self, sig: Input) -> u32 {
        (**self).get_input(sig)
    }
    fn get_output(&self, sig: Output) -> u32 {
        (**self).get_output(sig)
    }
    fn eval(&mut self) {
        (**self).eval()
    }
}
