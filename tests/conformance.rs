use axistb::prelude::*;

fn cfg(max_ticks: SimTime) -> TbConfig {
    TbConfig {
        max_ticks,
        ..Default::default()
    }
}

#[test]
fn fifo_passes_reference_settings() {
    let mut runner = Runner::new(AxisFifo::new(16), cfg(200_000)).unwrap();
    let report = runner.run().unwrap();
    assert!(report.passed, "{}", report.result_str());
    assert_eq!(report.verdict(), "PASS");
    assert_eq!(report.stop_reason, StopReason::TimeLimit);
    assert_eq!(report.mistakes, 0);
    assert!(report.stats.matched > 10_000);
    assert_eq!(
        report.stats.expected,
        report.stats.matched + report.residual as u64
    );
}

#[test]
fn same_seed_same_run() {
    let a = Runner::new(AxisFifo::new(8), cfg(20_000)).unwrap().run().unwrap();
    let b = Runner::new(AxisFifo::new(8), cfg(20_000)).unwrap().run().unwrap();
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.residual, b.residual);

    let other = TbConfig {
        seed: 43,
        ..cfg(20_000)
    };
    let c = Runner::new(AxisFifo::new(8), other).unwrap().run().unwrap();
    assert_ne!(a.stats, c.stats);
}

#[test]
fn single_corrupted_beat_is_reported_once() {
    let dut = Corrupt::nth(AxisFifo::new(16), 3, 0xff);
    let report = Runner::new(dut, cfg(50_000)).unwrap().run().unwrap();
    assert!(!report.passed);
    assert_eq!(report.mistakes, 1);
    assert_eq!(report.stop_reason, StopReason::TimeLimit);
    let v = report.violations[0];
    assert_eq!(v.kind, ViolationKind::Data);
    let expected = v.expected.unwrap();
    assert_eq!(expected.data ^ 0xff, v.actual.data);
    assert_eq!(expected.last, v.actual.last);
}

#[test]
fn mistake_budget_stops_run_early() {
    let dut = Corrupt::every(AxisFifo::new(16), 0x01);
    let report = Runner::new(dut, cfg(1_000_000)).unwrap().run().unwrap();
    assert_eq!(report.stop_reason, StopReason::MistakeLimit);
    assert_eq!(report.mistakes, 15);
    assert_eq!(report.violations.len(), 15);
    assert!(report.ticks < 1_000_000);
    assert_eq!(report.verdict(), "FAIL");
}

#[test]
fn spurious_valid_fails_run() {
    let dut = Spurious::new(AxisFifo::new(16), 3);
    let config = TbConfig {
        valid_probability: 0.0,
        ..cfg(20_000)
    };
    let report = Runner::new(dut, config).unwrap().run().unwrap();
    assert!(!report.passed);
    assert_eq!(report.mistakes, 3);
    assert_eq!(report.stats.spurious, 3);
    assert!(report
        .violations
        .iter()
        .all(|v| v.kind == ViolationKind::Spurious && v.expected.is_none()));
}

#[test]
fn lossy_fifo_is_caught_by_later_mismatch() {
    let report = Runner::new(AxisFifo::lossy(16, 5), cfg(20_000))
        .unwrap()
        .run()
        .unwrap();
    assert!(!report.passed);
    assert!(report
        .violations
        .iter()
        .any(|v| v.kind != ViolationKind::Spurious));
}

#[test]
fn writes_vcd_trace() {
    let path = std::env::temp_dir().join(format!("axistb-trace-{}.vcd", std::process::id()));
    let config = TbConfig {
        trace_path: Some(path.clone()),
        ..cfg(300)
    };
    Runner::new(AxisFifo::new(4), config).unwrap().run().unwrap();
    let vcd = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(vcd.contains("$var wire 1 \" arstn_i $end"));
    assert!(vcd.contains("$enddefinitions $end"));
    assert!(vcd.contains("#100\n"));
    assert!(vcd.contains("#299\n"));
}

#[test]
fn custom_recorder_sees_every_tick() {
    struct Count(std::rc::Rc<std::cell::Cell<u64>>);
    impl WaveformRecorder for Count {
        fn record(&mut self, _time: SimTime, _snap: &SignalSnapshot) -> TbResult<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
        fn finish(&mut self) -> TbResult<()> {
            Ok(())
        }
    }
    let seen = std::rc::Rc::new(std::cell::Cell::new(0));
    let mut runner = Runner::new(AxisFifo::new(4), cfg(777))
        .unwrap()
        .with_recorder(Count(seen.clone()));
    runner.run().unwrap();
    assert_eq!(seen.get(), 777);
}
