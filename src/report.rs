use std::io::{self, Write};
use std::time::Duration;

use prettytable::{Cell, Row, Table};

use crate::runner::StopReason;
use crate::testbench::{ScoreboardStats, SimTime, Violation};
use crate::utils::fmt_count;

/// Outcome of one run.
#[derive(Clone, Debug)]
pub struct Report {
    pub passed: bool,
    pub stop_reason: StopReason,
    pub ticks: SimTime,
    pub mistakes: u32,
    pub violations: Vec<Violation>,
    pub stats: ScoreboardStats,
    /// Expected beats still queued at the end.
    pub residual: usize,
    pub seed: u64,
    pub elapsed: Duration,
}

impl Report {
    pub fn verdict(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }

    pub fn ticks_per_sec(&self) -> f64 {
        self.ticks as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON)
    }

    pub fn result_str(&self) -> String {
        format!(
            "{}: seed={}, ticks={}, mistakes={}, expected={}, received={}, matched={}, residual={}, stopped on {}",
            self.verdict(),
            self.seed,
            self.ticks,
            self.mistakes,
            self.stats.expected,
            self.stats.received,
            self.stats.matched,
            self.residual,
            self.stop_reason
        )
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(Row::new(vec![Cell::new("Run"), Cell::new(self.verdict())]));
        let rows = [
            ("Seed", self.seed.to_string()),
            ("Stopped on", self.stop_reason.to_string()),
            ("Simulation time", format!("{} ticks", fmt_count(self.ticks))),
            ("Mistakes", self.mistakes.to_string()),
            ("Beats expected", fmt_count(self.stats.expected)),
            ("Beats received", fmt_count(self.stats.received)),
            ("Beats matched", fmt_count(self.stats.matched)),
            ("Data/last errors", fmt_count(self.stats.errors)),
            ("Spurious beats", fmt_count(self.stats.spurious)),
            ("Peak occupancy", self.stats.peak.to_string()),
            ("Residual beats", self.residual.to_string()),
            ("Real time", format!("{:.3} s", self.elapsed.as_secs_f64())),
            ("Simulation speed", format!("{:.0} ticks/s", self.ticks_per_sec())),
        ];
        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }
        table
    }

    /// Summary table followed by the PASS/FAIL line.
    pub fn write_outcome<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        self.summary_table().print(out)?;
        writeln!(out, "{}", self.verdict())
    }
}
