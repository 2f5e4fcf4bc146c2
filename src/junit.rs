use std::fs::File;
use std::path::Path;

use junit_report::{Duration, ReportBuilder, TestCaseBuilder, TestSuiteBuilder};

use crate::error::{TbError, TbResult};
use crate::report::Report;

/// Writes the run as a single JUnit test case.
pub fn write_junit<P: AsRef<Path>>(report: &Report, suite: &str, path: P) -> TbResult<()> {
    let time = Duration::seconds_f64(report.elapsed.as_secs_f64());
    let tc = if report.passed {
        TestCaseBuilder::success("axis_conformance", time)
    } else {
        TestCaseBuilder::failure("axis_conformance", time, "failure", &report.result_str())
    }
    .build();

    let test_suite = TestSuiteBuilder::new(suite).add_testcases(vec![tc]).build();
    let junit = ReportBuilder::new().add_testsuite(test_suite).build();
    let file = File::create(path)?;
    junit
        .write_xml(file)
        .map_err(|e| TbError::Report(format!("{:?}", e)))
}
