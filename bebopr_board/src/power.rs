//! I/O power sequencing.
//!
//! The BeBoPr I/O supply is switched by one or two GPIO lines. On the
//! legacy 3.2 kernel the lines must be exported and configured as outputs
//! first; device-tree kernels hand them over already configured.
//!
//! Failures are logged and counted but never abort the sequence, so a
//! partially working board still gets every remaining line switched.

use crate::gpio::{Direction, GpioError, GpioOp, GpioPort};
use bebopr_common::board::variant::{HardwareVariant, PowerLine};
use bebopr_common::kernel::KernelGeneration;
use tracing::{info, warn};

/// A single failed GPIO write.
#[derive(Debug)]
pub struct GpioFailure {
    pub pin: u32,
    pub op: GpioOp,
    pub error: GpioError,
}

/// Outcome of one power sequence.
#[derive(Debug, Default)]
pub struct SequenceReport {
    /// Number of GPIO writes attempted.
    pub attempted: usize,
    pub failures: Vec<GpioFailure>,
}

impl SequenceReport {
    /// True when every write succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives the power enable lines through a `GpioPort`.
pub struct PowerSequencer<'a> {
    lines: Vec<PowerLine>,
    kernel: KernelGeneration,
    port: &'a mut dyn GpioPort,
}

impl<'a> PowerSequencer<'a> {
    pub fn new(lines: Vec<PowerLine>, kernel: KernelGeneration, port: &'a mut dyn GpioPort) -> Self {
        Self {
            lines,
            kernel,
            port,
        }
    }

    /// Sequencer for the enable lines of `hardware`.
    pub fn for_hardware(
        hardware: HardwareVariant,
        kernel: KernelGeneration,
        port: &'a mut dyn GpioPort,
    ) -> Self {
        Self::new(hardware.power_lines(), kernel, port)
    }

    /// Assert every enable line.
    pub fn power_on(&mut self) -> SequenceReport {
        let mut report = SequenceReport::default();
        let lines = self.lines.clone();

        if self.kernel.is_legacy() {
            for line in &lines {
                self.step(&mut report, GpioOp::Export, line.gpio);
                self.step(&mut report, GpioOp::Direction(Direction::Out), line.gpio);
            }
        }
        for line in &lines {
            self.step(&mut report, GpioOp::Value(line.on_level()), line.gpio);
        }

        info!("Turned BEBOPR I/O power on");
        report
    }

    /// Release every enable line.
    pub fn power_off(&mut self) -> SequenceReport {
        let mut report = SequenceReport::default();
        let lines = self.lines.clone();

        for line in &lines {
            self.step(&mut report, GpioOp::Value(line.off_level()), line.gpio);
        }
        if self.kernel.is_legacy() {
            for line in &lines {
                self.step(&mut report, GpioOp::Direction(Direction::In), line.gpio);
                self.step(&mut report, GpioOp::Unexport, line.gpio);
            }
        }

        info!("Turned BEBOPR I/O power off");
        report
    }

    fn step(&mut self, report: &mut SequenceReport, op: GpioOp, pin: u32) {
        report.attempted += 1;
        if let Err(error) = self.port.apply(op, pin) {
            warn!("gpio{pin} {op} failed: {error}");
            report.failures.push(GpioFailure { pin, op, error });
        }
    }
}
