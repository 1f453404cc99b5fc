//! Canned misuse scenarios driven through a full [`ValidationLayer`] with a
//! stub driver, capturing everything the tracker reports.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use objtrack_core::{
    CollectingSink, Handle, ObjectTracker, QueueCaps, Severity, TrackerMode,
};
use objtrack_layer::{
    CallSuppressed, DeviceDriver, DispatchForwarder, InstanceDriver, ValidationLayer,
};

/// The misuse pattern to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// A well-behaved client: everything created is destroyed. Zero errors.
    Clean,
    /// Resources abandoned at device teardown; exercises the leak reporter.
    Leak,
    /// Command buffers freed through a pool that never allocated them.
    WrongPool,
    /// The same buffer destroyed twice; the second call is suppressed.
    DoubleDestroy,
}

impl Scenario {
    fn name(self) -> &'static str {
        match self {
            Scenario::Clean => "clean",
            Scenario::Leak => "leak",
            Scenario::WrongPool => "wrong-pool",
            Scenario::DoubleDestroy => "double-destroy",
        }
    }

    /// Whether the run produced exactly the violations this scenario is
    /// built to provoke.
    #[must_use]
    pub fn expectation_met(self, report: &ScenarioReport) -> bool {
        match self {
            Scenario::Clean => report.error_count == 0,
            Scenario::Leak => report.metrics.leaks > 0,
            Scenario::WrongPool => report
                .diagnostics
                .iter()
                .any(|d| d.message.contains("belongs to parent")),
            Scenario::DoubleDestroy => report.error_count == 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A call the scenario expected to succeed was suppressed.
    #[error("scenario aborted: {0}")]
    UnexpectedSuppression(#[from] CallSuppressed),
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One diagnostic in serializable form.
#[derive(Debug, Serialize)]
pub struct ReportedDiagnostic {
    pub severity: String,
    pub kind: &'static str,
    pub handle: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ReportedMetrics {
    pub validations: u64,
    pub violations: u64,
    pub creates: u64,
    pub destroys: u64,
    pub cascade_destroys: u64,
    pub leaks: u64,
}

/// Everything a scenario run produced.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub scenario: &'static str,
    pub error_count: usize,
    pub diagnostics: Vec<ReportedDiagnostic>,
    pub metrics: ReportedMetrics,
}

/// Stub next-layer: hands out fresh handles, executes nothing.
struct StubDriver {
    next_handle: AtomicU64,
}

impl StubDriver {
    fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(0x1000),
        }
    }

    fn fresh(&self) -> Handle {
        Handle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }
}

impl InstanceDriver for StubDriver {
    fn create_instance(&self) -> Handle {
        self.fresh()
    }

    fn destroy_instance(&self, _instance: Handle) {}

    fn enumerate_physical_devices(&self, _instance: Handle) -> Vec<Handle> {
        vec![Handle(0x11)]
    }

    fn get_queue_family_properties(&self, _physical_device: Handle) -> Vec<QueueCaps> {
        vec![QueueCaps::GRAPHICS | QueueCaps::COMPUTE | QueueCaps::TRANSFER]
    }

    fn create_device(&self, _physical_device: Handle) -> Handle {
        self.fresh()
    }
}

impl DeviceDriver for StubDriver {
    fn destroy_device(&self, _device: Handle) {}

    fn get_device_queue(&self, _device: Handle, _family: u32, _index: u32) -> Handle {
        self.fresh()
    }

    fn queue_bind_sparse(&self, _queue: Handle) {}

    fn create_buffer(&self, _device: Handle) -> Handle {
        self.fresh()
    }

    fn destroy_buffer(&self, _device: Handle, _buffer: Handle) {}

    fn create_command_pool(&self, _device: Handle) -> Handle {
        self.fresh()
    }

    fn destroy_command_pool(&self, _device: Handle, _pool: Handle) {}

    fn allocate_command_buffers(&self, _device: Handle, _pool: Handle, count: u32) -> Vec<Handle> {
        (0..count).map(|_| self.fresh()).collect()
    }

    fn free_command_buffers(&self, _device: Handle, _pool: Handle, _buffers: &[Handle]) {}

    fn create_descriptor_pool(&self, _device: Handle) -> Handle {
        self.fresh()
    }

    fn destroy_descriptor_pool(&self, _device: Handle, _pool: Handle) {}

    fn reset_descriptor_pool(&self, _device: Handle, _pool: Handle) {}

    fn allocate_descriptor_sets(&self, _device: Handle, _pool: Handle, count: u32) -> Vec<Handle> {
        (0..count).map(|_| self.fresh()).collect()
    }

    fn free_descriptor_sets(&self, _device: Handle, _pool: Handle, _sets: &[Handle]) {}

    fn create_swapchain(&self, _device: Handle) -> Handle {
        self.fresh()
    }

    fn destroy_swapchain(&self, _device: Handle, _swapchain: Handle) {}

    fn get_swapchain_images(&self, _device: Handle, _swapchain: Handle) -> Vec<Handle> {
        vec![self.fresh(), self.fresh()]
    }
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

/// Run one scenario and collect its report.
pub fn run(scenario: Scenario) -> Result<ScenarioReport, HarnessError> {
    let sink = Arc::new(CollectingSink::new());
    let tracker = ObjectTracker::with_mode(sink.clone(), TrackerMode::Enabled);
    let driver = Arc::new(StubDriver::new());
    let forwarder = DispatchForwarder::new(driver.clone(), driver);
    let layer = ValidationLayer::new(tracker, forwarder);

    tracing::info!(scenario = scenario.name(), "running scenario");
    match scenario {
        Scenario::Clean => run_clean(&layer)?,
        Scenario::Leak => run_leak(&layer)?,
        Scenario::WrongPool => run_wrong_pool(&layer)?,
        Scenario::DoubleDestroy => run_double_destroy(&layer)?,
    }

    let diagnostics: Vec<ReportedDiagnostic> = sink
        .events()
        .into_iter()
        .map(|e| ReportedDiagnostic {
            severity: severity_name(e.severity).to_owned(),
            kind: e.kind.tag(),
            handle: e.handle.to_string(),
            code: e.code.to_string(),
            message: e.message,
        })
        .collect();
    let error_count = diagnostics.iter().filter(|d| d.severity == "error").count();
    let snap = layer.tracker().metrics().snapshot();

    Ok(ScenarioReport {
        scenario: scenario.name(),
        error_count,
        diagnostics,
        metrics: ReportedMetrics {
            validations: snap.validations,
            violations: snap.violations,
            creates: snap.creates,
            destroys: snap.destroys,
            cascade_destroys: snap.cascade_destroys,
            leaks: snap.leaks,
        },
    })
}

fn run_clean(layer: &ValidationLayer) -> Result<(), CallSuppressed> {
    let instance = layer.create_instance();
    let pds = layer.enumerate_physical_devices(instance)?;
    layer.get_queue_family_properties(instance, pds[0])?;
    let device = layer.create_device(instance, pds[0])?;
    layer.get_device_queue(device, 0, 0)?;

    let buffer = layer.create_buffer(device)?;
    let pool = layer.create_command_pool(device)?;
    let buffers = layer.allocate_command_buffers(device, pool, 2, false)?;
    layer.free_command_buffers(device, pool, &buffers)?;
    layer.destroy_command_pool(device, pool)?;
    layer.destroy_buffer(device, buffer)?;

    layer.destroy_device(instance, device)?;
    layer.destroy_instance(instance)?;
    Ok(())
}

fn run_leak(layer: &ValidationLayer) -> Result<(), CallSuppressed> {
    let instance = layer.create_instance();
    let pds = layer.enumerate_physical_devices(instance)?;
    let device = layer.create_device(instance, pds[0])?;

    // Abandoned on purpose.
    layer.create_buffer(device)?;
    layer.create_buffer(device)?;
    let pool = layer.create_command_pool(device)?;
    layer.allocate_command_buffers(device, pool, 3, false)?;

    layer.destroy_device(instance, device)?;
    layer.destroy_instance(instance)?;
    Ok(())
}

fn run_wrong_pool(layer: &ValidationLayer) -> Result<(), CallSuppressed> {
    let instance = layer.create_instance();
    let pds = layer.enumerate_physical_devices(instance)?;
    let device = layer.create_device(instance, pds[0])?;

    let pool_a = layer.create_command_pool(device)?;
    let pool_b = layer.create_command_pool(device)?;
    let buffers = layer.allocate_command_buffers(device, pool_a, 1, false)?;
    // Reported as a wrong-parent violation; the free still happens.
    layer.free_command_buffers(device, pool_b, &buffers)?;

    layer.destroy_command_pool(device, pool_a)?;
    layer.destroy_command_pool(device, pool_b)?;
    layer.destroy_device(instance, device)?;
    layer.destroy_instance(instance)?;
    Ok(())
}

fn run_double_destroy(layer: &ValidationLayer) -> Result<(), CallSuppressed> {
    let instance = layer.create_instance();
    let pds = layer.enumerate_physical_devices(instance)?;
    let device = layer.create_device(instance, pds[0])?;

    let buffer = layer.create_buffer(device)?;
    layer.destroy_buffer(device, buffer)?;
    // The second destroy is the misuse under test; its suppression is the
    // expected outcome, not a harness failure.
    let _ = layer.destroy_buffer(device, buffer);

    layer.destroy_device(instance, device)?;
    layer.destroy_instance(instance)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_scenario_reports_no_errors() {
        let report = run(Scenario::Clean).unwrap();
        assert_eq!(report.error_count, 0);
        assert!(report.metrics.leaks == 0);
    }

    #[test]
    fn leak_scenario_reports_every_abandoned_object() {
        let report = run(Scenario::Leak).unwrap();
        // Two buffers, one pool, three command buffers.
        assert_eq!(report.metrics.leaks, 6);
        assert!(report.error_count >= 6);
    }

    #[test]
    fn wrong_pool_scenario_reports_exactly_one_violation() {
        let report = run(Scenario::WrongPool).unwrap();
        assert_eq!(report.error_count, 1);
        assert!(report.diagnostics.iter().any(|d| d.message.contains("belongs to parent")));
    }

    #[test]
    fn double_destroy_scenario_reports_the_second_call() {
        let report = run(Scenario::DoubleDestroy).unwrap();
        assert_eq!(report.error_count, 1);
        assert_eq!(report.metrics.leaks, 0);
    }
}
