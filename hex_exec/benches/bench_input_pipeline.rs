//! # Input Pipeline Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::input::{RawReport, AXIS_NEUTRAL};
use hex_lib::{input::InputPipeline, mode_ctrl::ModeCtrl};
use util::module::State;

fn input_pipeline_benchmark(c: &mut Criterion) {
    // ---- Build a sweep of reports ----

    // Sticks sweep a circle while the trigger ramps up and down, so most reports change
    let reports: Vec<RawReport> = (0..360)
        .map(|i| {
            let angle = (i as f64).to_radians();
            let axis = |v: f64| (AXIS_NEUTRAL as f64 + v * 30000.0) as u16;

            RawReport {
                left_x: axis(angle.cos()),
                left_y: axis(angle.sin()),
                right_x: axis(-angle.sin()),
                right_y: axis(angle.cos()),
                trigger: AXIS_NEUTRAL + (i as u16 % 180) * 50,
                buttons: if i % 90 == 0 { vec![10] } else { vec![] },
                ..RawReport::neutral()
            }
        })
        .collect();

    // Bench decode and filter only
    let mut pipeline = InputPipeline::default();
    c.bench_function("InputPipeline::process", |b| {
        b.iter(|| {
            for r in reports.iter() {
                black_box(pipeline.process(r));
            }
        })
    });

    // Bench the full per-report path through the coordinator
    let mut pipeline = InputPipeline::new(7000.0, true);
    let mut mode_ctrl = ModeCtrl::default();
    c.bench_function("InputPipeline::process + ModeCtrl::proc", |b| {
        b.iter(|| {
            for r in reports.iter() {
                for e in pipeline.process(r) {
                    black_box(mode_ctrl.proc(&e).unwrap());
                }
            }
        })
    });
}

criterion_group!(benches, input_pipeline_benchmark);
criterion_main!(benches);
