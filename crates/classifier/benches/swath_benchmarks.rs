//! Benchmarks for the classification pass.
//!
//! Run with: cargo bench --package classifier --bench swath_benchmarks

use channel_data::{Dataset, DatasetHeader, LogicalChannel, Sensor};
use classifier::{
    classify_swath, probest, AlgorithmMode, ClassificationOutput, ClassifierConfig,
    CoefficientTable, PassInputs, PixelInput, Surface,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use test_utils::{acquisition_time, encoded_layer, test_grid, COEFFICIENTS_YAML};

/// Generate a noisy mixed scene of ice, water and cloud.
fn generate_scene(width: usize, height: usize) -> (Dataset, Dataset) {
    let mut rng = rand::thread_rng();
    let n = width * height;
    let mut planes: Vec<Vec<f64>> = vec![Vec::with_capacity(n); 5];
    let mut sza = Vec::with_capacity(n);

    for i in 0..n {
        // Bands of ice, open water and cloud across the swath
        let (a1, t4) = match (i % width) * 3 / width {
            0 => (60.0, 255.0),
            1 => (6.0, 272.0),
            _ => (45.0, 235.0),
        };
        planes[0].push(a1 + rng.gen_range(-5.0..5.0));
        planes[1].push(a1 * 0.9 + rng.gen_range(-5.0..5.0));
        planes[2].push(8.0 + rng.gen_range(-3.0..3.0));
        planes[3].push(t4 + rng.gen_range(-3.0..3.0));
        planes[4].push(t4 - rng.gen_range(0.0..2.0));
        sza.push(55.0 + 20.0 * (i / width) as f64 / height as f64);
    }

    let channels = [
        LogicalChannel::Ch1,
        LogicalChannel::Ch2,
        LogicalChannel::Ch3a,
        LogicalChannel::Ch4,
        LogicalChannel::Ch5,
    ];
    let layers = channels
        .iter()
        .zip(&planes)
        .map(|(ch, values)| encoded_layer(ch.pattern(Sensor::Avhrr), values))
        .collect();

    let header = DatasetHeader::new(
        "NOAA-19",
        Sensor::Avhrr,
        acquisition_time(),
        test_grid(width, height),
    );
    let image = Dataset::new(header.clone(), layers).unwrap();
    let angles = Dataset::new(header, vec![encoded_layer("SOZ", &sza)]).unwrap();
    (image, angles)
}

// =============================================================================
// ESTIMATOR BENCHMARKS
// =============================================================================

fn bench_probest(c: &mut Criterion) {
    let table = CoefficientTable::from_yaml_str(COEFFICIENTS_YAML).unwrap();
    let mut group = c.benchmark_group("probest");

    let mut input = PixelInput::empty("NOAA-19", Sensor::Avhrr, 80);
    input.a1 = 58.0;
    input.a2 = 52.0;
    input.t4 = 256.0;
    input.t5 = 255.2;
    input.solar_zenith = 62.0;

    group.bench_function("day_sea", |b| {
        b.iter(|| black_box(probest(black_box(&input), &table)))
    });

    let mut night = input.clone();
    night.mode = AlgorithmMode::Night;
    night.satellite_zenith = 35.0;
    night.surface = Surface::Land;
    group.bench_function("night_land_fallback", |b| {
        b.iter(|| black_box(probest(black_box(&night), &table)))
    });

    group.finish();
}

// =============================================================================
// SWATH BENCHMARKS
// =============================================================================

fn bench_classify_swath(c: &mut Criterion) {
    let table = CoefficientTable::from_yaml_str(COEFFICIENTS_YAML).unwrap();
    let mut group = c.benchmark_group("classify_swath");
    group.sample_size(20);

    for (width, height) in [(256, 256), (1024, 512)] {
        let (image, angles) = generate_scene(width, height);
        let inputs = PassInputs::new(&image, &angles);
        group.throughput(Throughput::Elements((width * height) as u64));

        for parallel in [false, true] {
            let config = ClassifierConfig {
                parallel,
                ..Default::default()
            };
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(
                BenchmarkId::new(label, format!("{}x{}", width, height)),
                &inputs,
                |b, inputs| {
                    let mut output = ClassificationOutput::new(width, height);
                    b.iter(|| {
                        black_box(classify_swath(inputs, &config, &table, &mut output).unwrap())
                    })
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// OUTPUT BENCHMARKS
// =============================================================================

fn bench_render_planes(c: &mut Criterion) {
    let table = CoefficientTable::from_yaml_str(COEFFICIENTS_YAML).unwrap();
    let (image, angles) = generate_scene(1024, 512);
    let mut output = ClassificationOutput::for_grid(image.grid());
    classify_swath(
        &PassInputs::new(&image, &angles),
        &ClassifierConfig::default(),
        &table,
        &mut output,
    )
    .unwrap();

    let mut group = c.benchmark_group("render_planes");
    group.throughput(Throughput::Elements(output.len() as u64));
    group.bench_function("1024x512", |b| b.iter(|| black_box(output.planes())));
    group.finish();
}

criterion_group!(
    benches,
    bench_probest,
    bench_classify_swath,
    bench_render_planes,
);
criterion_main!(benches);
