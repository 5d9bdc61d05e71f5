use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dbdi::adducts::{CorrelationMatrix, CorrelationMethod};
use dbdi::align::{align_scans, AlignConfig, AlignMode};
use dbdi::spectrum::{Peak, Scan};

/// Create a synthetic direct-infusion run with a stable set of species and a
/// few ppm of mass jitter per scan
fn create_run(num_scans: usize, peaks_per_scan: usize) -> Vec<Scan> {
    (0..num_scans)
        .map(|i| {
            let peaks = (0..peaks_per_scan)
                .map(|j| {
                    // deterministic jitter in [-1.5, 1.5] ppm
                    let jitter = (((i * 31 + j * 17) % 7) as f64 - 3.0) * 0.5e-6;
                    let mz = (100.0 + j as f64 * 1.7) * (1.0 + jitter);
                    Peak::new(mz, 1000.0 + ((i + j) % 50) as f64 * 10.0)
                })
                .collect();
            Scan::new(i + 1, peaks)
        })
        .collect()
}

/// Benchmark the sequential and batch drivers over growing runs
fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");
    let peaks_per_scan = 500;

    for num_scans in [10, 50, 200] {
        let scans = create_run(num_scans, peaks_per_scan);
        group.throughput(Throughput::Elements((num_scans * peaks_per_scan) as u64));

        for mode in [AlignMode::Sequential, AlignMode::Batch] {
            let config = AlignConfig::new(2.0).unwrap().with_mode(mode);
            group.bench_with_input(
                BenchmarkId::new(mode.to_string(), format!("{}scans", num_scans)),
                &scans,
                |b, scans| {
                    b.iter(|| {
                        let alignment = align_scans(black_box(scans), &config).unwrap();
                        black_box(alignment);
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the pairwise trace correlation used by the adduct search
fn bench_correlation_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix");
    let num_scans = 60;

    for num_traces in [100, 400] {
        let traces: Vec<Vec<f64>> = (0..num_traces)
            .map(|t| {
                (0..num_scans)
                    .map(|s| ((t * 13 + s * 7) % 97) as f64 + s as f64)
                    .collect()
            })
            .collect();
        group.throughput(Throughput::Elements((num_traces * num_traces) as u64));

        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman, CorrelationMethod::Kendall] {
            group.bench_with_input(
                BenchmarkId::new(method.to_string(), format!("{}traces", num_traces)),
                &traces,
                |b, traces| {
                    b.iter(|| {
                        let matrix = CorrelationMatrix::compute(black_box(traces), method);
                        black_box(matrix);
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_alignment, bench_correlation_matrix);
criterion_main!(benches);
