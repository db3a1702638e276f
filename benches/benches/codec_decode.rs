//! Benchmark suite for archive and score table decoding
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! Set `OMF_BENCH_DIR` to a game directory to include real files.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use omf_benches::{generate_test_af_data, generate_test_score_data, sizes};
use omf_types::file::{AfFile, ScoreFile};
use std::{fs, hint::black_box, path::PathBuf};

/// Benchmark AF decoding with synthetic archives
fn bench_af_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("af_decode");

	for (name, (moves, frames, size)) in
		[("small", sizes::SMALL), ("typical", sizes::TYPICAL), ("full", sizes::FULL)]
	{
		let data = generate_test_af_data(moves, frames, size);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("from_bytes", name), &data, |b, data| {
			b.iter(|| {
				let result = AfFile::from_bytes(black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark AF encoding
fn bench_af_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("af_encode");

	let (moves, frames, size) = sizes::TYPICAL;
	let af = AfFile::from_bytes(&generate_test_af_data(moves, frames, size)).unwrap();

	group.bench_function("to_bytes", |b| {
		b.iter(|| {
			let result = black_box(&af).to_bytes();
			black_box(result)
		});
	});

	group.bench_function("clone", |b| {
		b.iter(|| black_box(black_box(&af).clone()));
	});

	group.finish();
}

/// Benchmark score table decoding
fn bench_score_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("score_decode");

	let data = generate_test_score_data();
	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("from_bytes", |b| {
		b.iter(|| {
			let result = ScoreFile::from_bytes(black_box(&data));
			black_box(result)
		});
	});

	group.finish();
}

/// Benchmark decoding real game files, if available
fn bench_real_files(c: &mut Criterion) {
	let Some(dir) = std::env::var_os("OMF_BENCH_DIR").map(PathBuf::from) else {
		eprintln!("Warning: OMF_BENCH_DIR not set, skipping real file benchmarks");
		return;
	};

	let mut group = c.benchmark_group("real_files");

	let entries = match fs::read_dir(&dir) {
		Ok(entries) => entries,
		Err(e) => {
			eprintln!("Warning: Could not read {}: {}", dir.display(), e);
			return;
		}
	};

	for entry in entries.flatten() {
		let name = entry.file_name().to_string_lossy().to_uppercase();
		let Ok(data) = fs::read(entry.path()) else {
			continue;
		};

		group.throughput(Throughput::Bytes(data.len() as u64));
		if name.ends_with(".AF") {
			group.bench_with_input(BenchmarkId::new("af", &name), &data, |b, data| {
				b.iter(|| black_box(AfFile::from_bytes(black_box(data))));
			});
		} else if name == "SCORES.DAT" {
			group.bench_with_input(BenchmarkId::new("score", &name), &data, |b, data| {
				b.iter(|| black_box(ScoreFile::from_bytes(black_box(data))));
			});
		}
	}

	group.finish();
}

criterion_group!(benches, bench_af_decode, bench_af_encode, bench_score_decode, bench_real_files);

criterion_main!(benches);
