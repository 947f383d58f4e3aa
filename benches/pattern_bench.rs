// benches/pattern_bench.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pathkeeper::{FileSystem, FileSystemOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

/// Builds a small fixture tree once per benchmark group: a handful of
/// Rust/TOML/JSON files spread across a couple of subdirectories, enough
/// for the glob/grep benchmarks to do real matching work without needing
/// a multi-second fixture-build step per iteration.
fn fixture() -> (TempDir, FileSystem) {
    let dir = TempDir::new().expect("create fixture dir");
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::create_dir_all(dir.path().join("tests")).unwrap();

    for i in 0..50 {
        fs::write(dir.path().join(format!("src/module_{i}.rs")), format!("fn f_{i}() {{ let needle = {i}; }}\n")).unwrap();
    }
    for i in 0..10 {
        fs::write(dir.path().join(format!("tests/case_{i}.rs")), "#[test]\nfn it_works() {}\n").unwrap();
    }
    fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"fixture\"\n").unwrap();
    fs::write(dir.path().join("README.md"), "# fixture\n").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).expect("open fixture root");
    assert!(fs_handle.wait_ready(Duration::from_secs(5)), "fixture scan did not complete");
    (dir, fs_handle)
}

fn bench_glob_simple(c: &mut Criterion) {
    let (_dir, fs_handle) = fixture();
    c.bench_function("glob_simple", |b| {
        b.iter(|| black_box(fs_handle.glob(black_box("src/*.rs")).unwrap()))
    });
}

fn bench_glob_recursive(c: &mut Criterion) {
    let (_dir, fs_handle) = fixture();
    c.bench_function("glob_recursive", |b| {
        b.iter(|| black_box(fs_handle.glob(black_box("**/*.rs")).unwrap()))
    });
}

fn bench_glob_brace(c: &mut Criterion) {
    let (_dir, fs_handle) = fixture();
    c.bench_function("glob_brace", |b| {
        b.iter(|| black_box(fs_handle.glob(black_box("**/*.{rs,toml,md}")).unwrap()))
    });
}

fn bench_glob_regex(c: &mut Criterion) {
    let (_dir, fs_handle) = fixture();
    c.bench_function("glob_regex", |b| {
        b.iter(|| black_box(fs_handle.glob(black_box("re:^src/module_[0-9]+\\.rs$")).unwrap()))
    });
}

fn bench_grep(c: &mut Criterion) {
    let (_dir, fs_handle) = fixture();
    c.bench_function("grep", |b| {
        b.iter(|| black_box(fs_handle.grep(black_box("needle"), black_box("**/*.rs"), true, 1000).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_glob_simple,
    bench_glob_recursive,
    bench_glob_brace,
    bench_glob_regex,
    bench_grep
);

criterion_main!(benches);
