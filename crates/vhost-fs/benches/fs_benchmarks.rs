use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tempfile::tempdir;
use vhost_fs::{NormalizedPath, checksum, io};

fn write_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_atomic", |b| {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("ftp-quota"));
        let content = "300 M".as_bytes();

        b.iter(|| {
            io::write_atomic(black_box(&path), black_box(content)).unwrap();
        })
    });
}

fn checksum_benchmark(c: &mut Criterion) {
    let body = "<VirtualHost *:80>\n  ServerName example.com\n</VirtualHost>\n".repeat(16);
    c.bench_function("checksum::compute_content_checksum", |b| {
        b.iter(|| checksum::compute_content_checksum(black_box(&body)))
    });
}

criterion_group!(benches, write_atomic_benchmark, checksum_benchmark);
criterion_main!(benches);
