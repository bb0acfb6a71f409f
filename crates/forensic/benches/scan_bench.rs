//! 전체 스캔 벤치마크
//!
//! 형식별 텍스트 스캔, 바이트 분석, 배치 스캔 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kinix_forensic::bytes::shannon_entropy;
use kinix_forensic::{EngineConfig, ForensicEngineBuilder, ScanInput};

const PORT_AUDIT: &str = "\
TARGET: 192.168.1.10
| PORT   | SERVICE | STATE | RISK     |
| 22/tcp | ssh     | open  | OK       |
| 445    | smb     | open  | ALERT    |
| 3389   | rdp     | open  | CRITICAL |
";

const SYSCARE: &str = "\
=== REPORTE SYSCARE ===
cpu_percent: 72.5
ram_percent: 81.0
disk_percent: 40.0
";

fn network_csv(hosts: usize) -> String {
    let mut csv = String::from("IP,MAC,VENDOR\n");
    for i in 0..hosts {
        csv.push_str(&format!(
            "10.0.{}.{},AA:BB:CC:00:{:02X}:{:02X},Vendor{}\n",
            i / 256,
            i % 256,
            i / 256,
            i % 256,
            i % 7
        ));
    }
    csv
}

fn bench_entropy(c: &mut Criterion) {
    let mut group = c.benchmark_group("entropy");

    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let data: Vec<u8> = (0..size).map(|i| (i * 31 % 251) as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| shannon_entropy(black_box(data)))
        });
    }

    group.finish();
}

fn bench_scan_text_by_format(c: &mut Criterion) {
    let engine = ForensicEngineBuilder::new().build().unwrap();
    let csv = network_csv(500);
    let generic = "Jan 15 sshd: Failed password for admin from 10.1.1.1\n".repeat(100);

    let mut group = c.benchmark_group("scan_text");
    group.throughput(Throughput::Elements(1));
    group.bench_function("port_audit", |b| {
        b.iter(|| engine.scan_text("ports", black_box(PORT_AUDIT)))
    });
    group.bench_function("resource_monitor", |b| {
        b.iter(|| engine.scan_text("syscare", black_box(SYSCARE)))
    });
    group.bench_function("network_scan_500", |b| {
        b.iter(|| engine.scan_text("golem", black_box(&csv)))
    });
    group.bench_function("generic_100_lines", |b| {
        b.iter(|| engine.scan_text("auth.log", black_box(&generic)))
    });
    group.finish();
}

fn bench_scan_bytes(c: &mut Criterion) {
    let engine = ForensicEngineBuilder::new().build().unwrap();
    let mut doc = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    doc.extend((0..64 * 1024).map(|i| (i % 256) as u8));
    doc.extend_from_slice(b"CreateObject(\"WScript.Shell\")");

    let mut group = c.benchmark_group("scan_bytes");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("ole_document_64k", |b| {
        b.iter(|| engine.scan_bytes("invoice.doc", black_box(&doc), ".doc"))
    });
    group.finish();
}

fn bench_batch_scaling(c: &mut Criterion) {
    let inputs: Vec<ScanInput> = (0..256)
        .map(|i| ScanInput::Text {
            id: format!("item-{i}"),
            text: if i % 2 == 0 {
                PORT_AUDIT.to_owned()
            } else {
                network_csv(50)
            },
        })
        .collect();

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Elements(inputs.len() as u64));

    for workers in [1usize, 2, 4] {
        let engine = ForensicEngineBuilder::new()
            .config(EngineConfig {
                workers,
                ..Default::default()
            })
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("workers", workers), &inputs, |b, inputs| {
            b.iter(|| engine.scan_batch(black_box(inputs)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_entropy,
    bench_scan_text_by_format,
    bench_scan_bytes,
    bench_batch_scaling,
);
criterion_main!(benches);
