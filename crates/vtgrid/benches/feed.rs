//! Throughput benchmark for `TerminalCore::feed`, mirroring the teacher
//! crate's `vtio/benches/parser.rs` shape (size-bucketed synthetic
//! workloads) but scoped to this crate's criterion harness.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vtgrid::terminal::TerminalCore;

fn ascii_text(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

fn csi_heavy(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        out.extend_from_slice(b"\x1b[31mred\x1b[0m\x1b[10;20H");
    }
    out.truncate(len);
    out
}

fn bench_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal_core_feed");

    for &size in &[1024usize, 64 * 1024, 1024 * 1024] {
        let plain = ascii_text(size);
        group.bench_with_input(format!("ascii/{size}"), &plain, |b, input| {
            b.iter(|| {
                let mut core = TerminalCore::new(80, 24, |_: &[u8]| {});
                core.feed(black_box(input));
            });
        });

        let csi = csi_heavy(size);
        group.bench_with_input(format!("csi/{size}"), &csi, |b, input| {
            b.iter(|| {
                let mut core = TerminalCore::new(80, 24, |_: &[u8]| {});
                core.feed(black_box(input));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_feed);
criterion_main!(benches);
