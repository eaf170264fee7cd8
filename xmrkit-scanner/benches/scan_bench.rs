//! Criterion benchmarks for transaction scanning with and without view tags.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use xmrkit_core::types::{LedgerTransaction, NetworkType};
use xmrkit_scanner::{Scanner, ScannerConfig};
use xmrkit_stealth::{FullKeyPair, StealthPaymentBuilder};

const TRANSACTIONS: u64 = 64;

fn foreign_transactions() -> Vec<LedgerTransaction> {
    (0..TRANSACTIONS)
        .map(|i| {
            let stranger = FullKeyPair::generate().primary_address(NetworkType::Mainnet);
            StealthPaymentBuilder::new()
                .recipient(stranger.clone(), i)
                .recipient(stranger, i + 1)
                .build()
                .expect("payment")
                .to_transaction(format!("{:064x}", i))
        })
        .collect()
}

fn bench_scan(c: &mut Criterion) {
    let wallet = FullKeyPair::generate();
    let txs = foreign_transactions();

    let mut g = c.benchmark_group("scan_transactions");
    g.throughput(Throughput::Elements(TRANSACTIONS * 2));

    for (name, config) in [
        ("view_tags", ScannerConfig::new()),
        ("exact_only", ScannerConfig::new().without_view_tags()),
        ("view_tags_parallel", ScannerConfig::new().parallel()),
    ] {
        let scanner = Scanner::with_lookahead(
            wallet.view_only(),
            NetworkType::Mainnet,
            1,
            50,
            config,
        );
        g.bench_function(name, |b| {
            b.iter(|| black_box(scanner.scan_transactions(&txs)).expect("scan"));
        });
    }
    g.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
