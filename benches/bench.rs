use criterion::{criterion_group, criterion_main, Criterion};
use memcached_binary::{BinaryProtocol, Client};
use tokio::runtime::Runtime;

use std::env;

const LARGE_PAYLOAD_SIZE: usize = 1000 * 1024; // Memcached's ~default maximum payload size

async fn setup_client() -> Client {
    let memcached_host = env::var("MEMCACHED_HOST").unwrap_or("127.0.0.1".to_string());
    let memcached_port = env::var("MEMCACHED_PORT").unwrap_or("11211".to_string());
    Client::connect(format!("tcp://{}:{}", memcached_host, memcached_port))
        .await
        .expect("failed to create client")
}

fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    rt.block_on(async {
        let mut client = setup_client().await;
        client.set("foo", "bar", None, None).await.unwrap();
    });

    c.bench_function("get_small", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let mut client = setup_client().await;
            let start = std::time::Instant::now();
            for _ in 0..iters {
                let _ = client.get("foo").await;
            }
            start.elapsed()
        });
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("get_miss", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let mut client = setup_client().await;
            let start = std::time::Instant::now();
            for _ in 0..iters {
                let _ = client.get("binary-bench-never-set").await;
            }
            start.elapsed()
        });
    });
}

fn bench_set_with_small_string(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("set_with_small_string", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let mut client = setup_client().await;
            let start = std::time::Instant::now();
            for _ in 0..iters {
                let _ = client.set("foo", "bar", None, None).await;
            }
            start.elapsed()
        });
    });
}

fn bench_set_with_u64(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("set_with_u64", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let mut client = setup_client().await;
            let start = std::time::Instant::now();
            for _ in 0..iters {
                let _ = client.set("foo", 10u64, None, None).await;
            }
            start.elapsed()
        });
    });
}

fn bench_set_with_large_string(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("set_with_large_string", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let mut client = setup_client().await;
            let large_payload = "a".repeat(LARGE_PAYLOAD_SIZE);
            let start = std::time::Instant::now();
            for _ in 0..iters {
                let _ = client.set("large_foo", &large_payload, None, None).await;
            }
            start.elapsed()
        });
    });
}

fn bench_get_large(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    rt.block_on(async {
        let mut client = setup_client().await;
        let large_payload = "a".repeat(LARGE_PAYLOAD_SIZE);
        client
            .set("large_foo", &large_payload, None, None)
            .await
            .unwrap();
    });

    c.bench_function("get_large", |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let mut client = setup_client().await;
            let start = std::time::Instant::now();
            for _ in 0..iters {
                let _ = client.get("large_foo").await;
            }
            start.elapsed()
        });
    });
}

criterion_group!(
    benches,
    bench_get,
    bench_get_miss,
    bench_set_with_small_string,
    bench_set_with_u64,
    bench_set_with_large_string,
    bench_get_large,
);
criterion_main!(benches);
