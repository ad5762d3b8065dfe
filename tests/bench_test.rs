//! Benchmark tests for critical operations
//!
//! Run with: cargo test --release -- --nocapture bench

use std::time::Instant;
use tempfile::NamedTempFile;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use bookmarks::database::{init_db, AppState, RedbStore};
use bookmarks::handler::{create_bookmark, get_bookmark, list_bookmarks};

fn setup_state() -> (AppState, NamedTempFile) {
    let temp_db = NamedTempFile::new().unwrap();
    let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
    (AppState::new(RedbStore::new(db), None), temp_db)
}

fn report(name: &str, iterations: usize, start: Instant) {
    let duration = start.elapsed();
    let avg_ms = duration.as_secs_f64() * 1000.0 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

async fn create(state: &AppState, i: usize) {
    let payload = json!({
        "title": format!("bench {}", i),
        "url": format!("https://example.com/bench/{}", i),
        "rating": i % 6,
        "description": "<b>bench</b> & more"
    });
    let _ = create_bookmark(State(state.clone()), Bytes::from(payload.to_string()))
        .await
        .into_response();
}

#[tokio::test]
#[ignore] // Run explicitly with: cargo test bench --release -- --ignored --nocapture
async fn bench_create_bookmarks() {
    println!("\n=== Benchmark: Create Bookmarks ===\n");

    let (state, _temp_db) = setup_state();

    let iterations = 1000;
    let start = Instant::now();
    for i in 0..iterations {
        create(&state, i).await;
    }
    report("Create", iterations, start);
}

#[tokio::test]
#[ignore]
async fn bench_read_bookmarks() {
    println!("\n=== Benchmark: Read Bookmarks ===\n");

    let (state, _temp_db) = setup_state();

    println!("  Preparing: Creating 1000 bookmarks...");
    for i in 0..1000 {
        create(&state, i).await;
    }
    println!("  Done!\n");

    let iterations = 1000;
    let start = Instant::now();
    for i in 0..iterations {
        let id = (i % 1000 + 1).to_string();
        let _ = get_bookmark(Path(id), State(state.clone())).await.into_response();
    }
    report("Get by id", iterations, start);

    let iterations = 100;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = list_bookmarks(State(state.clone())).await.into_response();
    }
    report("List all (1000 rows)", iterations, start);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn bench_concurrent_creates() {
    println!("\n=== Benchmark: Concurrent Creates ===\n");

    let (state, _temp_db) = setup_state();

    let num_tasks = 100;
    let ops_per_task = 10;

    println!("  Running {} concurrent tasks with {} ops each...", num_tasks, ops_per_task);

    let start = Instant::now();
    let mut handles = vec![];
    for task_id in 0..num_tasks {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            for op_id in 0..ops_per_task {
                create(&state, task_id * ops_per_task + op_id).await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    report("Concurrent create", num_tasks * ops_per_task, start);

    let stored = state.store.list().unwrap();
    assert_eq!(stored.len(), num_tasks * ops_per_task);
}
