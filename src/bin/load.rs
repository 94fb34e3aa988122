//! Load generator: fires limit-order submissions at a running server and
//! reports throughput, with optional latency percentiles.
//!
//! Transport errors are retried with exponential backoff and jitter; 4xx
//! responses are not retried (the server already answered).

use clap::Parser;
use rand::Rng;
use serde::Serialize;
use serde_json::json;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "load", version, about = "Order submission load generator")]
struct Cli {
    /// Orders endpoint.
    #[arg(long, default_value = "http://127.0.0.1:8080/api/v1/orders")]
    url: String,
    /// Concurrency (worker tasks).
    #[arg(long, default_value_t = 50)]
    c: usize,
    /// Total requests.
    #[arg(long, default_value_t = 1000)]
    n: usize,
    /// Symbol to submit on.
    #[arg(long, default_value = "LOAD")]
    sym: String,
    /// Milliseconds to sleep between requests per worker.
    #[arg(long, default_value_t = 0)]
    sleep: u64,
    /// Record per-request latency and print p50/p90/p99.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Serialize)]
struct StatsSummary {
    total_requests: usize,
    concurrency: usize,
    duration_sec: f64,
    req_per_sec: f64,
    mean_ms: f64,
    max_ms: f64,
    p50_ms: f64,
    p90_ms: f64,
    p99_ms: f64,
}

const MAX_RETRIES: u32 = 5;
const BASE_DELAY: Duration = Duration::from_millis(50);

async fn send_with_retries(client: &reqwest::Client, url: &str, body: &serde_json::Value) {
    for attempt in 0..=MAX_RETRIES {
        match client.post(url).json(body).send().await {
            Ok(_) => return,
            Err(err) => {
                if attempt == MAX_RETRIES {
                    eprintln!("request error: {err}");
                    return;
                }
                let backoff = BASE_DELAY.as_millis() as u64 * (1 << attempt);
                let jittered = {
                    let mut rng = rand::thread_rng();
                    let jitter = rng.gen_range(0..=backoff / 2);
                    if rng.gen_bool(0.5) {
                        backoff - jitter
                    } else {
                        backoff + jitter
                    }
                };
                tokio::time::sleep(Duration::from_millis(jittered)).await;
            }
        }
    }
}

async fn worker(
    client: reqwest::Client,
    url: String,
    symbol: String,
    worker_id: usize,
    requests: usize,
    sleep_ms: u64,
    record: bool,
) -> Vec<f64> {
    let body = json!({
        "symbol": symbol,
        "side": "BUY",
        "type": "LIMIT",
        "price": 100 + (worker_id % 10) as i64,
        "quantity": 1,
    });
    let mut durations = Vec::with_capacity(if record { requests } else { 0 });
    for _ in 0..requests {
        let t0 = Instant::now();
        send_with_retries(&client, &url, &body).await;
        if record {
            durations.push(t0.elapsed().as_secs_f64() * 1000.0);
        }
        if sleep_ms > 0 {
            tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
        }
    }
    durations
}

/// Nearest-rank percentile over a sorted sample.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (q * (sorted.len() - 1) as f64 + 0.5).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let concurrency = cli.c.max(1);

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(concurrency.max(1000))
        .timeout(Duration::from_secs(30))
        .build()?;

    let start = Instant::now();
    let mut handles = Vec::with_capacity(concurrency);
    for worker_id in 0..concurrency {
        // spread the remainder over the first workers
        let requests = cli.n / concurrency + usize::from(worker_id < cli.n % concurrency);
        handles.push(tokio::spawn(worker(
            client.clone(),
            cli.url.clone(),
            cli.sym.clone(),
            worker_id,
            requests,
            cli.sleep,
            cli.stats,
        )));
    }

    let mut durations: Vec<f64> = Vec::with_capacity(if cli.stats { cli.n } else { 0 });
    for handle in handles {
        durations.extend(handle.await?);
    }
    let elapsed = start.elapsed().as_secs_f64();

    if !cli.stats {
        println!(
            "done: total={} concurrency={} duration={:.2}s req/s={:.2}",
            cli.n,
            concurrency,
            elapsed,
            cli.n as f64 / elapsed
        );
        return Ok(());
    }

    durations.sort_by(|a, b| a.partial_cmp(b).expect("latency is finite"));
    let sent = durations.len();
    let sum: f64 = durations.iter().sum();
    let mean = if sent > 0 { sum / sent as f64 } else { 0.0 };
    let max = durations.last().copied().unwrap_or(0.0);

    let summary = StatsSummary {
        total_requests: sent,
        concurrency,
        duration_sec: elapsed,
        req_per_sec: sent as f64 / elapsed,
        mean_ms: mean,
        max_ms: max,
        p50_ms: percentile(&durations, 0.50),
        p90_ms: percentile(&durations, 0.90),
        p99_ms: percentile(&durations, 0.99),
    };

    println!(
        "SUMMARY: total={} concurrency={} duration={:.2}s req/s={:.2}",
        summary.total_requests, summary.concurrency, summary.duration_sec, summary.req_per_sec
    );
    println!(
        "LATENCY(ms): mean={:.3} max={:.3} p50={:.3} p90={:.3} p99={:.3}",
        summary.mean_ms, summary.max_ms, summary.p50_ms, summary.p90_ms, summary.p99_ms
    );
    println!("\nJSON:\n{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
