//! Cartwheel load generator.
//!
//! Simulates shoppers browsing the catalog and filling carts: each simulated
//! user mints a cart on start, then loops with a 1-5 second think time,
//! picking a weighted action (view a product page 4, browse a collection 2,
//! add a line to its cart 1, ping health 1).
//!
//! # Usage
//!
//! ```bash
//! cartwheel-loadtest --base-url http://127.0.0.1:8000 --users 50 --duration 120
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use rand::Rng;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "cartwheel-loadtest")]
#[command(author, version, about = "Traffic generator for the Cartwheel API")]
struct Args {
    /// Base URL of the running API
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Number of concurrent simulated users
    #[arg(long, default_value_t = 10)]
    users: u32,

    /// Test duration in seconds
    #[arg(long, default_value_t = 60)]
    duration: u64,
}

/// Shared request counters, one pair per action.
#[derive(Default)]
struct Counters {
    view_products_ok: AtomicU64,
    view_product_ok: AtomicU64,
    add_to_cart_ok: AtomicU64,
    health_ok: AtomicU64,
    errors: AtomicU64,
}

impl Counters {
    fn total(&self) -> u64 {
        self.view_products_ok.load(Ordering::Relaxed)
            + self.view_product_ok.load(Ordering::Relaxed)
            + self.add_to_cart_ok.load(Ordering::Relaxed)
            + self.health_ok.load(Ordering::Relaxed)
            + self.errors.load(Ordering::Relaxed)
    }
}

/// The slice of the cart creation response we need.
#[derive(Deserialize)]
struct CreatedCart {
    id: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let deadline = Instant::now() + Duration::from_secs(args.duration);
    let counters = Arc::new(Counters::default());

    tracing::info!(
        base_url = %args.base_url,
        users = args.users,
        duration_secs = args.duration,
        "Starting load test"
    );

    let mut workers = Vec::with_capacity(args.users as usize);
    for user in 0..args.users {
        let client = reqwest::Client::new();
        let base_url = args.base_url.clone();
        let counters = Arc::clone(&counters);
        workers.push(tokio::spawn(async move {
            if let Err(e) = simulate_user(&client, &base_url, deadline, &counters).await {
                tracing::warn!(user, error = %e, "Simulated user stopped early");
            }
        }));
    }

    for worker in workers {
        let _ = worker.await;
    }

    let elapsed = args.duration.max(1);
    tracing::info!(
        total = counters.total(),
        rps = counters.total() / elapsed,
        view_products = counters.view_products_ok.load(Ordering::Relaxed),
        view_product = counters.view_product_ok.load(Ordering::Relaxed),
        add_to_cart = counters.add_to_cart_ok.load(Ordering::Relaxed),
        health = counters.health_ok.load(Ordering::Relaxed),
        errors = counters.errors.load(Ordering::Relaxed),
        "Load test complete"
    );
}

/// One simulated shopper: mint a cart, then browse until the deadline.
async fn simulate_user(
    client: &reqwest::Client,
    base_url: &str,
    deadline: Instant,
    counters: &Counters,
) -> Result<(), reqwest::Error> {
    let cart: CreatedCart = client
        .post(format!("{base_url}/carts"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    while Instant::now() < deadline {
        let think_time = rand::rng().random_range(1..=5);
        tokio::time::sleep(Duration::from_secs(think_time)).await;
        if Instant::now() >= deadline {
            break;
        }

        // Weighted pick: view product 4, view products 2, add to cart 1,
        // health 1.
        let roll: u32 = rand::rng().random_range(0..8);
        let outcome = match roll {
            0..=3 => {
                let product_id = rand::rng().random_range(1..=1000);
                let response = client
                    .get(format!("{base_url}/products/{product_id}"))
                    .send()
                    .await;
                // Random catalog ids miss sometimes; a 404 is a valid answer
                record(&counters.view_product_ok, counters, response, true)
            }
            4 | 5 => {
                let collection_id = rand::rng().random_range(2..=6);
                let response = client
                    .get(format!("{base_url}/products?collection_id={collection_id}"))
                    .send()
                    .await;
                record(&counters.view_products_ok, counters, response, false)
            }
            6 => {
                let product_id = rand::rng().random_range(1..=10);
                let response = client
                    .post(format!("{base_url}/carts/{}/items", cart.id))
                    .json(&serde_json::json!({"product_id": product_id, "quantity": 1}))
                    .send()
                    .await;
                record(&counters.add_to_cart_ok, counters, response, false)
            }
            _ => {
                let response = client.get(format!("{base_url}/health")).send().await;
                record(&counters.health_ok, counters, response, false)
            }
        };

        if !outcome {
            tracing::debug!("Request failed");
        }
    }

    Ok(())
}

/// Bump the success counter for a completed request, or the error counter
/// for a transport failure or server error. `allow_not_found` treats 404 as
/// success for actions that probe random ids.
fn record(
    ok: &AtomicU64,
    counters: &Counters,
    response: Result<reqwest::Response, reqwest::Error>,
    allow_not_found: bool,
) -> bool {
    match response {
        Ok(res)
            if res.status().is_success()
                || (allow_not_found && res.status() == reqwest::StatusCode::NOT_FOUND) =>
        {
            ok.fetch_add(1, Ordering::Relaxed);
            true
        }
        Ok(res) => {
            tracing::debug!(status = %res.status(), "Unexpected status");
            counters.errors.fetch_add(1, Ordering::Relaxed);
            false
        }
        Err(_) => {
            counters.errors.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}
