//! Basic usage example for the OEIS client library.
//!
//! Looks up the Fibonacci numbers, searches by a run of terms and reads the
//! start of a b-file. Settings come from the config file and `OEIS_*`
//! variables; set `RUST_LOG=oeis_client=debug` to see each request.

use oeis_client::{find_references, SequenceClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "oeis_client=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = SequenceClient::from_env()?;

    let fibonacci = client.fetch_by_id("A000045").await?;
    println!("{}: {}", fibonacci.id(), fibonacci.name());
    let first: Vec<String> = fibonacci.terms().iter().take(10).map(|t| t.to_string()).collect();
    println!("   Terms: {}", first.join(", "));
    println!("   Offset: {}", fibonacci.offset().first_index);
    if let Some(author) = fibonacci.author() {
        println!("   Author: {}", author);
    }

    let related: Vec<String> = fibonacci
        .cross_references()
        .iter()
        .flat_map(|xref| find_references(&xref.text))
        .take(5)
        .map(|id| id.to_string())
        .collect();
    println!("   Related: {}", related.join(", "));

    println!("\nSequences containing 1, 2, 4, 8, 16:");
    for (i, record) in client
        .search_collect("1,2,4,8,16", 5)
        .await?
        .iter()
        .enumerate()
    {
        println!("{}. {} {}", i + 1, record.id(), record.name());
    }

    let b_file = client.b_file("A000045").await?;
    println!("\nb-file for {} holds {} terms", b_file.id(), b_file.len());
    if let Some(term) = b_file.term(100) {
        println!("   a(100) = {}", term);
    }

    Ok(())
}
