use std::env;

use dotenvy::dotenv;

use pow_ledger::ledger::{Chain, DEFAULT_DIFFICULTY};

fn main() {
    let _ = dotenv();
    env_logger::init();

    let difficulty: u32 = env::args()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DIFFICULTY);

    println!("⛓️ Proof-of-work ledger demo (difficulty {difficulty})");

    let mut chain = Chain::new(difficulty);

    for payload in ["First transaction", "Second transaction", "Third transaction"] {
        let summary = chain.add_block(payload);
        println!(
            "mined block #{} in {:.3}s (nonce={}, digest={})",
            summary.index, summary.time_taken_secs, summary.nonce, summary.digest
        );
    }

    println!("\nFull chain:");
    for record in chain.records() {
        let pretty = serde_json::to_string_pretty(&record).expect("serialize block record");
        println!("{pretty}");
    }

    let report = chain.validation_report();
    println!("\nIs the chain valid? {} ({})", report.ok, report.message);

    println!("\nTampering with block 1...");
    if let Err(err) = chain.tamper(1, "Hacked data") {
        println!("tamper rejected: {err}");
    }

    let report = chain.validation_report();
    println!(
        "Is the chain valid after tampering? {} ({})",
        report.ok, report.message
    );

    println!("\nAverage nonce: {:.2}", chain.average_nonce());
}
