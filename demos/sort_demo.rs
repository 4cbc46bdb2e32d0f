//! Example: sort a handful of random integers and print the result.
//!
//! Run with:
//! `cargo run --example sort_demo`
//!
//! Pass `--cancel` to fire the cancellation token before sorting and see the
//! interrupted path.

use parsort::{CancellationToken, SortEngineBuilder};
use rand::Rng;

fn main() {
    let mut rng = rand::thread_rng();
    let mut values: Vec<u32> = (0..25).map(|_| rng.gen_range(0..100)).collect();

    let token = CancellationToken::new();
    if std::env::args().any(|arg| arg == "--cancel") {
        token.cancel();
    }

    // A cutoff of 1 forks a task for every range down to single elements.
    let engine = match SortEngineBuilder::new()
        .sequential_cutoff(1)
        .cancellation(token)
        .build()
    {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("sort_demo: {err}");
            std::process::exit(2);
        }
    };

    match engine.sort_with_stats(&mut values) {
        Ok(stats) => println!(
            "Sorted {} values with {} tasks and {} merges.",
            stats.len, stats.tasks, stats.merges
        ),
        Err(err) => println!("Sorting has been interrupted ({err})."),
    }
    println!("{values:?}");
}
