//! Headless walk through the counter screen: manual counting, auto mode,
//! and the settings dialog.
//!
//! Run with `COUNTERPLUS_LOG=counterplus=debug` to see every tick.

use std::time::Duration;

use counterplus::logging::init_tracing;
use counterplus::{CounterConfig, CounterStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("=== Counter++ ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => CounterConfig::load(path)?,
        None => CounterConfig {
            default_interval_ms: 1000,
            ..CounterConfig::default()
        },
    };
    let store = CounterStore::new(config)?;

    // Stand-in for the screen: print every snapshot it would render
    let _render = store.subscribe(|state| {
        println!(
            "   [Screen] Count: {:>3} | Auto mode: {} | Interval: {}s{}",
            state.count,
            state.auto_mode(),
            state.interval_secs(),
            if state.show_settings { " | [Settings open]" } else { "" }
        );
    });

    println!("\n1. Manual counting");
    store.increment();
    store.increment();
    store.increment();
    store.decrement();

    println!("\n2. Start auto mode and wait 3.5 intervals");
    store.toggle_auto_increment();
    let interval = store.state().interval();
    tokio::time::sleep(interval * 7 / 2).await;

    println!("\n3. Settings: pick 2 seconds and save");
    store.open_settings();
    store.apply_settings(2);
    tokio::time::sleep(Duration::from_millis(4500)).await;

    println!("\n4. Stop auto mode");
    store.toggle_auto_increment();

    println!("\n5. Reset");
    store.reset();

    println!("\n✓ Done");
    Ok(())
}
