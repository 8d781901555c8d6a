use dsha_miner::{progress_channel, EngineConfigBuilder, HeaderTemplate, MiningEngine, Target};
use std::thread;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Demo parameters (tune via env)
    let bits: u32 = std::env::var("MINE_BITS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let start_nonce: u32 = std::env::var("MINE_START")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let template = HeaderTemplate::from("demo-header|prev=0000|merkle=abcd|");
    let target = Target::from_leading_zero_bits(bits);

    let config = EngineConfigBuilder::default()
        .progress_interval(250_000)
        .build()?;
    let engine = MiningEngine::new(config)?;
    let (reporter, progress) = progress_channel(8);
    let handle = engine.start(template.clone(), target, start_nonce, reporter)?;

    let printer = thread::spawn(move || {
        for event in progress.iter() {
            println!(
                "nonce={} attempts={} rate={:.0} H/s hash={}",
                event.nonce,
                event.attempts,
                event.hash_rate(),
                event.hash_hex()
            );
        }
    });

    let result = handle.await_result();
    let _ = printer.join();

    match result.solution() {
        Some(solution) => {
            println!(
                "found nonce={} attempts={} time_ms={} hash={}",
                solution.nonce,
                solution.attempts,
                solution.elapsed.as_millis(),
                solution.hash_hex()
            );
            engine.verify(&template, &target, solution)?;
            println!("verify=true");
        }
        None => println!("no solution: {result:?}"),
    }
    Ok(())
}
