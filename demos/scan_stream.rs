//! Example: Stream a scanner's output as Server-Sent Events
//!
//! ```sh
//! RUST_LOG=recon_exec=debug cargo run --example scan_stream -- "nmap -sV 127.0.0.1" 120
//! ```
//!
//! Ctrl-C cancels the scan through the process registry.
use futures::StreamExt;
use recon_exec::tasks::executor::Executor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let command = args
        .next()
        .unwrap_or_else(|| "for port in 22 80 443; do echo \"$port/tcp open\"; sleep 1; done".to_string());
    let timeout_secs = match args.next() {
        Some(secs) => secs.parse()?,
        None => 30,
    };

    let executor = Executor::new();
    let mut stream = executor.execute_stream(command, timeout_secs).await?;
    let process_id = stream.process_id();
    eprintln!("Started process {}", process_id);

    let mut interrupted = false;
    loop {
        tokio::select! {
            event = stream.next() => {
                let Some(event) = event else { break };
                print!("{}", event.to_sse());
            }
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                if let Err(e) = executor.cancel(process_id) {
                    eprintln!("Cancel failed: {}", e);
                }
            }
        }
    }
    Ok(())
}
