//! Selection Engine Binary
//!
//! Runs the window worker as its own process, speaking the channel protocol
//! as JSON lines: requests on stdin, replies on stdout, logs on stderr.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p selection-engine -- config.yaml
//! ```
//!
//! ```text
//! > {"type":"window","start":4.5,"stop":13.5}
//! < {"type":"selection","xs":[5.0,9.0,13.0],"ys":{...}}
//! > {"type":"stop"}
//! < {"type":"stop_ack"}
//! ```
//!
//! Closing stdin is treated as a stop request. The process exits non-zero
//! when the worker terminates for any reason other than a clean
//! `Stop`/`StopAck` exchange.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: `selection_engine=info`)

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use selection_engine::config::load_config;
use selection_engine::protocol::{WindowRequest, WorkerReply};
use selection_engine::selection::MemorySelector;
use selection_engine::{telemetry, worker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref())?;

    tracing::info!(
        dir = %config.series.dir.display(),
        x = %config.series.x.key,
        ys = ?config.series.ys,
        resolution = config.series.resolution,
        "Starting selection engine"
    );

    let provider = MemorySelector::open(
        &config.series.dir,
        &config.series.x,
        &config.series.ys,
        config.series.resolution,
    )?;
    let (mut handle, task) = worker::spawn(Box::new(provider), config.channel.capacity);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line.context("failed to read request line")? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    let request: WindowRequest = serde_json::from_str(&line)
                        .with_context(|| format!("invalid request: {line}"))?;
                    if handle.send(request).await.is_err() {
                        break;
                    }
                }
                None => {
                    stdin_open = false;
                    if handle.stop().await.is_err() {
                        break;
                    }
                }
            },
            reply = handle.recv() => {
                // A closed reply channel means the worker is gone; its task
                // result says why.
                let Some(reply) = reply else { break };
                let stop_ack = matches!(reply, WorkerReply::StopAck);
                let mut encoded = serde_json::to_string(&reply).context("failed to encode reply")?;
                encoded.push('\n');
                stdout.write_all(encoded.as_bytes()).await?;
                stdout.flush().await?;
                if stop_ack {
                    break;
                }
            },
        }
    }

    task.await.context("worker task panicked")??;
    Ok(())
}
