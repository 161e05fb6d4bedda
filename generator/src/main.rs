use anyhow::Context;
use bridge::http::{bind_address, HttpBridge};
use chirpcore::tx_interface::PulseScheme;
use clap::Parser;
use export::codes::{append_report, summary_line, write_bundle, ExportBundle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::PlanConfig;
use workflow::runner::Runner;

mod bridge;
mod export;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Chirp code generator for the SOPHy SDR transmitter")]
struct Args {
    /// Load a pulse plan from YAML (defaults to the SOPHy dual-chirp plan)
    #[arg(long)]
    plan: Option<PathBuf>,
    /// Override the plan's scheme: single, complementary (union1) or sequential (union2)
    #[arg(long)]
    scheme: Option<PulseScheme>,
    /// Write the transmit and decoder codes as JSON
    #[arg(long)]
    output: Option<PathBuf>,
    /// Append the summary line to tools/data/chirp_report.log
    #[arg(long, default_value_t = false)]
    report: bool,
    /// Keep the HTTP bridge alive for incoming plans
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut plan = if let Some(path) = args.plan {
        PlanConfig::load(path)?
    } else {
        PlanConfig::default()
    };
    if let Some(scheme) = args.scheme {
        plan.scheme = scheme;
    }

    let runner = Arc::new(Runner::new());
    let bridge = HttpBridge::new(runner.clone());

    let result = runner.execute(&plan).context("synthesizing pulse plan")?;
    let bundle = ExportBundle::from(result);
    println!("{}", summary_line(&bundle.summary));

    if args.report {
        append_report(&bundle.summary, "tools/data/chirp_report.log")?;
    }
    if let Some(path) = args.output {
        write_bundle(&bundle, &path)?;
        println!("codes written to {}", path.display());
    }
    bridge.publish(bundle);

    if args.serve {
        bridge.serve(bind_address(args.port));
        println!("HTTP bridge running on port {} (Ctrl+C to stop)...", args.port);
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let (synthesized, samples, rejected) = runner.metrics().snapshot();
        println!(
            "bridge stopped: {} plans, {} samples, {} rejected",
            synthesized, samples, rejected
        );
    }

    Ok(())
}
