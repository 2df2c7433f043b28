use std::process;

use anyhow::{Context, Result};
use peckio::comedi::ComediDevice;
use tracing::error;
use wait4peck::args::{self, Invocation};
use wait4peck::detector::{Detector, DEFAULT_POLL_INTERVAL};
use wait4peck::stamp;

fn main() {
    let cfg = match args::parse(std::env::args().skip(1)) {
        Ok(Invocation::Run(cfg)) => cfg,
        Ok(Invocation::Help) => {
            eprint!("{}", args::USAGE);
            process::exit(args::EXIT_USAGE);
        }
        Err(err) => {
            eprintln!("wait4peck: {}", err);
            eprint!("{}", args::USAGE);
            process::exit(args::EXIT_USAGE);
        }
    };

    // stdout carries exactly the timestamp line; everything else goes to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cfg) {
        error!("{:#}", err);
        process::exit(1);
    }
}

fn run(cfg: args::Config) -> Result<()> {
    let path = cfg.device.context("no device file specified")?;
    let device = ComediDevice::open(&path)?;
    let detector = Detector::new(device, cfg.subdevice, cfg.channel, DEFAULT_POLL_INTERVAL);
    let stamp = detector.wait_for_low()?;
    println!("{}", stamp::peck_line(&stamp));
    Ok(())
    // the device handle drops here, after the stamp is emitted
}
