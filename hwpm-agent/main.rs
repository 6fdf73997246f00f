use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use hwpm::catalog::t234;
use hwpm::common::{SocChip, ACTIVE_SOC};
use hwpm::{Hwpm, HwpmError, IpId, PollConfig, Result, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "hwpm")]
#[command(about = "Bring up and tear down the HWPM PMA/router blocks")]
struct Args {
    #[arg(long, help = "Use in-memory fake registers instead of mapping hardware")]
    fake_registers: bool,

    #[arg(
        long,
        conflicts_with = "fake_registers",
        help = "Physical memory device to map apertures from"
    )]
    devmem: Option<PathBuf>,

    #[arg(long, default_value_t = 100, help = "Delay between status polls, in microseconds")]
    poll_interval_us: u64,

    #[arg(long, default_value_t = 1000, help = "Status re-checks before declaring a timeout")]
    poll_retries: u32,

    #[arg(long, help = "Skip trigger shutdown and idle wait")]
    skip_quiesce: bool,

    #[arg(long, help = "Continue on a chip other than T234")]
    force: bool,

    #[arg(
        short,
        long,
        help = "Enable verbose logging (shows reservation decisions)"
    )]
    verbose: bool,

    #[arg(long, help = "Log every register access")]
    trace: bool,
}

fn build_config(args: &Args) -> SessionConfig {
    let mut config = if args.fake_registers {
        SessionConfig::simulated()
    } else if let Some(devmem) = &args.devmem {
        SessionConfig {
            devmem_path: devmem.clone(),
            ..SessionConfig::default()
        }
    } else {
        tracing::info!("Auto-detecting register backend...");
        SessionConfig::auto_detect()
    };

    config.poll = PollConfig::new(
        Duration::from_micros(args.poll_interval_us),
        args.poll_retries,
    );
    tracing::debug!(
        "Polling every {:?}, giving up after {:?}",
        config.poll.interval,
        config.poll.budget()
    );
    config
}

/// Reserve both blocks, program them, quiesce, restore gating
fn bring_up(hwpm: &mut Hwpm, skip_quiesce: bool) -> Result<()> {
    hwpm::reserve_pma(hwpm)?;
    hwpm::reserve_rtr(hwpm)?;
    tracing::info!("PMA and RTR reserved");

    hwpm::init_prod_values(hwpm)?;
    hwpm::disable_slcg(hwpm)?;
    tracing::info!("Production values applied, SLCG disabled");

    if skip_quiesce {
        tracing::warn!("Skipping trigger shutdown");
    } else {
        hwpm::disable_triggers(hwpm)?;
        tracing::info!("Triggers disabled, hardware idle");
    }

    hwpm::enable_slcg(hwpm)?;
    Ok(())
}

fn tear_down(hwpm: &mut Hwpm) -> Result<()> {
    // RTR can only be released while PMA still holds its aperture
    if hwpm.ip(IpId::Pma)?.reserved {
        hwpm::release_rtr(hwpm)?;
    }
    hwpm::release_pma(hwpm)?;
    tracing::info!("PMA and RTR released");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging based on verbosity flags
    let log_level = if args.trace {
        tracing::Level::TRACE
    } else if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    let soc = *ACTIVE_SOC;
    tracing::info!("Detected SoC: {}", soc.name());
    if soc != SocChip::T234 && !args.fake_registers && !args.force {
        return Err(HwpmError::UnsupportedChip(format!(
            "{} (use --fake-registers or --force)",
            soc.name()
        )));
    }

    let config = build_config(&args);
    let mut hwpm = Hwpm::from_config(t234::chip(), &config);

    let outcome = bring_up(&mut hwpm, args.skip_quiesce);

    // Release whatever was reserved, even if bring-up failed part way
    let released = tear_down(&mut hwpm);

    match (outcome, released) {
        (Err(e), released) => {
            if let Err(release_err) = released {
                tracing::error!("Release after failure also failed: {}", release_err);
            }
            tracing::error!("Bring-up failed (errno {}): {}", e.errno(), e);
            Err(e)
        }
        (Ok(()), Err(e)) => {
            tracing::error!("Release failed (errno {}): {}", e.errno(), e);
            Err(e)
        }
        (Ok(()), Ok(())) => {
            tracing::info!("HWPM session complete");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devmem_conflicts_with_fake_registers() {
        let parsed = Args::try_parse_from(["hwpm", "--fake-registers", "--devmem", "/dev/mem"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_build_config_from_flags() {
        let args = Args::try_parse_from(["hwpm", "--fake-registers", "--poll-retries", "7"]).unwrap();
        let config = build_config(&args);
        assert!(config.fake_registers);
        assert_eq!(config.poll.max_retries, 7);
        assert_eq!(config.poll.interval, Duration::from_micros(100));
    }
}
