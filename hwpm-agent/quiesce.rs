//! Trigger shutdown and idle wait before reconfiguration
//!
//! Triggers are masked first so nothing new enters the pipeline, then the
//! router perfmon status, router engine and PMA engine are each polled until
//! idle. Every condition is polled even after an earlier one timed out, so
//! all stuck units show up in the log; the first timeout is returned.

use std::thread;

use hwpm_raw::arch::t234::{ip, pmasys, pmmsys};
use hwpm_raw::RegisterLayout;

use crate::catalog::IpId;
use crate::config::PollConfig;
use crate::error::{HwpmError, Result};
use crate::session::Hwpm;

/// Re-check `condition` every `config.interval` until it holds
///
/// The condition is checked once, then up to `config.max_retries` more
/// times, capped at `u32::MAX` checks in total. Returns the number of
/// checks performed on success. Errors raised by the condition itself abort
/// the wait immediately.
pub fn poll_until<F>(config: &PollConfig, condition: &'static str, mut check: F) -> Result<u32>
where
    F: FnMut() -> Result<bool>,
{
    let max_checks = config.max_checks();
    let mut attempts = 0;
    loop {
        attempts += 1;
        if check()? {
            tracing::trace!("{} reached after {} checks", condition, attempts);
            return Ok(attempts);
        }
        if attempts >= max_checks {
            return Err(HwpmError::HardwareTimeout {
                condition,
                attempts,
            });
        }
        if !config.interval.is_zero() {
            thread::sleep(config.interval);
        }
    }
}

/// Keep the first timeout, log every one; other errors propagate
fn record(first: &mut Option<HwpmError>, outcome: Result<u32>) -> Result<()> {
    match outcome {
        Ok(_) => Ok(()),
        Err(e) if e.is_timeout() => {
            tracing::error!("{}", e);
            first.get_or_insert(e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub fn disable_triggers(hwpm: &Hwpm) -> Result<()> {
    crate::hwpm_fn!();

    let pma_perfmux = hwpm.ip(IpId::Pma)?.primary_perfmux().ok_or_else(|| {
        HwpmError::ResourceUnavailable("PMA has no primary perfmux".to_string())
    })?;
    let rtr_perfmux = hwpm
        .ip(IpId::Rtr)?
        .static_perfmux(ip::rtr::RTR_PERFMUX_INDEX)
        .ok_or_else(|| HwpmError::ResourceUnavailable("RTR has no control perfmux".to_string()))?;

    let pulse = pmasys::trigger_config_user::PMA_PULSE;
    hwpm.update_field(
        pma_perfmux,
        pmasys::trigger_config_user(0),
        pulse.mask(),
        pulse.encode(pmasys::trigger_config_user::PMA_PULSE_DISABLE),
    )?;

    for mask in pmasys::SYS_TRIGGER_MASKS {
        hwpm.writel(pma_perfmux, mask, 0)?;
    }

    let poll = hwpm.poll_config();
    let mut first_timeout = None;

    let merged = pmmsys::sys0router_perfmonstatus::MERGED;
    record(
        &mut first_timeout,
        poll_until(&poll, "SYS0ROUTER_PERFMONSTATUS_MERGED_EMPTY", || {
            let reg = hwpm.readl(rtr_perfmux, pmmsys::SYS0ROUTER_PERFMONSTATUS)?;
            Ok(merged.decode(reg) == pmmsys::sys0router_perfmonstatus::MERGED_EMPTY)
        }),
    )?;

    record(
        &mut first_timeout,
        poll_until(&poll, "SYS0ROUTER_ENGINESTATUS_STATUS_EMPTY", || {
            let reg = hwpm.readl(rtr_perfmux, pmmsys::SYS0ROUTER_ENGINESTATUS)?;
            Ok(pmmsys::RouterEngineStatus::from_raw(reg).is_empty())
        }),
    )?;

    record(
        &mut first_timeout,
        poll_until(&poll, "PMASYS_ENGINESTATUS", || {
            let reg = hwpm.readl(pma_perfmux, pmasys::ENGINESTATUS)?;
            let status = pmasys::PmaEngineStatus::from_raw(reg);
            if !status.is_idle() {
                tracing::trace!("PMA busy: {:?}", status);
            }
            Ok(status.is_idle())
        }),
    )?;

    match first_timeout {
        Some(e) => Err(e),
        None => {
            tracing::debug!("Triggers disabled, HWPM idle");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::{reserve_pma, reserve_rtr};
    use crate::testing;
    use std::cell::Cell;
    use std::time::Duration;

    fn reserved_session() -> Hwpm {
        let (mut hwpm, _log) = testing::t234_session();
        reserve_pma(&mut hwpm).unwrap();
        reserve_rtr(&mut hwpm).unwrap();
        hwpm
    }

    /// Put the PMA engine status register in its idle encoding
    fn pma_idle(hwpm: &Hwpm) {
        let pma = hwpm.ip(IpId::Pma).unwrap().primary_perfmux().unwrap();
        testing::fake(pma)
            .poke(pmasys::ENGINESTATUS, pmasys::enginestatus::IDLE_VALUE)
            .unwrap();
    }

    #[test]
    fn test_poll_until_immediate_success() {
        let checks = Cell::new(0);
        let attempts = poll_until(&testing::poll_config(), "ready", || {
            checks.set(checks.get() + 1);
            Ok(true)
        })
        .unwrap();
        assert_eq!(attempts, 1);
        assert_eq!(checks.get(), 1);
    }

    #[test]
    fn test_poll_until_eventual_success() {
        let checks = Cell::new(0);
        let attempts = poll_until(&testing::poll_config(), "ready", || {
            checks.set(checks.get() + 1);
            Ok(checks.get() == 3)
        })
        .unwrap();
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_poll_until_times_out_within_budget() {
        let config = PollConfig::new(Duration::ZERO, 4);
        let checks = Cell::new(0);
        let err = poll_until(&config, "never", || {
            checks.set(checks.get() + 1);
            Ok(false)
        })
        .unwrap_err();
        assert!(matches!(
            err,
            HwpmError::HardwareTimeout { condition: "never", attempts: 5 }
        ));
        assert_eq!(checks.get(), 5);
    }

    #[test]
    fn test_poll_until_saturating_budget_does_not_wrap() {
        let config = PollConfig::new(Duration::ZERO, u32::MAX);
        assert_eq!(config.max_checks(), u32::MAX);

        let checks = Cell::new(0u32);
        let attempts = poll_until(&config, "ready", || {
            checks.set(checks.get() + 1);
            Ok(checks.get() == 7)
        })
        .unwrap();
        assert_eq!(attempts, 7);
    }

    #[test]
    fn test_poll_until_propagates_check_error() {
        let err = poll_until(&testing::poll_config(), "broken", || {
            Err(HwpmError::ResourceUnavailable("gone".into()))
        })
        .unwrap_err();
        assert!(matches!(err, HwpmError::ResourceUnavailable(_)));
    }

    #[test]
    fn test_disable_triggers_when_idle_polls_once() {
        let hwpm = reserved_session();
        pma_idle(&hwpm);

        let pma = hwpm.ip(IpId::Pma).unwrap().primary_perfmux().unwrap();
        let rtr = hwpm.ip(IpId::Rtr).unwrap().static_perfmux(0).unwrap();
        let pma_regs = testing::fake(pma);
        let rtr_regs = testing::fake(rtr);
        pma_regs
            .poke(pmasys::trigger_config_user(0), 0xFFFF_FFFF)
            .unwrap();
        for mask in pmasys::SYS_TRIGGER_MASKS {
            pma_regs.poke(mask, 0xFFFF_FFFF).unwrap();
        }

        disable_triggers(&hwpm).unwrap();

        // Trigger config plus one engine status read on PMA, two status reads on RTR
        assert_eq!(pma_regs.read_count(), 2);
        assert_eq!(rtr_regs.read_count(), 2);
        assert_eq!(pma_regs.peek(pmasys::trigger_config_user(0)).unwrap(), 0xFFFF_FFFE);
        for mask in pmasys::SYS_TRIGGER_MASKS {
            assert_eq!(pma_regs.peek(mask).unwrap(), 0);
        }
    }

    #[test]
    fn test_disable_triggers_is_idempotent() {
        let hwpm = reserved_session();
        pma_idle(&hwpm);

        disable_triggers(&hwpm).unwrap();
        disable_triggers(&hwpm).unwrap();
    }

    #[test]
    fn test_stuck_router_times_out_but_pma_still_checked() {
        let hwpm = reserved_session();
        pma_idle(&hwpm);

        let pma = hwpm.ip(IpId::Pma).unwrap().primary_perfmux().unwrap();
        let rtr = hwpm.ip(IpId::Rtr).unwrap().static_perfmux(0).unwrap();
        testing::fake(rtr)
            .poke(pmmsys::SYS0ROUTER_PERFMONSTATUS, 0x1)
            .unwrap();

        let err = disable_triggers(&hwpm).unwrap_err();
        assert!(matches!(
            err,
            HwpmError::HardwareTimeout { condition: "SYS0ROUTER_PERFMONSTATUS_MERGED_EMPTY", .. }
        ));
        assert_eq!(err.errno(), -libc::EIO);

        let retries = testing::poll_config().max_retries as usize;
        assert_eq!(testing::fake(rtr).read_count(), retries + 1 + 1);
        assert_eq!(testing::fake(pma).read_count(), 2);
    }

    #[test]
    fn test_first_timeout_is_returned() {
        let hwpm = reserved_session();

        // Router engine busy and PMA record buffer not drained
        let rtr = hwpm.ip(IpId::Rtr).unwrap().static_perfmux(0).unwrap();
        testing::fake(rtr)
            .poke(pmmsys::SYS0ROUTER_ENGINESTATUS, 0x2)
            .unwrap();

        let err = disable_triggers(&hwpm).unwrap_err();
        assert!(matches!(
            err,
            HwpmError::HardwareTimeout { condition: "SYS0ROUTER_ENGINESTATUS_STATUS_EMPTY", .. }
        ));
    }

    #[test]
    fn test_disable_triggers_requires_mapped_apertures() {
        let (hwpm, _log) = testing::t234_session();
        assert!(matches!(
            disable_triggers(&hwpm),
            Err(HwpmError::ResourceUnavailable(_))
        ));
    }
}
