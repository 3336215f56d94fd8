//! Hardware reset

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use rakwan_core::config::DriverTimings;
use rakwan_hal::{OutputPin, UartTx};

use crate::error::Error;
use crate::radio::Radio;

/// Reset pulse timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTiming {
    /// Time the reset line is held low
    pub hold: Duration,
    /// Time allowed for the module to boot after release
    pub boot_wait: Duration,
}

impl Default for ResetTiming {
    fn default() -> Self {
        Self::from(&DriverTimings::default())
    }
}

impl From<&DriverTimings> for ResetTiming {
    fn from(t: &DriverTimings) -> Self {
        Self {
            hold: Duration::from_millis(t.reset_hold_ms as u64),
            boot_wait: Duration::from_millis(t.boot_wait_ms as u64),
        }
    }
}

/// Pulse the radio's active-low reset line and flush its boot output
///
/// The ingestion task should be running so the boot banner is consumed.
/// Returns the number of stale bytes discarded afterwards.
pub async fn hard_reset<P, M, T>(
    pin: &mut P,
    radio: &Radio<M, T>,
    timing: ResetTiming,
) -> Result<usize, Error>
where
    P: OutputPin,
    M: RawMutex,
    T: UartTx,
{
    info!("radio: hardware reset");
    pin.set_low();
    Timer::after(timing.hold).await;
    pin.set_high();
    Timer::after(timing.boot_wait).await;

    radio.discard_pending().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{setup, with_ingest, MockPin};

    fn quick() -> ResetTiming {
        ResetTiming {
            hold: Duration::from_millis(2),
            boot_wait: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_default_timing() {
        let timing = ResetTiming::default();
        assert_eq!(timing.hold, Duration::from_millis(100));
        assert_eq!(timing.boot_wait, Duration::from_millis(500));
    }

    #[test]
    fn test_pulse_low_then_high() {
        let (wire, radio, rx) = setup();
        let mut pin = MockPin::default();
        wire.inject(b"RAK3172 boot\r\nCurrent Work Mode: LoRaWAN.\r\n");

        let result = with_ingest(&radio, rx, hard_reset(&mut pin, &radio, quick()));

        assert_eq!(result, Ok(0));
        assert_eq!(pin.levels, [false, true]);
        assert!(pin.is_set_high());
        assert!(wire.written().is_empty());
    }

    #[test]
    fn test_radio_usable_after_reset() {
        let (wire, radio, rx) = setup();
        let mut pin = MockPin::default();
        wire.expect("AT", b"OK\r\n");

        let result = with_ingest(&radio, rx, async {
            hard_reset(&mut pin, &radio, quick()).await?;
            radio.execute::<16>("AT", Duration::from_millis(50)).await
        });

        assert!(result.is_ok());
    }
}
