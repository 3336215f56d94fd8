//! LoRaWAN node task
//!
//! Brings the radio up (reset, version check, credentials, OTAA join) and
//! then sends a periodic uplink. Any bring-up failure restarts the whole
//! sequence from the hardware reset.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker, Timer};
use heapless::String;
use portable_atomic::Ordering;

use rakwan_core::config::LorawanConfig;
use rakwan_driver::{hard_reset, Error, ResetTiming};
use rakwan_hal_rp2040::ResetPin;

use crate::radio::{SharedRadio, DOWNLINKS};

/// Reset line type on this board
pub type RadioReset = ResetPin<Output<'static>>;

/// Delay before restarting a failed bring-up
const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Room for strings like `RUI_4.0.6_RAK3172-E`
const VERSION_LEN: usize = 32;

#[embassy_executor::task]
pub async fn lorawan_task(
    radio: &'static SharedRadio,
    mut reset: RadioReset,
    timing: ResetTiming,
    config: LorawanConfig,
) {
    info!("LoRaWAN task started");

    while let Err(e) = bring_up(radio, &mut reset, timing, &config).await {
        error!("Radio bring-up failed: {}", e);
        Timer::after(RETRY_DELAY).await;
    }

    uplink_loop(radio, &config).await
}

async fn bring_up(
    radio: &SharedRadio,
    reset: &mut RadioReset,
    timing: ResetTiming,
    config: &LorawanConfig,
) -> Result<(), Error> {
    let stale = hard_reset(reset, radio, timing).await?;
    debug!("Reset complete, {} stale bytes dropped", stale);

    let version: String<VERSION_LEN> = radio.version().await?;
    info!("RAK3172 firmware {}", version.as_str());

    radio.configure(config).await?;
    join(radio, config).await
}

/// OTAA join with the configured number of attempts
async fn join(radio: &SharedRadio, config: &LorawanConfig) -> Result<(), Error> {
    let window = Duration::from_millis(config.join_timeout_ms as u64);
    let mut last = Error::JoinFailed;

    for attempt in 1..=config.join_attempts {
        info!("Join attempt {}/{}", attempt, config.join_attempts);
        match radio.join(window).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!("Join attempt {} failed: {}", attempt, e);
                last = e;
            }
        }
    }
    Err(last)
}

/// Send a counter uplink every `uplink_interval_s`
async fn uplink_loop(radio: &SharedRadio, config: &LorawanConfig) -> ! {
    let interval = Duration::from_secs(config.uplink_interval_s.max(1) as u64);
    let mut ticker = Ticker::every(interval);
    let mut counter: u32 = 0;

    loop {
        ticker.next().await;

        // Uplink counter followed by the downlink count
        let mut payload = [0u8; 8];
        payload[..4].copy_from_slice(&counter.to_be_bytes());
        let downlinks = DOWNLINKS.load(Ordering::Relaxed);
        payload[4..].copy_from_slice(&downlinks.to_be_bytes());

        let result = if config.confirmed {
            radio.send_confirmed(config.port, &payload).await
        } else {
            radio.send_unconfirmed(config.port, &payload).await
        };

        match result {
            Ok(()) => info!("Uplink {} sent", counter),
            Err(e) => warn!("Uplink {} failed: {}", counter, e),
        }
        counter = counter.wrapping_add(1);

        let stats = radio.stats();
        trace!("Radio stats: {}", stats);
    }
}
