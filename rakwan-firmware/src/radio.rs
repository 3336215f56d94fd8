//! Radio wiring types and the downlink handler

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use portable_atomic::{AtomicU32, Ordering};

use rakwan_driver::{DataEvent, Ingest, Radio};
use rakwan_hal_rp2040::{IoRx, IoTx};

pub type RadioTx = IoTx<BufferedUartTx>;
pub type RadioRx = IoRx<BufferedUartRx>;

/// Driver instance shared by every task
pub type SharedRadio = Radio<CriticalSectionRawMutex, RadioTx>;

pub type RadioIngest = Ingest<'static, CriticalSectionRawMutex, RadioTx, RadioRx>;

/// Packets received since boot
pub static DOWNLINKS: AtomicU32 = AtomicU32::new(0);

/// Inbound data callback
///
/// Runs on the ingestion task, so it only logs and counts.
pub fn on_data(event: &DataEvent<'_>) {
    match &event.packet {
        Some(packet) => {
            let n = DOWNLINKS.fetch_add(1, Ordering::Relaxed) + 1;
            info!(
                "RX #{}: rssi={} snr={} {:02X}",
                n,
                packet.rssi,
                packet.snr,
                packet.payload.as_slice()
            );
        }
        None => warn!("Unparsed data event: {}", event.raw),
    }
}
