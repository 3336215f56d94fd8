//! Radio UART receive task

use crate::radio::RadioIngest;

/// Feeds the driver from the UART receive buffer for the lifetime of the firmware
#[embassy_executor::task]
pub async fn radio_rx_task(mut ingest: RadioIngest) {
    ingest.run().await
}
