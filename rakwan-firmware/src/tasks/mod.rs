//! Embassy async tasks

pub mod lorawan;
pub mod radio_rx;

pub use lorawan::lorawan_task;
pub use radio_rx::radio_rx_task;
