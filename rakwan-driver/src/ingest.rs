//! Ingestion loop
//!
//! Single consumer of the UART receive half. Every byte goes to the line
//! tokenizer, and to the transaction channel while a transaction is
//! waiting for its response. Completed event lines are dispatched here,
//! whether or not a transaction is in flight.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Timer;
use rakwan_hal::{UartRx, UartTx};
use rakwan_protocol::{DataEvent, EventKind, EventLine, LineTokenizer, Token, LINE_CAPACITY};

use crate::radio::Radio;

/// Which consumer a completed line arrived under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// A transaction was awaiting its response
    Transaction,
    /// No transaction in flight
    Idle,
}

/// Background reader for the radio UART
pub struct Ingest<'a, M: RawMutex, T, R> {
    radio: &'a Radio<M, T>,
    rx: R,
    tokenizer: LineTokenizer,
}

impl<'a, M: RawMutex, T: UartTx, R: UartRx> Ingest<'a, M, T, R> {
    pub fn new(radio: &'a Radio<M, T>, rx: R) -> Self {
        Self {
            radio,
            rx,
            tokenizer: LineTokenizer::new(),
        }
    }

    /// Poll the UART forever
    ///
    /// Sleeps for the configured poll interval whenever the receive FIFO
    /// is empty.
    pub async fn run(&mut self) -> ! {
        info!("radio ingestion started");
        loop {
            if self.pump().await == 0 {
                Timer::after(self.radio.config().poll_interval).await;
            }
        }
    }

    /// Drain everything currently readable
    ///
    /// Returns the number of bytes processed.
    pub async fn pump(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.rx.try_read_byte() {
                Ok(Some(byte)) => {
                    self.ingest(byte).await;
                    count += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    self.radio.record(|s| s.read_errors += 1);
                    warn!("radio: UART read error");
                    break;
                }
            }
        }
        count
    }

    async fn ingest(&mut self, byte: u8) {
        let route = if self.radio.is_in_flight() {
            self.forward(byte).await;
            Route::Transaction
        } else {
            Route::Idle
        };

        if let Token::Event(_) = self.tokenizer.feed(byte) {
            self.dispatch(route);
        }
    }

    /// Queue a byte for the transaction, backing off while the channel is full
    async fn forward(&self, byte: u8) {
        while !self.radio.try_forward(byte) {
            // Nobody will read it once the transaction is over
            if !self.radio.is_in_flight() {
                return;
            }
            Timer::after(self.radio.config().backoff).await;
        }
    }

    fn dispatch(&self, route: Route) {
        let Some(event) = EventLine::classify(self.tokenizer.line()) else {
            return;
        };

        match event.kind {
            EventKind::Data => {
                let data = if self.tokenizer.overflowed() {
                    warn!("radio: data event longer than {} bytes", LINE_CAPACITY);
                    DataEvent::truncated(event.raw)
                } else {
                    DataEvent::from_line(event.raw)
                };
                if data.packet.is_none() {
                    warn!("radio: malformed data event {}", event.raw);
                }
                debug!("radio: data event ({})", route);
                self.radio.dispatch_data(&data);
            }
            EventKind::Generic(kind) => {
                info!("radio: {} ({})", kind, route);
            }
        }
    }
}
