//! Transaction engine
//!
//! One AT exchange at a time: take the exclusivity lock, drop stale bytes
//! from the transaction channel, write the command, then accumulate the
//! response until a terminator or the timeout.
//!
//! ```text
//!            ┌──────────┐  bytes while AwaitingResponse  ┌─────────────┐
//!  UART RX ─►│  Ingest  │───────────────────────────────►│   Channel   │─► execute()
//!            │          │                                 └─────────────┘
//!            │ tokenizer│─► +EVT:RXP2P ─► callback
//!            └──────────┘
//! ```

use core::cell::Cell;
use core::cmp::min;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{with_timeout, Duration, Instant};
use rakwan_core::state::{Outcome, TransactionEvent, TransactionState};
use rakwan_hal::UartTx;
use rakwan_protocol::at::LINE_END;
use rakwan_protocol::{DataEvent, EvtKind, LineTokenizer, Token};

use crate::config::{DriverConfig, CHANNEL_CAPACITY};
use crate::error::Error;
use crate::response::Response;

/// Inbound data callback
///
/// Runs on the ingestion task; the event borrows the tokenizer's line and
/// is only valid for the duration of the call.
pub type EventCallback = fn(&DataEvent<'_>);

/// What terminates a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// `OK` line succeeds, `ERROR` fails
    OkLine,
    /// Succeeds once both the `OK` line and the `success` event have
    /// arrived, in either order. The `failure` event or `ERROR` fails
    /// immediately.
    Event { success: EvtKind, failure: EvtKind },
}

/// Terminators seen so far in one response
struct Terminator {
    completion: Completion,
    tokenizer: LineTokenizer,
    ok_seen: bool,
    event_seen: bool,
}

impl Terminator {
    fn new(completion: Completion) -> Self {
        Self {
            completion,
            tokenizer: LineTokenizer::new(),
            ok_seen: false,
            event_seen: false,
        }
    }

    fn feed(&mut self, byte: u8) -> Option<Outcome> {
        match (self.tokenizer.feed(byte), self.completion) {
            (Token::ProtocolError, _) => Some(Outcome::ProtocolError),
            (Token::Success, Completion::OkLine) => Some(Outcome::Success),
            (Token::Success, Completion::Event { .. }) => {
                self.ok_seen = true;
                self.settled()
            }
            (Token::Event(kind), Completion::Event { success, .. }) if kind == success => {
                self.event_seen = true;
                self.settled()
            }
            (Token::Event(kind), Completion::Event { failure, .. }) if kind == failure => {
                Some(Outcome::ProtocolError)
            }
            _ => None,
        }
    }

    fn settled(&self) -> Option<Outcome> {
        (self.ok_seen && self.event_seen).then_some(Outcome::Success)
    }
}

/// Classified result of one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction<const N: usize> {
    pub outcome: Outcome,
    pub response: Response<N>,
}

/// Driver counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Transactions that reached the response wait
    pub transactions: u32,
    pub timeouts: u32,
    pub protocol_errors: u32,
    pub lock_timeouts: u32,
    pub write_failures: u32,
    pub overflows: u32,
    /// Data events delivered to the callback
    pub data_events: u32,
    pub read_errors: u32,
    /// Queued bytes discarded before a transaction
    pub stale_bytes: u32,
}

/// RAK3172 driver
///
/// Owns the UART transmit half behind the exclusivity lock. Shared by
/// reference between the ingestion task and any number of callers.
pub struct Radio<M: RawMutex, T> {
    tx: Mutex<M, T>,
    channel: Channel<M, u8, CHANNEL_CAPACITY>,
    state: BlockingMutex<M, Cell<TransactionState>>,
    callback: BlockingMutex<M, Cell<Option<EventCallback>>>,
    stats: BlockingMutex<M, Cell<Stats>>,
    config: DriverConfig,
}

/// Lock holder for one transaction
///
/// Dropping it returns the state to `Idle` before the lock guard is
/// released, on every exit path.
struct Session<'a, M: RawMutex, T> {
    radio: &'a Radio<M, T>,
    tx: MutexGuard<'a, M, T>,
}

impl<M: RawMutex, T> Drop for Session<'_, M, T> {
    fn drop(&mut self) {
        self.radio.advance(TransactionEvent::Released);
    }
}

impl<M: RawMutex, T> Radio<M, T> {
    /// Create a driver around the UART transmit half
    pub fn new(tx: T, config: DriverConfig) -> Self {
        Self {
            tx: Mutex::new(tx),
            channel: Channel::new(),
            state: BlockingMutex::new(Cell::new(TransactionState::Idle)),
            callback: BlockingMutex::new(Cell::new(None)),
            stats: BlockingMutex::new(Cell::new(Stats::default())),
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Current transaction state
    pub fn state(&self) -> TransactionState {
        self.state.lock(|s| s.get())
    }

    /// Whether inbound bytes currently belong to a transaction
    pub fn is_in_flight(&self) -> bool {
        self.state().is_awaiting_response()
    }

    pub fn stats(&self) -> Stats {
        self.stats.lock(|s| s.get())
    }

    /// Register the inbound data callback, replacing any previous one
    pub fn register_event_callback(&self, callback: EventCallback) {
        self.callback.lock(|c| c.set(Some(callback)));
    }

    pub fn clear_event_callback(&self) {
        self.callback.lock(|c| c.set(None));
    }

    fn advance(&self, event: TransactionEvent) {
        self.state.lock(|s| s.set(s.get().transition(event)));
    }

    /// Queue a byte for the running transaction, `false` if the channel is full
    pub(crate) fn try_forward(&self, byte: u8) -> bool {
        self.channel.try_send(byte).is_ok()
    }

    /// Hand a data event to the registered callback
    pub(crate) fn dispatch_data(&self, event: &DataEvent<'_>) {
        if let Some(callback) = self.callback.lock(|c| c.get()) {
            self.record(|s| s.data_events += 1);
            callback(event);
        }
    }

    pub(crate) fn record(&self, update: impl FnOnce(&mut Stats)) {
        self.stats.lock(|cell| {
            let mut stats = cell.get();
            update(&mut stats);
            cell.set(stats);
        });
    }
}

impl<M: RawMutex, T: UartTx> Radio<M, T> {
    /// Drop bytes left in the transaction channel
    ///
    /// Takes the lock, so it never steals bytes from a running exchange.
    /// Returns the number of bytes discarded.
    pub async fn discard_pending(&self) -> Result<usize, Error> {
        let _session = self.acquire().await?;
        Ok(self.drain())
    }

    /// Run a command and return its response on success
    ///
    /// `ERROR` maps to [`Error::ProtocolError`], a missing terminator to
    /// [`Error::ResponseTimeout`].
    pub async fn execute<const N: usize>(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<Response<N>, Error> {
        let transaction = self.transact::<N>(command, timeout).await?;
        match transaction.outcome {
            Outcome::Success => Ok(transaction.response),
            Outcome::Timeout => Err(Error::ResponseTimeout),
            Outcome::ProtocolError => Err(Error::ProtocolError),
        }
    }

    /// Run a command terminated by `OK` / `ERROR`
    pub async fn transact<const N: usize>(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<Transaction<N>, Error> {
        self.transact_until(command, timeout, Completion::OkLine)
            .await
    }

    /// Run a command with an explicit completion rule
    ///
    /// Timeouts and `ERROR` are reported in the returned outcome so the raw
    /// response stays available. Lock, write and overflow failures are
    /// errors.
    pub async fn transact_until<const N: usize>(
        &self,
        command: &str,
        timeout: Duration,
        completion: Completion,
    ) -> Result<Transaction<N>, Error> {
        let mut session = self.acquire().await?;

        let stale = self.drain();
        if stale > 0 {
            debug!("radio: dropped {} stale bytes", stale);
        }

        // In flight before the write so a fast reply is not missed
        self.advance(TransactionEvent::CommandDispatched);
        debug!("radio -> {}", command);
        if let Err(e) = Self::write_command(&mut *session.tx, command) {
            self.record(|s| s.write_failures += 1);
            warn!("radio: write failed for {}", command);
            return Err(e);
        }
        self.record(|s| s.transactions += 1);

        let mut response = Response::<N>::new();
        let mut terminator = Terminator::new(completion);
        let started = Instant::now();

        let outcome = 'wait: loop {
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                break Outcome::Timeout;
            }
            let wait = min(self.config.read_timeout, timeout - elapsed);

            let Ok(byte) = with_timeout(wait, self.channel.receive()).await else {
                continue;
            };
            if let Some(outcome) = self.accept(byte, &mut response, &mut terminator)? {
                break outcome;
            }

            // Take whatever else is already queued before sleeping again
            while let Ok(byte) = self.channel.try_receive() {
                if let Some(outcome) = self.accept(byte, &mut response, &mut terminator)? {
                    break 'wait outcome;
                }
            }
        };

        self.advance(TransactionEvent::ResponseComplete(outcome));
        match outcome {
            Outcome::Success => {}
            Outcome::Timeout => {
                self.record(|s| s.timeouts += 1);
                warn!("radio: {} timed out", command);
            }
            Outcome::ProtocolError => {
                self.record(|s| s.protocol_errors += 1);
                warn!("radio: {} returned ERROR", command);
            }
        }
        if let Some(text) = response.as_str() {
            trace!("radio <- {}", text);
        }

        drop(session);
        Ok(Transaction { outcome, response })
    }

    /// Append one byte and check for a terminator
    fn accept<const N: usize>(
        &self,
        byte: u8,
        response: &mut Response<N>,
        terminator: &mut Terminator,
    ) -> Result<Option<Outcome>, Error> {
        if let Err(e) = response.push(byte) {
            self.record(|s| s.overflows += 1);
            warn!("radio: response exceeded {} bytes", N);
            return Err(e);
        }

        Ok(terminator.feed(byte))
    }

    async fn acquire(&self) -> Result<Session<'_, M, T>, Error> {
        let Ok(tx) = with_timeout(self.config.lock_timeout, self.tx.lock()).await else {
            self.record(|s| s.lock_timeouts += 1);
            warn!("radio: lock wait timed out");
            return Err(Error::LockTimeout);
        };
        self.advance(TransactionEvent::LockAcquired);
        Ok(Session { radio: self, tx })
    }

    fn write_command(tx: &mut T, command: &str) -> Result<(), Error> {
        if !tx.is_writable() {
            return Err(Error::WriteFailure);
        }
        tx.write_blocking(command.as_bytes())
            .and_then(|_| tx.write_blocking(LINE_END.as_bytes()))
            .and_then(|_| tx.flush())
            .map_err(|_| Error::WriteFailure)
    }

    fn drain(&self) -> usize {
        let mut count = 0;
        while self.channel.try_receive().is_ok() {
            count += 1;
        }
        if count > 0 {
            self.record(|s| s.stale_bytes = s.stale_bytes.wrapping_add(count as u32));
        }
        count
    }
}
