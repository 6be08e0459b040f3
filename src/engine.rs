//! Event loop that owns the write path of a book.
//!
//! [`BookEngine`] spawns one tokio task per run. Producers submit
//! [`OrderEvent`]s through cloneable [`EngineHandle`]s over a bounded queue
//! and each gets its own reply. Evictions caused by adds are published on a
//! broadcast channel so cancelled orders can be reported upstream.
//!
//! # Example
//!
//! ```rust
//! use pricebook::{BookConfig, BookEngine, EngineConfig, LimitOrderBook};
//! use pricebook::types::{Order, OrderId, Side};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pricebook::Result<()> {
//! let book = LimitOrderBook::new(BookConfig::new("TEST").with_max_depth(Some(1)))?;
//! let mut engine = BookEngine::new(book, EngineConfig::default())?;
//! let mut evictions = engine.subscribe_evictions();
//!
//! let handle = engine.start()?;
//! handle.add(Order::bid(1, 100, 10)).await?;
//! handle.add(Order::bid(2, 101, 10)).await?;
//!
//! let eviction = evictions.recv().await.unwrap();
//! assert_eq!(eviction.order_ids(), vec![OrderId(1)]);
//! assert_eq!(engine.book().top_of_book().bid_price(), Some(101));
//!
//! engine.stop().await?;
//! # Ok(())
//! # }
//! ```

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::error::Error;
use crate::orderbook::SharedBook;
use crate::types::{EventOutcome, Eviction, Order, OrderEvent, OrderId, Price, Quantity, Side};

type Reply = oneshot::Sender<Result<EventOutcome, Error>>;

/// One queued event and where to send its result
#[derive(Debug)]
struct Command {
    event: OrderEvent,
    reply: Reply,
}

/// State of a started engine
#[derive(Debug)]
struct Running {
    commands: mpsc::Sender<Command>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Single writer for a [`SharedBook`].
///
/// The engine is restartable: `stop` followed by `start` spawns a fresh
/// loop over the same book. Handles from a previous run report
/// [`Error::EngineStopped`].
#[derive(Debug)]
pub struct BookEngine {
    book: SharedBook,
    config: EngineConfig,
    evictions: broadcast::Sender<Eviction>,
    running: Option<Running>,
}

impl BookEngine {
    /// Create a stopped engine over a book
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either channel capacity is zero.
    pub fn new(book: impl Into<SharedBook>, config: EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        let (evictions, _) = broadcast::channel(config.eviction_capacity());
        Ok(Self {
            book: book.into(),
            config,
            evictions,
            running: None,
        })
    }

    /// Book the engine writes to. Clones of it may be read at any time.
    pub fn book(&self) -> &SharedBook {
        &self.book
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Receive every eviction published from now on
    pub fn subscribe_evictions(&self) -> broadcast::Receiver<Eviction> {
        self.evictions.subscribe()
    }

    /// Returns `true` while the loop task is alive
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    /// Spawn the event loop on the current tokio runtime
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if the engine is already running or no
    /// runtime is available.
    pub fn start(&mut self) -> Result<EngineHandle, Error> {
        if self.is_running() {
            return Err(Error::Engine("engine is already running".to_string()));
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|e| Error::Engine(e.to_string()))?;

        let (commands, receiver) = mpsc::channel(self.config.command_capacity());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = runtime.spawn(run(
            self.book.clone(),
            receiver,
            self.evictions.clone(),
            shutdown_rx,
        ));

        info!(
            symbol = %self.book.symbol(),
            command_capacity = self.config.command_capacity(),
            "book engine started"
        );
        let handle = EngineHandle {
            commands: commands.clone(),
            evictions: self.evictions.clone(),
        };
        self.running = Some(Running {
            commands,
            shutdown,
            task,
        });
        Ok(handle)
    }

    /// Another producer handle for the running loop
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineStopped`] if the engine is not running.
    pub fn handle(&self) -> Result<EngineHandle, Error> {
        match &self.running {
            Some(running) if !running.task.is_finished() => Ok(EngineHandle {
                commands: running.commands.clone(),
                evictions: self.evictions.clone(),
            }),
            _ => Err(Error::EngineStopped),
        }
    }

    /// Signal the loop to stop and wait for it to exit.
    ///
    /// Commands still queued are dropped and their submitters receive
    /// [`Error::EngineStopped`]. Stopping a stopped engine is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if the loop task panicked.
    pub async fn stop(&mut self) -> Result<(), Error> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        // The loop may already be gone; that is fine.
        let _ = running.shutdown.send(true);
        drop(running.commands);
        running
            .task
            .await
            .map_err(|e| Error::Engine(e.to_string()))
    }
}

impl Drop for BookEngine {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            let _ = running.shutdown.send(true);
        }
    }
}

/// Cloneable producer for a running [`BookEngine`]
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    evictions: broadcast::Sender<Eviction>,
}

impl EngineHandle {
    /// Queue an event and wait for its outcome.
    ///
    /// Waits for queue space when the queue is full.
    ///
    /// # Errors
    ///
    /// Returns the book's error for a rejected event, or
    /// [`Error::EngineStopped`] if the loop stopped before answering.
    pub async fn submit(&self, event: OrderEvent) -> Result<EventOutcome, Error> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command { event, reply })
            .await
            .map_err(|_| Error::EngineStopped)?;
        response.await.map_err(|_| Error::EngineStopped)?
    }

    /// Add a resting order
    ///
    /// # Errors
    ///
    /// See [`LimitOrderBook::add_order`](crate::LimitOrderBook::add_order).
    pub async fn add(&self, order: Order) -> Result<Option<Eviction>, Error> {
        match self.submit(OrderEvent::add(order)).await? {
            EventOutcome::Added { eviction } => Ok(eviction),
            other => Err(unexpected(other)),
        }
    }

    /// Cancel a resting order
    ///
    /// # Errors
    ///
    /// See [`LimitOrderBook::cancel_order`](crate::LimitOrderBook::cancel_order).
    pub async fn cancel(&self, id: OrderId, side: Side, price: Price) -> Result<Order, Error> {
        match self.submit(OrderEvent::cancel(id, side, price)).await? {
            EventOutcome::Cancelled { order } => Ok(order),
            other => Err(unexpected(other)),
        }
    }

    /// Replace the quantity of a resting order
    ///
    /// # Errors
    ///
    /// See [`LimitOrderBook::amend_order`](crate::LimitOrderBook::amend_order).
    pub async fn amend(
        &self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<Order, Error> {
        match self.submit(OrderEvent::amend(id, side, price, quantity)).await? {
            EventOutcome::Amended { order } => Ok(order),
            other => Err(unexpected(other)),
        }
    }

    /// Receive every eviction published from now on
    pub fn subscribe_evictions(&self) -> broadcast::Receiver<Eviction> {
        self.evictions.subscribe()
    }

    /// Returns `true` once the loop has stopped
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

fn unexpected(outcome: EventOutcome) -> Error {
    Error::Engine(format!("mismatched outcome: {:?}", outcome))
}

async fn run(
    book: SharedBook,
    mut commands: mpsc::Receiver<Command>,
    evictions: broadcast::Sender<Eviction>,
    mut shutdown: watch::Receiver<bool>,
) {
    let symbol = book.symbol();
    let mut processed: u64 = 0;

    loop {
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!(%symbol, "shutdown signal received");
                    break;
                }
            }

            Some(Command { event, reply }) = commands.recv() => {
                debug!(
                    %symbol,
                    id = %event.order_id(),
                    side = %event.side(),
                    "handling order event"
                );
                let result = book.apply(event);

                if let Some(eviction) = result.as_ref().ok().and_then(EventOutcome::eviction) {
                    // No subscribers is not an error.
                    let receivers = evictions.send(eviction.clone()).unwrap_or(0);
                    trace!(%symbol, price = eviction.price, receivers, "published eviction");
                }
                if reply.send(result).is_err() {
                    trace!(%symbol, "submitter dropped before reply");
                }
                processed += 1;
            }

            else => break,
        }
    }

    info!(%symbol, processed, "book engine stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookConfig;
    use crate::orderbook::LimitOrderBook;

    fn book() -> LimitOrderBook {
        LimitOrderBook::new(BookConfig::new("TEST")).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = EngineConfig::default().with_eviction_capacity(0);
        assert!(matches!(
            BookEngine::new(book(), config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_start_without_runtime() {
        let mut engine = BookEngine::new(book(), EngineConfig::default()).unwrap();
        assert!(matches!(engine.start(), Err(Error::Engine(_))));
        assert!(!engine.is_running());
        assert_eq!(engine.handle().unwrap_err(), Error::EngineStopped);
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut engine = BookEngine::new(book(), EngineConfig::default()).unwrap();
        let _handle = engine.start().unwrap();
        assert!(matches!(engine.start(), Err(Error::Engine(_))));
        engine.stop().await.unwrap();
    }
}
