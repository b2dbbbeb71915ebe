//! Async facade around [`SliderEngine`].
//!
//! A controller is a single task that owns the engine. Store notifications
//! and resize signals are coalesced over a debounce window into one layout
//! pass; manual turns, hover changes and timer firings are applied in the
//! order the task observes them, each running to completion before the next.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::config::{ConfigChange, Direction, PartialSliderConfig};
use crate::engine::{LayoutOutcome, SliderEngine};
use crate::error::{Result, SliderError};
use crate::events::{SliderEvent, SliderEventBus};
use crate::store::{ConfigStore, StoreEvent};
use crate::surface::ViewportSurface;

/// Runtime knobs for a controller task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Quiet period (ms) after the last store or resize notification before
    /// the layout pass runs.
    pub debounce_window_ms: u64,
    /// Capacity of the outward event channel.
    pub event_capacity: usize,
    /// Capacity of the inbound command channel.
    pub command_capacity: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce_window_ms: 100,
            event_capacity: 64,
            command_capacity: 32,
        }
    }
}

impl ControllerSettings {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }
}

enum ControllerCommand {
    Turn(Direction),
    Resize,
    HoverEnter,
    HoverLeave,
    Shutdown(oneshot::Sender<()>),
}

impl fmt::Debug for ControllerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerCommand::Turn(direction) => {
                f.debug_tuple("Turn").field(direction).finish()
            }
            ControllerCommand::Resize => f.write_str("Resize"),
            ControllerCommand::HoverEnter => f.write_str("HoverEnter"),
            ControllerCommand::HoverLeave => f.write_str("HoverLeave"),
            ControllerCommand::Shutdown(_) => f.write_str("Shutdown"),
        }
    }
}

/// Work waiting for the debounce window to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PendingKind {
    Resize,
    Full,
}

#[derive(Debug, Default)]
struct PendingLayout {
    kind: Option<PendingKind>,
    deadline: Option<Instant>,
}

impl PendingLayout {
    /// Record a notification. A full pass absorbs any pending resize and
    /// every notification pushes the deadline out again.
    fn mark(&mut self, kind: PendingKind, deadline: Instant) {
        self.kind = Some(self.kind.map_or(kind, |existing| existing.max(kind)));
        self.deadline = Some(deadline);
    }

    fn take(&mut self) -> Option<PendingKind> {
        self.deadline = None;
        self.kind.take()
    }
}

/// Spawns controller tasks.
#[derive(Debug)]
pub struct SliderController;

impl SliderController {
    /// Start a controller for `surface`, reading configuration and items from
    /// `store`. The first layout pass runs one debounce window after spawn.
    pub fn spawn<S>(
        surface: S,
        store: Arc<ConfigStore<S::Item>>,
        settings: ControllerSettings,
    ) -> SliderHandle<S::Item>
    where
        S: ViewportSurface + 'static,
    {
        let events = SliderEventBus::new(settings.event_capacity);
        let (commands, command_rx) =
            mpsc::channel(settings.command_capacity.max(1));
        let store_rx = store.subscribe();
        let engine =
            SliderEngine::new(surface, store.snapshot(), events.clone());

        let task = tokio::spawn(run_controller(
            engine,
            Arc::clone(&store),
            store_rx,
            command_rx,
            settings.debounce_window(),
        ));

        SliderHandle {
            commands,
            events,
            store,
            task,
        }
    }
}

/// Owner-side handle to a running controller. Dropping the handle stops the
/// controller.
pub struct SliderHandle<T> {
    commands: mpsc::Sender<ControllerCommand>,
    events: SliderEventBus,
    store: Arc<ConfigStore<T>>,
    task: JoinHandle<()>,
}

impl<T> fmt::Debug for SliderHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderHandle")
            .field("events", &self.events)
            .field("store", &self.store)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl<T: Send + Sync + 'static> SliderHandle<T> {
    pub fn store(&self) -> &Arc<ConfigStore<T>> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SliderEvent> {
        self.events.subscribe()
    }

    pub fn set_items(&self, items: impl Into<Arc<[T]>>) {
        self.store.set_items(items);
    }

    pub fn set_config(
        &self,
        partial: &PartialSliderConfig,
    ) -> Result<Option<ConfigChange>> {
        Ok(self.store.set_config(partial)?)
    }

    /// Manual advance; the automatic cadence restarts from now.
    pub async fn turn(&self, direction: Direction) -> Result<()> {
        self.send(ControllerCommand::Turn(direction)).await
    }

    /// The viewport may have changed size.
    pub async fn notify_resize(&self) -> Result<()> {
        self.send(ControllerCommand::Resize).await
    }

    pub async fn hover_enter(&self) -> Result<()> {
        self.send(ControllerCommand::HoverEnter).await
    }

    pub async fn hover_leave(&self) -> Result<()> {
        self.send(ControllerCommand::HoverLeave).await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the controller and wait for its task to exit. No tick fires
    /// after this returns.
    pub async fn shutdown(self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self
            .commands
            .send(ControllerCommand::Shutdown(ack_tx))
            .await
            .is_ok()
        {
            let _ = ack_rx.await;
        }
        drop(self.commands);
        self.task.await.map_err(|err| {
            SliderError::Internal(format!(
                "slider controller task failed: {err}"
            ))
        })
    }

    async fn send(&self, command: ControllerCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SliderError::ControllerClosed)
    }
}

async fn run_controller<S>(
    mut engine: SliderEngine<S>,
    store: Arc<ConfigStore<S::Item>>,
    mut store_rx: broadcast::Receiver<StoreEvent>,
    mut commands: mpsc::Receiver<ControllerCommand>,
    debounce: Duration,
) where
    S: ViewportSurface + 'static,
{
    let mut pending = PendingLayout::default();
    pending.mark(PendingKind::Full, Instant::now() + debounce);
    let mut store_open = true;

    loop {
        let layout_at = pending.deadline;
        let tick = engine.next_deadline();

        tokio::select! {
            biased;

            command = commands.recv() => {
                let now = Instant::now();
                match command {
                    Some(ControllerCommand::Turn(direction)) => {
                        engine.manual_turn(direction, now);
                    }
                    Some(ControllerCommand::Resize) => {
                        pending.mark(PendingKind::Resize, now + debounce);
                    }
                    Some(ControllerCommand::HoverEnter) => {
                        engine.hover_enter();
                    }
                    Some(ControllerCommand::HoverLeave) => {
                        engine.hover_leave(now);
                    }
                    Some(ControllerCommand::Shutdown(ack)) => {
                        engine.shutdown();
                        let _ = ack.send(());
                        break;
                    }
                    None => {
                        engine.shutdown();
                        break;
                    }
                }
            }

            event = store_rx.recv(), if store_open => {
                match event {
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(
                            skipped,
                            "slider controller lagged behind store; \
                             relayout scheduled"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        store_open = false;
                        continue;
                    }
                }
                pending.mark(PendingKind::Full, Instant::now() + debounce);
            }

            _ = sleep_until(layout_at.unwrap_or_else(Instant::now)),
                if layout_at.is_some() =>
            {
                let now = Instant::now();
                let outcome = match pending.take() {
                    Some(PendingKind::Full) => {
                        engine.apply_snapshot(store.snapshot());
                        engine.relayout(now)
                    }
                    Some(PendingKind::Resize) => engine.resize(now),
                    None => continue,
                };
                if outcome == LayoutOutcome::Deferred {
                    debug!("slider layout deferred until the next resize");
                }
            }

            _ = sleep_until(tick.map_or_else(Instant::now, |(_, at)| at)),
                if tick.is_some() =>
            {
                if let Some((handle, _)) = tick {
                    engine.tick(handle, Instant::now());
                }
            }
        }
    }

    debug!("slider controller stopped");
}
