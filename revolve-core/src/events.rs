use std::fmt;

use tokio::sync::broadcast;

/// Outward notifications produced by a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderEvent {
    /// Emitted after every pagination rebuild.
    PagesQuantityChanged(usize),
    /// Emitted after every advance and after every rebuild (reset to 0).
    CurrentPageChanged(usize),
}

/// In-process fan-out of [`SliderEvent`]s. Publishing never blocks; slow
/// subscribers observe `Lagged` and should resync from the latest event.
#[derive(Clone)]
pub struct SliderEventBus {
    sender: broadcast::Sender<SliderEvent>,
    capacity: usize,
}

impl fmt::Debug for SliderEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderEventBus")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl SliderEventBus {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    pub fn publish(&self, event: SliderEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SliderEvent> {
        self.sender.subscribe()
    }
}
