//! Config store: the single owner of the slider configuration and the item
//! collection. Consumers read snapshots and react to structured change
//! events; several controllers may share one store.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::config::{
    ConfigChange, ConfigFields, PartialSliderConfig, SliderConfig,
};
use crate::error::ConfigError;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Current store contents.
#[derive(Debug)]
pub struct StoreSnapshot<T> {
    pub config: SliderConfig,
    pub items: Arc<[T]>,
}

impl<T> Clone for StoreSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            items: Arc::clone(&self.items),
        }
    }
}

/// Published after every effective mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The item collection was replaced.
    Items {
        /// Length of the new collection.
        len: usize,
    },
    /// A merge changed at least one field.
    Config(ConfigChange),
}

/// Single owner of one slider configuration and its item collection.
///
/// Readers take [`StoreSnapshot`]s; every effective mutation is also
/// published once on a bounded broadcast feed. Subscribers that fall more
/// than the feed capacity behind see `Lagged` and must resync from a
/// snapshot.
pub struct ConfigStore<T> {
    state: watch::Sender<StoreSnapshot<T>>,
    events: broadcast::Sender<StoreEvent>,
}

impl<T> fmt::Debug for ConfigStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ConfigStore")
            .field("config", &state.config)
            .field("item_count", &state.items.len())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl<T: Send + Sync + 'static> Default for ConfigStore<T> {
    fn default() -> Self {
        Self::build(SliderConfig::default(), DEFAULT_EVENT_CAPACITY)
    }
}

impl<T: Send + Sync + 'static> ConfigStore<T> {
    pub fn new(config: SliderConfig) -> Result<Self, ConfigError> {
        Self::with_event_capacity(config, DEFAULT_EVENT_CAPACITY)
    }

    /// Like [`new`](Self::new) with a change feed holding `capacity` events
    /// (at least one).
    pub fn with_event_capacity(
        config: SliderConfig,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, capacity))
    }

    fn build(config: SliderConfig, capacity: usize) -> Self {
        let (state, _) = watch::channel(StoreSnapshot {
            config,
            items: Arc::<[T]>::from(Vec::new()),
        });
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { state, events }
    }

    /// Replace the item collection.
    pub fn set_items(&self, items: impl Into<Arc<[T]>>) {
        let items = items.into();
        let len = items.len();
        self.state.send_modify(|snapshot| snapshot.items = items);
        debug!(len, "slider items replaced");
        let _ = self.events.send(StoreEvent::Items { len });
    }

    /// Merge a partial update. Returns the published change, or `None` when
    /// no field actually changed. A merge that would produce an invalid
    /// configuration is rejected and leaves the store untouched.
    pub fn set_config(
        &self,
        partial: &PartialSliderConfig,
    ) -> Result<Option<ConfigChange>, ConfigError> {
        let mut outcome = Ok(None);
        self.state.send_if_modified(|snapshot| {
            let (next, changed) = snapshot.config.merged(partial);
            if changed.is_empty() {
                return false;
            }
            if let Err(err) = next.validate() {
                outcome = Err(err);
                return false;
            }
            snapshot.config = next;
            outcome = Ok(Some(ConfigChange {
                config: next,
                changed,
            }));
            true
        });

        match &outcome {
            Ok(Some(change)) => {
                debug!(changed = ?change.changed, "slider config updated");
                let _ = self.events.send(StoreEvent::Config(*change));
            }
            Ok(None) => {}
            Err(err) => warn!(%err, ?partial, "rejected slider config update"),
        }
        outcome
    }

    pub fn config(&self) -> SliderConfig {
        self.state.borrow().config
    }

    pub fn items(&self) -> Arc<[T]> {
        Arc::clone(&self.state.borrow().items)
    }

    pub fn snapshot(&self) -> StoreSnapshot<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Live receivers of the change feed, options views included.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Read-only, field-filterable change feed.
    pub fn options_view(&self) -> OptionsView<T> {
        OptionsView {
            state: self.state.subscribe(),
            events: self.events.subscribe(),
        }
    }
}

/// Read-only view over a [`ConfigStore`] for consumers that only care about
/// particular fields.
pub struct OptionsView<T> {
    state: watch::Receiver<StoreSnapshot<T>>,
    events: broadcast::Receiver<StoreEvent>,
}

impl<T> fmt::Debug for OptionsView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsView")
            .field("config", &self.state.borrow().config)
            .finish()
    }
}

impl<T> OptionsView<T> {
    pub fn current(&self) -> SliderConfig {
        self.state.borrow().config
    }

    /// Wait for the next change touching any of `fields`. After falling
    /// behind the feed, the current config is reported as a change of all
    /// requested fields. Returns `None` once the store is dropped.
    pub async fn changed(
        &mut self,
        fields: ConfigFields,
    ) -> Option<ConfigChange> {
        loop {
            match self.events.recv().await {
                Ok(StoreEvent::Config(change)) if change.touches(fields) => {
                    return Some(change);
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "options view lagged; resynchronising");
                    return Some(ConfigChange {
                        config: self.current(),
                        changed: fields,
                    });
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;

    #[test]
    fn set_config_publishes_single_aggregate_change() {
        let store: ConfigStore<u32> = ConfigStore::default();
        let mut events = store.subscribe();

        let change = store
            .set_config(
                &PartialSliderConfig::default()
                    .direction(Direction::Left)
                    .items_on_display(2),
            )
            .unwrap()
            .unwrap();

        assert_eq!(
            change.changed,
            ConfigFields::DIRECTION | ConfigFields::ITEMS_ON_DISPLAY
        );
        assert_eq!(events.try_recv().unwrap(), StoreEvent::Config(change));
        assert!(events.try_recv().is_err());
        assert_eq!(store.config().items_on_display, 2);
    }

    #[test]
    fn unchanged_config_is_silent() {
        let store: ConfigStore<u32> = ConfigStore::default();
        let mut events = store.subscribe();

        let outcome = store
            .set_config(&PartialSliderConfig::default().cycling(true))
            .unwrap();
        assert!(outcome.is_none());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn invalid_merge_is_rejected_without_side_effects() {
        let store: ConfigStore<u32> = ConfigStore::default();
        let mut events = store.subscribe();

        let err = store
            .set_config(&PartialSliderConfig::default().items_on_display(0))
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroItemsOnDisplay);
        assert_eq!(store.config(), SliderConfig::default());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn set_items_replaces_collection() {
        let store: ConfigStore<&'static str> = ConfigStore::default();
        let mut events = store.subscribe();

        store.set_items(vec!["a", "b"]);
        store.set_items(vec!["c"]);

        assert_eq!(&*store.items(), &["c"]);
        assert_eq!(events.try_recv().unwrap(), StoreEvent::Items { len: 2 });
        assert_eq!(events.try_recv().unwrap(), StoreEvent::Items { len: 1 });
    }

    #[test]
    fn new_rejects_invalid_initial_config() {
        let config = SliderConfig {
            interval_ms: 0,
            ..SliderConfig::default()
        };
        assert!(ConfigStore::<u8>::new(config).is_err());
    }

    #[tokio::test]
    async fn options_view_filters_by_field() {
        let store: ConfigStore<u32> = ConfigStore::default();
        let mut view = store.options_view();

        store
            .set_config(&PartialSliderConfig::default().interval_ms(750))
            .unwrap();
        store
            .set_config(
                &PartialSliderConfig::default().direction(Direction::Left),
            )
            .unwrap();

        let change = view.changed(ConfigFields::DIRECTION).await.unwrap();
        assert_eq!(change.config.direction, Direction::Left);
        assert_eq!(change.config.interval_ms, 750);
        assert_eq!(view.current().direction, Direction::Left);
    }

    #[tokio::test]
    async fn lagging_options_view_resyncs_from_current_config() {
        let store: ConfigStore<u32> =
            ConfigStore::with_event_capacity(SliderConfig::default(), 1)
                .unwrap();
        let mut view = store.options_view();

        store
            .set_config(&PartialSliderConfig::default().interval_ms(750))
            .unwrap();
        store
            .set_config(
                &PartialSliderConfig::default().direction(Direction::Left),
            )
            .unwrap();

        // The interval change was evicted before the view read it.
        let fields = ConfigFields::INTERVAL | ConfigFields::DIRECTION;
        let change = view.changed(fields).await.unwrap();
        assert_eq!(change.changed, fields);
        assert_eq!(change.config.interval_ms, 750);
        assert_eq!(change.config.direction, Direction::Left);
    }

    #[tokio::test]
    async fn options_view_ends_when_store_drops() {
        let store: ConfigStore<u32> = ConfigStore::default();
        let mut view = store.options_view();
        assert_eq!(store.subscriber_count(), 1);

        drop(store);
        assert!(view.changed(ConfigFields::all()).await.is_none());
    }

    #[test]
    fn zero_event_capacity_is_raised_to_one() {
        let store: ConfigStore<u32> =
            ConfigStore::with_event_capacity(SliderConfig::default(), 0)
                .unwrap();
        let mut events = store.subscribe();
        store.set_items(vec![1, 2]);
        assert_eq!(events.try_recv().unwrap(), StoreEvent::Items { len: 2 });
    }
}
