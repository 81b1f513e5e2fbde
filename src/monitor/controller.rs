use std::{sync::Arc, time::Duration};

use chrono::{Local, Utc};
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    models::{IntervalSelector, MonitoringState, Reading},
    persistence::MonitoringStore,
    sensing::ReadingSource,
    storage::KeyValueStore,
};

use super::{
    params::MonitorParams,
    state::{MonitorState, MonitorStatus},
    views::{self, ChartSeries, LogEntryView, Metric, Summary},
};

// Set to false to silence per-tick logging
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MonitorEvent {
    Started {
        interval: IntervalSelector,
        period_ms: u64,
    },
    ReadingRecorded {
        reading: Reading,
        below_threshold: bool,
    },
    Stopped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub state: MonitorState,
    pub summary: Summary,
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl Ticker {
    /// Stops the loop between ticks and waits for it to exit, so a tick
    /// that already fired always completes.
    async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.handle.await {
            log_error!("monitor ticker failed to join: {err}");
        }
    }
}

/// Everything a tick needs; shared between the controller and its ticker.
struct Shared<S> {
    state: Mutex<MonitorState>,
    store: MonitoringStore<S>,
    source: Arc<dyn ReadingSource>,
    events: broadcast::Sender<MonitorEvent>,
    persist_on_tick: bool,
}

impl<S: KeyValueStore> Shared<S> {
    async fn tick(&self) {
        let reading = Reading::stamp(self.source.sample(), Local::now());
        self.record(reading).await;
    }

    async fn record(&self, reading: Reading) {
        let (below_threshold, to_persist) = {
            let mut guard = self.state.lock().await;
            let below = guard.record(reading.clone());
            log_debug!(
                "reading #{}: moisture={} temperature={} humidity={}",
                guard.ticks,
                reading.moisture,
                reading.temperature,
                reading.humidity
            );
            (below, self.persist_on_tick.then(|| guard.data.clone()))
        };

        let _ = self.events.send(MonitorEvent::ReadingRecorded {
            reading,
            below_threshold,
        });

        if let Some(data) = to_persist {
            self.store.save(&data).await;
        }
    }
}

/// Drives the monitoring screen: one periodic ticker at a time generating
/// readings into the in-memory aggregate, with persistence on mount,
/// unmount and explicit request.
#[derive(Clone)]
pub struct MonitorController<S> {
    shared: Arc<Shared<S>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
}

impl<S: KeyValueStore> MonitorController<S> {
    pub fn new(store: MonitoringStore<S>, source: Arc<dyn ReadingSource>) -> Self {
        Self::with_options(store, source, false)
    }

    /// `persist_on_tick` saves the full aggregate after every generated
    /// reading in addition to the mount/unmount saves.
    pub fn with_options(
        store: MonitoringStore<S>,
        source: Arc<dyn ReadingSource>,
        persist_on_tick: bool,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(MonitorState::new()),
                store,
                source,
                events,
                persist_on_tick,
            }),
            ticker: Arc::new(Mutex::new(None)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.shared.events.subscribe()
    }

    pub fn store(&self) -> &MonitoringStore<S> {
        &self.shared.store
    }

    /// Screen entry: hydrate from storage once, then start ticking.
    pub async fn mount(&self, params: MonitorParams) -> MonitorSnapshot {
        let stored = self.shared.store.load().await;
        {
            let mut state = self.shared.state.lock().await;
            state.threshold = params.threshold;
            match stored {
                Some(data) => {
                    log_info!("hydrated monitoring state with {} log entries", data.logs.len());
                    state.hydrate(data);
                }
                None => log_info!("no stored monitoring data; starting fresh"),
            }
        }

        self.start(params.interval).await;
        self.get_snapshot().await
    }

    /// Screen exit: stop ticking and save the working aggregate.
    pub async fn unmount(&self) {
        self.stop().await;
        self.persist().await;
    }

    /// Start ticking at `interval`, replacing any live ticker.
    pub async fn start(&self, interval: IntervalSelector) {
        let period = interval.period();
        self.spawn_ticker(period).await;

        {
            let mut state = self.shared.state.lock().await;
            state.begin(interval, Utc::now());
        }

        log_info!("monitor started: {} ({:?})", interval.label(), period);
        let _ = self.shared.events.send(MonitorEvent::Started {
            interval,
            period_ms: period.as_millis() as u64,
        });
    }

    pub async fn change_interval(&self, interval: IntervalSelector) {
        self.start(interval).await;
    }

    /// No tick runs after this returns.
    pub async fn stop(&self) {
        let was_running = self.cancel_ticker().await;

        self.shared.state.lock().await.stop();

        if was_running {
            log_info!("monitor stopped");
            let _ = self.shared.events.send(MonitorEvent::Stopped);
        }
    }

    pub async fn persist(&self) {
        let data = self.get_data().await;
        self.shared.store.save(&data).await;
    }

    /// Run one tick body now, outside the timer.
    pub async fn tick_now(&self) {
        self.shared.tick().await;
    }

    pub async fn record(&self, reading: Reading) {
        self.shared.record(reading).await;
    }

    pub async fn set_threshold(&self, threshold: f64) {
        self.shared.state.lock().await.threshold = threshold;
    }

    pub async fn status(&self) -> MonitorStatus {
        self.shared.state.lock().await.status
    }

    pub async fn get_data(&self) -> MonitoringState {
        self.shared.state.lock().await.data.clone()
    }

    pub async fn get_snapshot(&self) -> MonitorSnapshot {
        let state = self.shared.state.lock().await.clone();
        MonitorSnapshot {
            summary: views::summary(&state.data),
            state,
        }
    }

    pub async fn log_view(&self) -> Vec<LogEntryView> {
        let state = self.shared.state.lock().await;
        views::log_view(&state.data.logs, state.threshold)
    }

    pub async fn chart(&self, metric: Metric) -> ChartSeries {
        let state = self.shared.state.lock().await;
        views::chart_series(&state.data.logs, metric)
    }

    async fn spawn_ticker(&self, period: Duration) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.shutdown().await;
        }

        let shared = self.shared.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        // First reading one full period after start, not immediately.
        let first_tick = Instant::now() + period;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => shared.tick().await,
                }
            }
        });

        *ticker_guard = Some(Ticker { handle, cancel });
    }

    async fn cancel_ticker(&self) -> bool {
        let ticker = self.ticker.lock().await.take();
        match ticker {
            Some(ticker) => {
                ticker.shutdown().await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Sample, LOG_CAPACITY},
        storage::MemoryStore,
    };
    use std::{collections::VecDeque, sync::Mutex as StdMutex};

    /// Replays fixed samples, then repeats the last one.
    struct ScriptedSource {
        samples: StdMutex<VecDeque<Sample>>,
        last: StdMutex<Sample>,
    }

    impl ScriptedSource {
        fn new(samples: &[Sample]) -> Arc<Self> {
            Arc::new(Self {
                samples: StdMutex::new(samples.iter().copied().collect()),
                last: StdMutex::new(Sample::new(30.0, 20.0, 50.0)),
            })
        }
    }

    impl ReadingSource for ScriptedSource {
        fn sample(&self) -> Sample {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.samples.lock().unwrap().pop_front() {
                *last = next;
            }
            *last
        }
    }

    fn controller(backend: &MemoryStore, samples: &[Sample]) -> MonitorController<MemoryStore> {
        MonitorController::new(MonitoringStore::new(backend.clone()), ScriptedSource::new(samples))
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance_ms(ms: u64) {
        time::advance(Duration::from_millis(ms)).await;
        settle().await;
    }

    async fn log_len(controller: &MonitorController<MemoryStore>) -> usize {
        controller.get_data().await.logs.len()
    }

    #[tokio::test(start_paused = true)]
    async fn ten_second_interval_fires_every_ten_seconds() {
        let backend = MemoryStore::new();
        let controller = controller(&backend, &[]);

        controller.start(IntervalSelector::TenSeconds).await;

        advance_ms(9_900).await;
        assert_eq!(log_len(&controller).await, 0);

        advance_ms(200).await;
        assert_eq!(log_len(&controller).await, 1);

        // Late ticks push the schedule back, so check a little past 20.1s.
        advance_ms(10_050).await;
        assert_eq!(log_len(&controller).await, 2);

        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn changing_interval_replaces_the_previous_timer() {
        let backend = MemoryStore::new();
        let controller = controller(&backend, &[]);

        controller.start(IntervalSelector::TenSeconds).await;
        advance_ms(10_100).await;
        assert_eq!(log_len(&controller).await, 1);

        // t = 10.1s; the new timer first fires at 70.1s.
        controller.change_interval(IntervalSelector::OneMinute).await;

        advance_ms(10_000).await;
        assert_eq!(log_len(&controller).await, 1, "old 10s timer still firing");

        advance_ms(49_800).await;
        assert_eq!(log_len(&controller).await, 1);

        advance_ms(300).await;
        assert_eq!(log_len(&controller).await, 2);
        assert_eq!(
            controller.get_data().await.interval,
            Some(IntervalSelector::OneMinute)
        );

        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_stop() {
        let backend = MemoryStore::new();
        let controller = controller(&backend, &[]);
        let mut events = controller.subscribe();

        controller.start(IntervalSelector::TenSeconds).await;
        advance_ms(10_100).await;
        controller.stop().await;
        assert_eq!(controller.status().await, MonitorStatus::Stopped);

        advance_ms(10 * 60 * 1_000).await;
        assert_eq!(log_len(&controller).await, 1);

        assert!(matches!(events.try_recv(), Ok(MonitorEvent::Started { .. })));
        assert!(matches!(
            events.try_recv(),
            Ok(MonitorEvent::ReadingRecorded { .. })
        ));
        assert!(matches!(events.try_recv(), Ok(MonitorEvent::Stopped)));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn ticks_update_current_values_and_cap_the_log() {
        let backend = MemoryStore::new();
        let controller = controller(&backend, &[Sample::new(12.0, 22.0, 40.0)]);

        for _ in 0..LOG_CAPACITY + 5 {
            controller.tick_now().await;
        }

        let data = controller.get_data().await;
        assert_eq!(data.logs.len(), LOG_CAPACITY);
        assert_eq!(data.current(), data.logs.latest().unwrap().sample());
        assert!(data.logs.iter().all(|reading| reading.moisture == 12.0));
    }

    #[tokio::test]
    async fn threshold_flags_generated_readings() {
        let backend = MemoryStore::new();
        let controller = controller(
            &backend,
            &[Sample::new(3.0, 20.0, 40.0), Sample::new(10.0, 20.0, 40.0)],
        );
        let mut events = controller.subscribe();
        controller.set_threshold(5.0).await;

        controller.tick_now().await;
        controller.tick_now().await;

        let flags: Vec<_> = controller
            .log_view()
            .await
            .iter()
            .map(|row| (row.reading.moisture, row.below_threshold))
            .collect();
        assert_eq!(flags, vec![(10.0, false), (3.0, true)]);

        match events.try_recv() {
            Ok(MonitorEvent::ReadingRecorded {
                reading,
                below_threshold,
            }) => {
                assert_eq!(reading.moisture, 3.0);
                assert!(below_threshold);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn mount_hydrates_and_unmount_persists() {
        let backend = MemoryStore::new();
        let store = MonitoringStore::new(backend.clone());
        let mut saved = MonitoringState::default();
        saved.record(Reading::stamp(Sample::new(44.0, 25.0, 60.0), Utc::now()));
        store.save(&saved).await;

        let controller = controller(&backend, &[Sample::new(11.0, 16.0, 31.0)]);
        let snapshot = controller
            .mount(MonitorParams::new(IntervalSelector::TenSeconds, 5.0))
            .await;
        assert_eq!(snapshot.state.status, MonitorStatus::Running);
        assert_eq!(snapshot.state.data.current_moisture, 44.0);
        assert_eq!(snapshot.summary.moisture, "44.0%");

        advance_ms(10_100).await;
        controller.unmount().await;

        let stored = store.load().await.unwrap();
        assert_eq!(stored.logs.len(), 2);
        assert_eq!(stored.current_moisture, 11.0);
        assert_eq!(stored.interval, Some(IntervalSelector::TenSeconds));
    }

    #[tokio::test]
    async fn ticks_do_not_persist_by_default() {
        let backend = MemoryStore::new();
        let controller = controller(&backend, &[]);

        controller.tick_now().await;

        assert_eq!(controller.store().load().await, None);
    }

    #[tokio::test]
    async fn persist_on_tick_saves_each_reading() {
        let backend = MemoryStore::new();
        let controller = MonitorController::with_options(
            MonitoringStore::new(backend.clone()),
            ScriptedSource::new(&[Sample::new(15.0, 18.0, 35.0)]),
            true,
        );

        controller.tick_now().await;
        controller.tick_now().await;

        let stored = controller.store().load().await.unwrap();
        assert_eq!(stored.logs.len(), 2);
        assert_eq!(stored, controller.get_data().await);
    }

    #[tokio::test]
    async fn chart_reflects_recent_ticks() {
        let backend = MemoryStore::new();
        let controller = controller(
            &backend,
            &[
                Sample::new(10.0, 15.0, 30.0),
                Sample::new(20.0, 16.0, 31.0),
                Sample::new(30.0, 17.0, 32.0),
            ],
        );
        for _ in 0..3 {
            controller.tick_now().await;
        }

        let series = controller.chart(Metric::Temperature).await;
        assert_eq!(series.data, vec![15.0, 16.0, 17.0]);
        assert_eq!(series.labels, vec!["T-5", "T-4", "T-3"]);
    }
}
