//! Session runtime: the gesture task and the projection task.
//!
//! DESIGN
//! ======
//! Pointer handling and host-map queries live on separate tasks. The gesture
//! task owns the [`GestureTracker`], consumes [`InputEvent`]s, and republishes
//! the [`Preview`] after every event. The projection task owns the
//! [`Projector`] (and with it every host-map call) plus the caller's
//! [`DrawEndSink`]. The two are joined by a single-slot handoff channel that
//! carries mode activations and finished gestures, processed strictly in
//! order.
//!
//! STALE RESULTS
//! =============
//! Every toolbar selection bumps a generation counter, and the gesture task
//! records the generation of the latest pointer-down. A projection that
//! resolves after a gesture under a newer selection has already started is
//! reported to the sink as [`SketchError::Stale`] instead of being applied,
//! so each finished gesture still produces exactly one emission. Merely
//! picking the next tool does not invalidate a result still in flight.
//!
//! SHUTDOWN
//! ========
//! [`SketchHandle::shutdown`] signals the gesture task, which closes the
//! input queue, drains what is already buffered, and exits. Dropping the
//! gesture task's handoff sender then lets the projection task finish the
//! remaining work and exit. Outstanding [`SketchHandle::events`] senders do
//! not keep the session alive; their sends fail once input is closed.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::SketchConfig;
use crate::error::SketchError;
use crate::geo::{ScaleFactor, ScreenPoint};
use crate::input::{DrawingMode, InputEvent};
use crate::preview::{self, Preview};
use crate::projector::{HostMap, Projector};
use crate::shape::ShapeResult;
use crate::tracker::{Action, FinishedGesture, GestureTracker};

/// Capacity of the gesture → projection handoff.
const HANDOFF_CAPACITY: usize = 1;

/// Outcome of one completed gesture.
#[derive(Debug)]
pub struct Emission {
    /// Generation of the mode selection the gesture was drawn under.
    pub generation: u64,
    pub mode: DrawingMode,
    pub result: Result<ShapeResult, SketchError>,
}

/// Receives one [`Emission`] per completed gesture.
pub trait DrawEndSink: Send + 'static {
    fn on_draw_end(&mut self, emission: Emission);
}

impl<F> DrawEndSink for F
where
    F: FnMut(Emission) + Send + 'static,
{
    fn on_draw_end(&mut self, emission: Emission) {
        self(emission);
    }
}

/// Work handed from the gesture task to the projection task.
#[derive(Debug)]
enum Handoff {
    /// A mode became active; measure its scale factor.
    Activate { generation: u64 },
    /// A gesture completed; project and emit it.
    Finished(FinishedGesture),
}

/// Scale factor tagged with the generation it was measured for.
type ScaleSlot = Option<(u64, ScaleFactor)>;

/// Handle to a running sketch session.
pub struct SketchHandle {
    events: mpsc::Sender<InputEvent>,
    stop: watch::Sender<bool>,
    preview: watch::Receiver<Preview>,
    generation: Arc<AtomicU64>,
    gesture_task: JoinHandle<()>,
    projection_task: JoinHandle<()>,
}

/// Spawn the gesture and projection tasks for one drawing overlay.
#[must_use]
pub fn spawn_sketch<M, S>(map: M, sink: S, config: SketchConfig) -> SketchHandle
where
    M: HostMap + 'static,
    S: DrawEndSink,
{
    let generation = Arc::new(AtomicU64::new(0));
    let (event_tx, event_rx) = mpsc::channel(config.input_queue_capacity.max(1));
    let (handoff_tx, handoff_rx) = mpsc::channel(HANDOFF_CAPACITY);
    let (preview_tx, preview_rx) = watch::channel(Preview::default());
    let (scale_tx, scale_rx) = watch::channel(None);
    let (stop_tx, stop_rx) = watch::channel(false);
    let started = Arc::new(AtomicU64::new(0));

    info!(
        platform = ?config.platform,
        scale_probe_px = config.scale_probe_px,
        input_queue_capacity = config.input_queue_capacity,
        "sketch session starting"
    );

    let projector = Projector::new(map).with_probe_px(config.scale_probe_px);
    let tracker = GestureTracker::with_generation(Arc::clone(&generation));
    let gesture = GestureTask {
        tracker,
        handoff: handoff_tx,
        preview_tx,
        scale_rx,
        started: Arc::clone(&started),
        config,
    };
    let gesture_task = tokio::spawn(gesture.run(event_rx, stop_rx));
    let projection_task = tokio::spawn(run_projection_task(projector, sink, handoff_rx, scale_tx, started));

    SketchHandle { events: event_tx, stop: stop_tx, preview: preview_rx, generation, gesture_task, projection_task }
}

impl SketchHandle {
    /// Queue one input event for the gesture task.
    ///
    /// # Errors
    ///
    /// [`SketchError::ChannelClosed`] once the session has stopped.
    pub async fn send(&self, event: InputEvent) -> Result<(), SketchError> {
        self.events.send(event).await.map_err(|_| SketchError::ChannelClosed)
    }

    /// Toolbar press.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn select_mode(&self, mode: DrawingMode) -> Result<(), SketchError> {
        self.send(InputEvent::SelectMode(mode)).await
    }

    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn pointer_down(&self, p: ScreenPoint) -> Result<(), SketchError> {
        self.send(InputEvent::PointerDown(p)).await
    }

    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn pointer_move(&self, p: ScreenPoint) -> Result<(), SketchError> {
        self.send(InputEvent::PointerMove(p)).await
    }

    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn pointer_up(&self, p: ScreenPoint) -> Result<(), SketchError> {
        self.send(InputEvent::PointerUp(p)).await
    }

    /// A sender for hosts that feed events from a non-async thread
    /// (`try_send` / `blocking_send`). Sends fail once the session has
    /// shut down.
    #[must_use]
    pub fn events(&self) -> mpsc::Sender<InputEvent> {
        self.events.clone()
    }

    /// Subscribe to preview updates.
    #[must_use]
    pub fn preview(&self) -> watch::Receiver<Preview> {
        self.preview.clone()
    }

    /// Generation of the most recent mode selection.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Close input and wait for both tasks to drain. Events already queued
    /// are still processed.
    pub async fn shutdown(self) {
        self.stop.send_replace(true);
        drop(self.events);
        if let Err(e) = self.gesture_task.await {
            error!(error = %e, "gesture task failed");
        }
        if let Err(e) = self.projection_task.await {
            error!(error = %e, "projection task failed");
        }
        debug!("sketch session stopped");
    }
}

/// State owned by the gesture task.
struct GestureTask {
    tracker: GestureTracker,
    handoff: mpsc::Sender<Handoff>,
    preview_tx: watch::Sender<Preview>,
    scale_rx: watch::Receiver<ScaleSlot>,
    /// Generation of the most recent pointer-down.
    started: Arc<AtomicU64>,
    config: SketchConfig,
}

impl GestureTask {
    async fn run(mut self, mut events: mpsc::Receiver<InputEvent>, mut stop: watch::Receiver<bool>) {
        let mut closing = false;
        loop {
            tokio::select! {
                biased;
                event = events.recv() => {
                    let Some(event) = event else { break };
                    if !self.apply(event).await {
                        return;
                    }
                }
                // Also fires when the handle is dropped without `shutdown`.
                stopped = stop.changed(), if !closing => {
                    debug!(handle_dropped = stopped.is_err(), "closing input queue");
                    events.close();
                    closing = true;
                }
            }
        }
        debug!("input closed; gesture task stopping");
    }

    /// Feed one event through the tracker. Returns `false` once the
    /// projection task is gone.
    async fn apply(&mut self, event: InputEvent) -> bool {
        for action in self.tracker.handle(event) {
            let item = match action {
                Action::ModeActivated { generation, .. } => Handoff::Activate { generation },
                Action::Finished(gesture) => Handoff::Finished(gesture),
                Action::GestureStarted { generation } => {
                    self.started.store(generation, Ordering::SeqCst);
                    continue;
                }
                Action::ModeCleared { .. } | Action::RenderNeeded => continue,
            };
            debug!(?item, "handing off to projection task");
            if self.handoff.send(item).await.is_err() {
                warn!("projection task gone; stopping gesture task");
                return false;
            }
        }

        let generation = self.tracker.generation();
        let scale = match *self.scale_rx.borrow() {
            Some((measured_for, scale)) if measured_for == generation => Some(scale),
            _ => None,
        };
        self.preview_tx.send_replace(preview::render(self.tracker.state(), generation, scale, &self.config));
        true
    }
}

async fn run_projection_task<M, S>(
    mut projector: Projector<M>,
    mut sink: S,
    mut handoff: mpsc::Receiver<Handoff>,
    scale_tx: watch::Sender<ScaleSlot>,
    started: Arc<AtomicU64>,
) where
    M: HostMap,
    S: DrawEndSink,
{
    while let Some(item) = handoff.recv().await {
        match item {
            Handoff::Activate { generation } => match projector.compute_scale_factor().await {
                Ok(scale) => {
                    debug!(generation, km_per_100px = scale.km_per_100px(), "scale factor ready");
                    scale_tx.send_replace(Some((generation, scale)));
                }
                Err(e) => {
                    warn!(generation, error = %e, "scale factor unavailable");
                    scale_tx.send_replace(None);
                }
            },
            Handoff::Finished(gesture) => {
                let emission = project_finished(&projector, &gesture, &started).await;
                sink.on_draw_end(emission);
            }
        }
    }
    debug!("handoff closed; projection task stopping");
}

async fn project_finished<M: HostMap>(
    projector: &Projector<M>,
    gesture: &FinishedGesture,
    started: &AtomicU64,
) -> Emission {
    let generation = gesture.generation;
    let mode = gesture.mode();
    let projected = projector.project_gesture(gesture).await;

    // The user may have started drawing under a newer selection while the
    // host map was resolving.
    let current = started.load(Ordering::SeqCst);
    let result = if current > generation { Err(SketchError::Stale { generation, current }) } else { projected };

    match &result {
        Ok(shape) => info!(?mode, generation, degenerate = shape.is_degenerate(), "shape emitted"),
        Err(e) => warn!(?mode, generation, code = e.error_code(), error = %e, "shape emission failed"),
    }
    Emission { generation, mode, result }
}
