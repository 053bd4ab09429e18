use super::options::EngineOptions;
use crate::bounds::MapBounds;
use crate::detect::ChangeDetector;
use crate::error::VisionError;
use crate::fog::FogPlan;
use crate::polygon::Region;
use crate::scene::{ItemId, Observer, SceneEvent, SceneStore, SceneView};
use crate::shadow::{cast, clip_to_range, compose, shape_masks, ObstructionSegment, ShadowCache, ShapeMasks};
use crate::timing::{PerformanceReport, Stopwatch};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Why an evaluation did not recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The store reported the scene as not ready.
    NotReady,
    /// The scene has no usable map image.
    NoMap,
    /// Nothing the pass depends on changed.
    Unchanged,
}

/// Result of [`VisionSession::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// Regions were recomputed and fog written.
    Completed(PerformanceReport),
    /// Vision is off or there are no observers; all fog was removed.
    Cleared,
    Skipped(SkipReason),
    /// Another pass was in flight. The request is not queued.
    Dropped,
}

#[derive(Debug, Default)]
struct SessionState {
    detector: ChangeDetector,
    cache: ShadowCache,
}

/// State carried between visibility passes of one scene.
///
/// At most one pass runs at a time; see [`VisionSession::evaluate`].
#[derive(Debug, Default)]
pub struct VisionSession {
    options: EngineOptions,
    state: Mutex<SessionState>,
}

impl VisionSession {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Runs one visibility pass against `store`.
    ///
    /// Returns [`PassOutcome::Dropped`] without touching the store if a pass
    /// is already running. `force` recomputes even when the scene is
    /// unchanged. On error nothing has been written for the failed step and
    /// the next evaluation recomputes from scratch.
    #[instrument(skip(self, store), level = "debug")]
    pub async fn evaluate<S>(&self, store: &S, force: bool) -> Result<PassOutcome, VisionError>
    where
        S: SceneStore + ?Sized,
    {
        let Ok(mut state) = self.state.try_lock() else {
            debug!("pass in flight, dropping evaluation");
            return Ok(PassOutcome::Dropped);
        };

        let result = self.run(&mut state, store, force).await;
        settle(&mut state, result)
    }

    /// Removes all fog, empties the cache and recomputes.
    ///
    /// Unlike [`VisionSession::evaluate`] this waits for a running pass to
    /// finish instead of being dropped.
    pub async fn reset<S>(&self, store: &S) -> Result<PassOutcome, VisionError>
    where
        S: SceneStore + ?Sized,
    {
        let mut state = self.state.lock().await;
        info!("resetting fog");

        state.cache.invalidate_all(|_, _| {});
        state.detector.forget();

        let result = self.wipe_and_run(&mut state, store).await;
        settle(&mut state, result)
    }

    /// Reacts to a host notification.
    ///
    /// A scene going unready only drops cached regions; the store is not
    /// queried until it reports ready again.
    pub async fn handle_event<S>(&self, store: &S, event: &SceneEvent) -> Result<PassOutcome, VisionError>
    where
        S: SceneStore + ?Sized,
    {
        debug!(?event, "scene event");
        match event {
            SceneEvent::ResetRequested => self.reset(store).await,
            SceneEvent::ReadyChanged(false) => {
                let mut state = self.state.lock().await;
                state
                    .cache
                    .invalidate_all(|id, _| trace!(observer = %id, "dropping cached region"));
                Ok(PassOutcome::Skipped(SkipReason::NotReady))
            }
            _ => self.evaluate(store, false).await,
        }
    }

    async fn wipe_and_run<S>(&self, state: &mut SessionState, store: &S) -> Result<PassOutcome, VisionError>
    where
        S: SceneStore + ?Sized,
    {
        if store.is_ready().await? {
            let snapshot = store.snapshot().await?;
            let view = SceneView::from_snapshot(&snapshot, self.options.epsilon)?;
            FogPlan::clear(&view).apply(store).await?;
        }
        self.run(state, store, true).await
    }

    async fn run<S>(&self, state: &mut SessionState, store: &S, force: bool) -> Result<PassOutcome, VisionError>
    where
        S: SceneStore + ?Sized,
    {
        let mut communication = Stopwatch::started();
        let mut compute = Stopwatch::new();

        if !store.is_ready().await? {
            state.cache.invalidate_all(|_, _| {});
            return Ok(PassOutcome::Skipped(SkipReason::NotReady));
        }
        let snapshot = store.snapshot().await?;

        communication.pause();
        compute.resume();

        let view = SceneView::from_snapshot(&snapshot, self.options.epsilon)?;
        let Some(bounds) = view.bounds else {
            debug!("no map image, skipping");
            return Ok(PassOutcome::Skipped(SkipReason::NoMap));
        };

        let decision = state.detector.evaluate(&view.keys, force);
        if !decision.should_recompute {
            return Ok(PassOutcome::Skipped(SkipReason::Unchanged));
        }
        if decision.invalidate_cache {
            state
                .cache
                .invalidate_all(|id, _| trace!(observer = %id, "dropping cached region"));
        }

        if !view.settings.vision_enabled || view.observers.is_empty() {
            debug!(
                vision_enabled = view.settings.vision_enabled,
                observers = view.observers.len(),
                "clearing fog"
            );
            let plan = FogPlan::clear(&view);
            if !plan.is_noop() {
                plan.apply(store).await?;
            }
            return Ok(PassOutcome::Cleared);
        }

        let (hits, misses): (Vec<&Observer>, Vec<&Observer>) = view
            .observers
            .iter()
            .partition(|o| state.cache.lookup(&o.id, o.position).is_some());

        let segments: Vec<&ObstructionSegment> = view.segments().collect();
        let masks = shape_masks(&view.obstructions);
        let computed = self.visible_regions(&misses, &bounds, &segments, &masks)?;

        for (observer, region) in misses.iter().zip(computed) {
            state.cache.put(observer.id.clone(), region, observer.position);
        }
        let pruned = state.cache.prune(view.observers.iter().map(|o| &o.id));
        if pruned > 0 {
            trace!(pruned, "pruned cache entries of removed observers");
        }

        let regions: Vec<(ItemId, Region)> = view
            .observers
            .iter()
            .filter_map(|o| {
                let region = state.cache.lookup(&o.id, o.position)?.clone();
                Some((
                    o.id.clone(),
                    clip_to_range(region, o, &view.grid, self.options.circle_segments),
                ))
            })
            .collect();

        let plan = FogPlan::synthesize(&view, &bounds, &regions, self.options.digest_precision);

        compute.pause();
        communication.resume();
        plan.apply(store).await?;

        let report = PerformanceReport {
            compute_time: compute.stop(),
            communication_time: communication.stop(),
            cache_hits: hits.len(),
            cache_misses: misses.len(),
        };
        info!(%report, "visibility pass complete");
        Ok(PassOutcome::Completed(report))
    }

    #[cfg(not(feature = "parallel"))]
    fn visible_regions(
        &self,
        observers: &[&Observer],
        bounds: &MapBounds,
        segments: &[&ObstructionSegment],
        masks: &ShapeMasks,
    ) -> Result<Vec<Region>, VisionError> {
        observers
            .iter()
            .map(|o| visible_region(o, bounds, segments, masks, self.options.epsilon))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn visible_regions(
        &self,
        observers: &[&Observer],
        bounds: &MapBounds,
        segments: &[&ObstructionSegment],
        masks: &ShapeMasks,
    ) -> Result<Vec<Region>, VisionError> {
        observers
            .par_iter()
            .map(|o| visible_region(o, bounds, segments, masks, self.options.epsilon))
            .collect()
    }
}

fn visible_region(
    observer: &Observer,
    bounds: &MapBounds,
    segments: &[&ObstructionSegment],
    masks: &ShapeMasks,
    eps: f64,
) -> Result<Region, VisionError> {
    let shadows: Vec<_> = segments
        .iter()
        .filter_map(|s| cast(observer.position, s, bounds, eps))
        .collect();
    compose(&observer.id, bounds, &shadows, masks)
}

fn settle(state: &mut SessionState, result: Result<PassOutcome, VisionError>) -> Result<PassOutcome, VisionError> {
    if let Err(err) = &result {
        error!(%err, "visibility pass failed");
        state.detector.forget();
    }
    result
}
