//! batching/batcher.rs
//! Executes a [`GroupPlan`] into `$snapshot_items` batches.
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::batching::policy::{GroupPlan, MeasuredItems};
use crate::batching::split::split_to_budget;
use crate::batching::types::{BatchError, BatchPolicy, SnapshotItemsBatch};
use crate::config::{ConfigError, ReplayConfig};
use crate::constants::{props, DEFAULT_LIB};
use crate::event::{CaptureEvent, SnapshotType, WindowKey};
use crate::telemetry::BatchCounters;
use crate::utils::truncate_with_ellipsis;

/// Group-level fields stamped onto every batch of the group.
struct BatchTemplate {
    distinct_id: Value,
    session_id: String,
    window_id: String,
    snapshot_source: String,
    lib: String,
    extra: Map<String, Value>,
}

impl BatchTemplate {
    fn new(key: &WindowKey, first: &CaptureEvent, config: &ReplayConfig) -> Self {
        let lib = first.prop_str(props::LIB).unwrap_or(DEFAULT_LIB);
        Self {
            distinct_id: first.distinct_id().cloned().unwrap_or(Value::Null),
            session_id: key.session_id.clone(),
            window_id: key.window_id_or_session().to_string(),
            snapshot_source: first
                .prop_str(props::SNAPSHOT_SOURCE)
                .unwrap_or(&config.default_snapshot_source)
                .to_string(),
            lib: truncate_with_ellipsis(lib, config.lib_max_len),
            extra: first.extra.clone(),
        }
    }

    fn stamp(&self, snapshot_items: Vec<Value>, policy: BatchPolicy) -> SnapshotItemsBatch {
        SnapshotItemsBatch {
            distinct_id: self.distinct_id.clone(),
            session_id: self.session_id.clone(),
            window_id: self.window_id.clone(),
            snapshot_items,
            snapshot_source: self.snapshot_source.clone(),
            lib: self.lib.clone(),
            policy,
            extra: self.extra.clone(),
        }
    }
}

/// Collects batches for one group and keeps the counters in step.
struct Emitter<'a> {
    template: BatchTemplate,
    budget: usize,
    counters: &'a mut BatchCounters,
    out: Vec<SnapshotItemsBatch>,
}

impl Emitter<'_> {
    fn emit(&mut self, items: Vec<Value>, policy: BatchPolicy) {
        if items.is_empty() {
            return;
        }
        self.counters.add_batch(policy);
        self.out.push(self.template.stamp(items, policy));
    }

    fn emit_checked(&mut self, items: Vec<Value>, over_budget: bool, policy: BatchPolicy) {
        if over_budget && !items.is_empty() {
            self.counters.oversized_batches += 1;
        }
        self.emit(items, policy);
    }
}

pub struct SnapshotBatcher {
    config: ReplayConfig,
}

impl SnapshotBatcher {
    pub fn new(config: ReplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// `size_with_headroom` of the active config.
    pub fn budget(&self) -> usize {
        self.config.size_with_headroom()
    }

    /// Pack every group independently; groups keep their first-seen order.
    pub fn batch(
        &self,
        groups: IndexMap<WindowKey, Vec<CaptureEvent>>,
    ) -> Result<(Vec<SnapshotItemsBatch>, BatchCounters), BatchError> {
        let mut counters = BatchCounters::default();
        let mut out = Vec::new();
        for (key, events) in groups {
            out.extend(self.batch_group(&key, events, &mut counters)?);
        }
        Ok((out, counters))
    }

    /// Pack one `(session, window)` group.
    pub fn batch_group(
        &self,
        key: &WindowKey,
        events: Vec<CaptureEvent>,
        counters: &mut BatchCounters,
    ) -> Result<Vec<SnapshotItemsBatch>, BatchError> {
        let Some(first) = events.first() else {
            return Ok(Vec::new());
        };

        let template = BatchTemplate::new(key, first, &self.config);
        counters.groups += 1;
        counters.events_in += events.len() as u64;

        let budget = self.budget();
        let plan = GroupPlan::build(events, budget)?;

        tracing::debug!(
            session_id = %key.session_id,
            window_id = ?key.window_id,
            policy = ?plan.policy(),
            budget,
            "packing snapshot group"
        );

        let mut emitter = Emitter { template, budget, counters, out: Vec::new() };

        match plan {
            GroupPlan::SizeHinted(sized) => self.pack_hinted(sized, &mut emitter),
            GroupPlan::SingleBatch(items) => {
                emitter.counters.items_in += items.len() as u64;
                emitter.emit(items, BatchPolicy::SingleBatch);
            }
            GroupPlan::FullSnapshotIsolation(measured) => self.pack_isolated(measured, &mut emitter),
            GroupPlan::RecursiveSplit(measured) => {
                emitter.counters.items_in += measured.len() as u64;
                self.pack_split(measured, &mut emitter);
            }
        }

        Ok(emitter.out)
    }

    /// Sum reported sizes; close the batch when the next event would overflow.
    /// Sums saturate, so an absurd hint closes its batch instead of wrapping.
    fn pack_hinted(&self, sized: Vec<(Vec<Value>, usize)>, emitter: &mut Emitter<'_>) {
        let mut current: Vec<Value> = Vec::new();
        let mut current_size = 0usize;
        let mut started = false;

        for (payloads, hint) in sized {
            emitter.counters.items_in += payloads.len() as u64;
            if started && current_size.saturating_add(hint) > emitter.budget {
                let over = current_size >= emitter.budget;
                emitter.emit_checked(std::mem::take(&mut current), over, BatchPolicy::SizeHinted);
                current_size = 0;
            }
            current.extend(payloads);
            current_size = current_size.saturating_add(hint);
            started = true;
        }

        if started {
            let over = current_size >= emitter.budget;
            emitter.emit_checked(current, over, BatchPolicy::SizeHinted);
        }
    }

    /// Full snapshots alone; the items between them packed as runs.
    ///
    /// Each run is measured on its own, so a group whose other items would fit
    /// together yields one batch per run instead of one for all of them.
    fn pack_isolated(&self, measured: MeasuredItems, emitter: &mut Emitter<'_>) {
        emitter.counters.items_in += measured.len() as u64;

        let mut run = MeasuredItems::default();
        for (item, size) in measured.items.into_iter().zip(measured.sizes) {
            if SnapshotType::is_full_snapshot(&item) {
                self.pack_run(std::mem::take(&mut run), emitter);
                let over = size + 2 >= emitter.budget;
                emitter.emit_checked(vec![item], over, BatchPolicy::FullSnapshotIsolation);
            } else {
                run.push(item, size);
            }
        }
        self.pack_run(run, emitter);
    }

    fn pack_run(&self, run: MeasuredItems, emitter: &mut Emitter<'_>) {
        if run.is_empty() {
            return;
        }
        if run.total_size() < emitter.budget {
            emitter.emit(run.items, BatchPolicy::FullSnapshotIsolation);
        } else {
            self.pack_split(run, emitter);
        }
    }

    fn pack_split(&self, measured: MeasuredItems, emitter: &mut Emitter<'_>) {
        let outcome = split_to_budget(measured, emitter.budget, self.config.max_split_rounds);
        emitter.counters.split_rounds += outcome.rounds as u64;
        emitter.counters.oversized_batches += outcome.oversized as u64;
        for part in outcome.parts {
            emitter.emit(part, BatchPolicy::RecursiveSplit);
        }
    }
}
