//! Decision model implementation.
//!
//! The model owns every persisted field and is the only thing that mutates
//! them. Each effective operation ends with one batched write of all fields
//! to the preference store and returns an [`Event`]; no-ops return `None`.
//!
//! ## State Transitions
//!
//! ```text
//! ReadyToSpin -(spin)-> DecisionMade -(confirm)-> Completed -(redo)-> ReadyToSpin
//! ```
//!
//! The daily rules run on load and on resume. A spin first drops a decision
//! left over from a previous calendar day.
//!
//! ## Usage
//!
//! ```ignore
//! let mut model = DecisionModel::load(SqliteStore::open()?)?;
//! model.spin_decision()?;   // Some(Event::DecisionMade { .. })
//! model.confirm_decision()?; // +10 points, streak bookkeeping
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::{debug, info};

use super::level::{level_of, Level};
use super::snapshot::DecisionSnapshot;
use super::state::DailyState;
use super::streak::{is_streak_broken, streak_after_confirm};
use super::{default_items, POINTS_PER_CONFIRM};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::PreferenceStore;

/// The daily decision roulette.
pub struct DecisionModel<S, C = SystemClock> {
    store: S,
    clock: C,
    rng: Pcg64,
    data: DecisionSnapshot,
}

impl<S: PreferenceStore> DecisionModel<S, SystemClock> {
    /// Load from `store` with the machine clock and the built-in default items.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn load(store: S) -> Result<Self> {
        Self::load_with(store, SystemClock::new(), default_items())
    }
}

impl<S: PreferenceStore, C: Clock> DecisionModel<S, C> {
    /// Load every field from `store`, then apply and persist the daily rules.
    ///
    /// `default_items` seeds the list only when the store has never saved one.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn load_with(store: S, clock: C, default_items: Vec<String>) -> Result<Self> {
        let data = DecisionSnapshot::load(&store, default_items)?;
        let mut model = Self {
            store,
            clock,
            rng: Pcg64::from_entropy(),
            data,
        };
        model.reset_daily_state_if_stale()?;
        Ok(model)
    }

    /// Replace the random source with a deterministic one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg64::seed_from_u64(seed);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn items(&self) -> &[String] {
        &self.data.items
    }

    pub fn points(&self) -> u32 {
        self.data.points
    }

    pub fn streak_count(&self) -> u32 {
        self.data.streak_count
    }

    pub fn daily_state(&self) -> DailyState {
        self.data.daily_state
    }

    pub fn decided_item(&self) -> Option<&str> {
        self.data.decided_item.as_deref()
    }

    pub fn snapshot(&self) -> &DecisionSnapshot {
        &self.data
    }

    /// Level derived from the current points.
    pub fn level(&self) -> Level {
        level_of(self.data.points)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Build a full state snapshot event.
    pub fn state_snapshot(&self) -> Event {
        let level = self.level();
        Event::StateSnapshot {
            state: self.data.daily_state,
            decided_item: self.data.decided_item.clone(),
            items: self.data.items.clone(),
            points: self.data.points,
            streak_count: self.data.streak_count,
            level: level.level,
            level_title: level.title.to_string(),
            level_progress: level.progress,
            next_level_points: level.next_level_points,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pick today's item uniformly at random.
    ///
    /// No-op when the list is empty or a decision for today is already held.
    pub fn spin_decision(&mut self) -> Result<Option<Event>> {
        let rules_changed = self.decision_is_stale() && self.apply_daily_rules().is_some();

        if self.data.daily_state != DailyState::ReadyToSpin {
            debug!(state = %self.data.daily_state, "spin ignored, decision already held");
            return self.finish_noop(rules_changed);
        }

        let Some(item) = self.data.items.choose(&mut self.rng).cloned() else {
            debug!("spin ignored, no items");
            return self.finish_noop(rules_changed);
        };

        let at = self.clock.now();
        self.data.decided_item = Some(item.clone());
        self.data.last_decision_at = Some(at);
        self.data.daily_state = DailyState::DecisionMade;
        self.persist()?;

        debug!(%item, "decision made");
        Ok(Some(Event::DecisionMade { item, at }))
    }

    /// Mark today's decision as carried out: award points and update the streak.
    ///
    /// Confirming an already completed decision awards points again and leaves
    /// the streak as it is. No-op when no decision is held.
    pub fn confirm_decision(&mut self) -> Result<Option<Event>> {
        if self.data.decided_item.is_none() {
            debug!(state = %self.data.daily_state, "confirm ignored, no decision held");
            return Ok(None);
        }

        let at = self.clock.now();
        let level_before = self.level().level;

        self.data.points = self.data.points.saturating_add(POINTS_PER_CONFIRM);
        self.data.streak_count =
            streak_after_confirm(self.data.streak_count, self.data.last_success_at, &self.clock);
        self.data.last_success_at = Some(at);
        self.data.daily_state = DailyState::Completed;
        self.persist()?;

        let level_after = self.level().level;
        let level_up = (level_after > level_before).then_some(level_after);
        if let Some(level) = level_up {
            info!(level, points = self.data.points, "level up");
        }

        Ok(Some(Event::DecisionConfirmed {
            item: self.data.decided_item.clone(),
            points_awarded: POINTS_PER_CONFIRM,
            points: self.data.points,
            streak_count: self.data.streak_count,
            level_up,
            at,
        }))
    }

    /// Discard today's completed decision so another spin is possible.
    /// Points and streak are kept.
    pub fn redo_decision(&mut self) -> Result<Option<Event>> {
        if self.data.daily_state != DailyState::Completed {
            debug!(state = %self.data.daily_state, "redo ignored");
            return Ok(None);
        }

        let discarded_item = self.data.decided_item.take();
        self.data.daily_state = DailyState::ReadyToSpin;
        self.persist()?;

        Ok(Some(Event::DecisionRedone {
            discarded_item,
            at: self.clock.now(),
        }))
    }

    /// Apply the daily rules and persist. Call on startup and on resume.
    ///
    /// Returns an event only if a rule changed something.
    pub fn reset_daily_state_if_stale(&mut self) -> Result<Option<Event>> {
        let event = self.apply_daily_rules();
        self.persist()?;
        Ok(event)
    }

    /// Zero points, streak, dates and today's decision. Items are kept.
    pub fn reset_all_data(&mut self) -> Result<Option<Event>> {
        let items = std::mem::take(&mut self.data.items);
        self.data = DecisionSnapshot::with_items(items);
        self.persist()?;

        info!("all progress reset");
        Ok(Some(Event::DataReset {
            at: self.clock.now(),
        }))
    }

    /// Append `text` as given. Text that is blank after trimming is ignored.
    pub fn add_item(&mut self, text: &str) -> Result<Option<Event>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        self.data.items.push(text.to_string());
        self.persist()?;

        Ok(Some(Event::ItemAdded {
            item: text.to_string(),
            index: self.data.items.len() - 1,
            at: self.clock.now(),
        }))
    }

    /// Remove the items at `indices` (positions in the current list).
    ///
    /// Duplicate indices are removed once. Any out-of-range index rejects the
    /// whole call before anything changes.
    pub fn remove_items(&mut self, indices: &[usize]) -> Result<Option<Event>> {
        let len = self.data.items.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(ValidationError::OutOfBounds {
                collection: "items".to_string(),
                index,
                len,
            }
            .into());
        }
        if indices.is_empty() {
            return Ok(None);
        }

        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed: Vec<String> = sorted
            .iter()
            .rev()
            .map(|&i| self.data.items.remove(i))
            .collect();
        removed.reverse();
        self.persist()?;

        Ok(Some(Event::ItemsRemoved {
            removed,
            at: self.clock.now(),
        }))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Daily rules, in memory only:
    /// 1. a decision from another day is dropped
    /// 2. otherwise a held decision is re-synced to Completed
    /// 3. the streak is zeroed after more than one idle day
    fn apply_daily_rules(&mut self) -> Option<Event> {
        let previous_state = self.data.daily_state;
        let mut cleared_item = None;

        if self.decision_is_stale() {
            self.data.daily_state = DailyState::ReadyToSpin;
            cleared_item = self.data.decided_item.take();
        } else if self.data.decided_item.is_some()
            && self.data.daily_state != DailyState::ReadyToSpin
        {
            self.data.daily_state = DailyState::Completed;
        }

        let streak_reset =
            self.data.streak_count > 0 && is_streak_broken(self.data.last_success_at, &self.clock);
        if streak_reset {
            self.data.streak_count = 0;
        }

        if previous_state == self.data.daily_state && cleared_item.is_none() && !streak_reset {
            return None;
        }

        info!(
            from = %previous_state,
            to = %self.data.daily_state,
            streak_reset,
            "daily state reset"
        );
        Some(Event::DailyStateReset {
            previous_state,
            state: self.data.daily_state,
            cleared_item,
            streak_reset,
            at: self.clock.now(),
        })
    }

    fn decision_is_stale(&self) -> bool {
        self.data
            .last_decision_at
            .is_some_and(|at| !self.clock.is_today(at))
    }

    fn finish_noop(&mut self, rules_changed: bool) -> Result<Option<Event>> {
        if rules_changed {
            self.persist()?;
        }
        Ok(None)
    }

    /// Write all fields as one batch.
    ///
    /// On failure the in-memory state is kept, so the next successful write
    /// brings the store up to date.
    fn persist(&mut self) -> Result<()> {
        self.store.write_batch(&self.data.to_batch())?;
        Ok(())
    }
}
