//! Game-clock timers
//!
//! Timers are plain data drained between ticks, in due order. Each entry
//! remembers the session generation it was scheduled under so the controller
//! can drop fires that outlived their session.

/// Handle returned when scheduling, used to cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Spawner fire: emit an obstacle or a bonus
    Spawn,
    /// End of a timed bonus
    RevertBonus { effect_id: u32 },
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub event: TimerEvent,
    pub generation: u32,
    /// Game-clock time the timer was due
    pub at: f64,
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TimerHandle,
    due: f64,
    period: Option<f64>,
    generation: u32,
    event: TimerEvent,
}

/// Shortest repeating period accepted (seconds)
const MIN_PERIOD: f64 = 1e-3;

/// Pending timers on the game clock
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    entries: Vec<Scheduled>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current game-clock time (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Fire `event` every `period` seconds, first fire one period from now
    pub fn schedule_repeating(&mut self, period: f32, event: TimerEvent, generation: u32) -> TimerHandle {
        let period = (period as f64).max(MIN_PERIOD);
        self.push(period, Some(period), event, generation)
    }

    /// Fire `event` once, `delay` seconds from now
    pub fn schedule_once(&mut self, delay: f32, event: TimerEvent, generation: u32) -> TimerHandle {
        self.push((delay as f64).max(0.0), None, event, generation)
    }

    fn push(&mut self, delay: f64, period: Option<f64>, event: TimerEvent, generation: u32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Scheduled {
            handle,
            due: self.now + delay,
            period,
            generation,
            event,
        });
        handle
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Take the earliest timer due at or before `until`
    ///
    /// Moves the clock to that timer's due time. Repeating timers are re-armed
    /// one period later, so a long frame yields every missed fire in order.
    pub fn pop_due(&mut self, until: f64) -> Option<FiredTimer> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[index];
        let fired = FiredTimer {
            handle: entry.handle,
            event: entry.event,
            generation: entry.generation,
            at: entry.due,
        };
        self.now = self.now.max(entry.due);

        match entry.period {
            Some(period) => entry.due += period,
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some(fired)
    }

    /// Move the clock forward once every due timer has been taken
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }
}
