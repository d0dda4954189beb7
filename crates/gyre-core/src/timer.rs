//! Deadlines for the three per-axis dwell timers and the shared idle timer.
//!
//! Deadlines live on the driver's clock (seconds). Nothing fires on its own:
//! the driver collects due timers at the top of each tick, so cancelling the
//! set guarantees no callback runs afterwards.

use crate::drift::Axis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerId {
    Dwell(Axis),
    Idle,
}

#[derive(Clone, Debug, Default)]
pub struct TimerSet {
    dwell: [Option<f64>; 3],
    idle: Option<f64>,
    running: bool,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept schedules from now on.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Drop every pending deadline and refuse new ones until restarted.
    pub fn cancel_all(&mut self) {
        self.dwell = [None; 3];
        self.idle = None;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set (or replace) the deadline for `id`. Ignored while not running.
    pub fn schedule(&mut self, id: TimerId, deadline: f64) {
        if !self.running {
            return;
        }
        *self.slot(id) = Some(deadline);
    }

    pub fn cancel(&mut self, id: TimerId) {
        *self.slot(id) = None;
    }

    pub fn deadline(&self, id: TimerId) -> Option<f64> {
        match id {
            TimerId::Dwell(axis) => self.dwell[axis.index()],
            TimerId::Idle => self.idle,
        }
    }

    pub fn pending(&self) -> usize {
        self.dwell.iter().chain([&self.idle]).filter(|d| d.is_some()).count()
    }

    /// Remove and return every timer due at `now`, earliest first.
    /// Ties keep X, Y, Z, idle order.
    pub fn take_due(&mut self, now: f64) -> Vec<TimerId> {
        let mut due: Vec<(f64, TimerId)> = Vec::new();
        for axis in Axis::ALL {
            let id = TimerId::Dwell(axis);
            if let Some(deadline) = self.deadline(id)
                && deadline <= now
            {
                due.push((deadline, id));
            }
        }
        if let Some(deadline) = self.idle
            && deadline <= now
        {
            due.push((deadline, TimerId::Idle));
        }

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (_, id) in &due {
            self.cancel(*id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    fn slot(&mut self, id: TimerId) -> &mut Option<f64> {
        match id {
            TimerId::Dwell(axis) => &mut self.dwell[axis.index()],
            TimerId::Idle => &mut self.idle,
        }
    }
}
