//! Host-owned scheduler for one-shot deferred tasks
//!
//! Tasks are closures run on a specific future tick with access to that
//! tick's [`Frame`]. They are not timers: they never repeat, never re-enter
//! and fire at most once. Whoever schedules a task keeps its [`TaskId`] and
//! cancels it on teardown.

use crate::scene::Frame;
use std::fmt;

/// Identifies a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Deferred work run with the due tick's frame
pub type Task = Box<dyn FnOnce(&mut Frame<'_>)>;

struct PendingTask {
    id: TaskId,
    due: u64,
    task: Task,
}

/// One-shot task queue advanced by the host tick loop
pub struct TickScheduler {
    /// Current tick (0 before the first tick)
    tick: u64,
    next_id: u64,
    /// Pending tasks in scheduling order
    pending: Vec<PendingTask>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            tick: 0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current tick number
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Start the next tick and return its number
    pub fn begin_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Run `task` during the next tick
    pub fn schedule_next_tick<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce(&mut Frame<'_>) + 'static,
    {
        self.schedule_after(1, task)
    }

    /// Run `task` `ticks` ticks from now (at least one)
    pub fn schedule_after<F>(&mut self, ticks: u64, task: F) -> TaskId
    where
        F: FnOnce(&mut Frame<'_>) + 'static,
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        self.pending.push(PendingTask {
            id,
            due: self.tick + ticks.max(1),
            task: Box::new(task),
        });

        id
    }

    /// Drop a pending task. Returns false if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Run every task due on or before the current tick, in scheduling order.
    ///
    /// Returns the number of tasks run.
    pub fn run_due(&mut self, frame: &mut Frame<'_>) -> usize {
        let now = self.tick;
        let (due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.due <= now);
        self.pending = waiting;

        let count = due.len();
        for pending in due {
            log::trace!("Running task {} on tick {}", pending.id.0, now);
            (pending.task)(frame);
        }
        count
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickScheduler")
            .field("tick", &self.tick)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryScene;
    use crate::tracking::TrackingTable;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn run_tick(scheduler: &mut TickScheduler, scene: &mut MemoryScene) -> usize {
        let tracking = TrackingTable::new();
        let tick = scheduler.begin_tick();
        let mut frame = Frame::new(scene, &tracking, tick);
        scheduler.run_due(&mut frame)
    }

    #[test]
    fn test_next_tick_runs_once() {
        let mut scheduler = TickScheduler::new();
        let mut scene = MemoryScene::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let log = hits.clone();
        let id = scheduler.schedule_next_tick(move |frame| log.borrow_mut().push(frame.tick));
        assert!(scheduler.is_pending(id));

        assert_eq!(run_tick(&mut scheduler, &mut scene), 1);
        assert_eq!(run_tick(&mut scheduler, &mut scene), 0);
        assert_eq!(*hits.borrow(), vec![1]);
        assert!(!scheduler.is_pending(id));
    }

    #[test]
    fn test_schedule_after() {
        let mut scheduler = TickScheduler::new();
        let mut scene = MemoryScene::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let log = hits.clone();
        scheduler.schedule_after(3, move |frame| log.borrow_mut().push(frame.tick));

        for _ in 0..5 {
            run_tick(&mut scheduler, &mut scene);
        }
        assert_eq!(*hits.borrow(), vec![3]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = TickScheduler::new();
        let mut scene = MemoryScene::new();
        let hits = Rc::new(RefCell::new(0));

        let counter = hits.clone();
        let id = scheduler.schedule_next_tick(move |_| *counter.borrow_mut() += 1);

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        run_tick(&mut scheduler, &mut scene);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_run_in_schedule_order() {
        let mut scheduler = TickScheduler::new();
        let mut scene = MemoryScene::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            scheduler.schedule_next_tick(move |_| order.borrow_mut().push(i));
        }
        run_tick(&mut scheduler, &mut scene);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
