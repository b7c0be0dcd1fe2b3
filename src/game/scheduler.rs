use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use super::timer::{Clock, ManualClock};

pub type Task = Box<dyn FnOnce()>;

/// Runs one-shot tasks later, on the same thread.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Handle to a scheduled task. Dropping it leaves the task scheduled;
/// only `cancel` unschedules it.
pub struct TaskHandle {
    canceller: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn new(canceller: impl FnOnce() + 'static) -> Self {
        TaskHandle {
            canceller: Some(Box::new(canceller)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(canceller) = self.canceller.take() {
            canceller();
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("armed", &self.canceller.is_some())
            .finish()
    }
}

struct Scheduled {
    id: u64,
    due: Instant,
    task: Task,
}

type Queue = Rc<RefCell<Vec<Scheduled>>>;

/// Scheduler driven by a `ManualClock`; tasks run inside `advance`.
pub struct ManualScheduler {
    clock: Rc<ManualClock>,
    queue: Queue,
    next_id: Cell<u64>,
}

impl ManualScheduler {
    pub fn new(clock: Rc<ManualClock>) -> Self {
        ManualScheduler {
            clock,
            queue: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Moves the clock forward and runs every task that came due, in due order.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
        let now = self.clock.now();
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due_at = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due <= now)
                    .min_by_key(|(_, s)| (s.due, s.id))
                    .map(|(idx, _)| idx);
                due_at.map(|idx| queue.remove(idx))
            };
            match next {
                Some(scheduled) => (scheduled.task)(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.queue.borrow_mut().push(Scheduled {
            id,
            due: self.clock.now() + delay,
            task,
        });

        let queue: Weak<RefCell<Vec<Scheduled>>> = Rc::downgrade(&self.queue);
        TaskHandle::new(move || {
            if let Some(queue) = queue.upgrade() {
                queue.borrow_mut().retain(|s| s.id != id);
            }
        })
    }
}
