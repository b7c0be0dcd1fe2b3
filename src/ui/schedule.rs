use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glib::SourceId;

use crate::game::scheduler::{Scheduler, Task, TaskHandle};

/// Runs tasks as one-shot timeouts on the GTK main loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let fired = Rc::new(Cell::new(false));
        let source: SourceId = glib::timeout_add_local_once(delay, {
            let fired = fired.clone();
            move || {
                fired.set(true);
                task();
            }
        });
        // A source that already ran is gone; removing it again would panic.
        TaskHandle::new(move || {
            if !fired.get() {
                source.remove();
            }
        })
    }
}
