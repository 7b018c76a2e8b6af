use std::cell::RefCell;
use std::collections::VecDeque;

type Job = Box<dyn FnOnce()>;

/// Work that must not run while the mascot is borrowed: script listeners,
/// promise settlement and script animation routines. Queued during a call and
/// run, in order, once the borrow has been released.
#[derive(Default)]
pub struct Outbox {
    queue: RefCell<VecDeque<Job>>,
}

impl Outbox {
    pub fn defer(&self, job: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(job));
    }

    /// Jobs queued by a running job are picked up by the same flush.
    pub fn flush(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(job) = next else {
                break;
            };
            job();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
