//! Cooperative scheduling for deferred propagation scans
//!
//! The resolver never recurses into a follow-up scan. It hands the scan to a
//! [`Scheduler`] as a new task, which yields to whatever else is queued first
//! (loader completions, other resolvers) before the scan runs.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce()>;

/// Accepts tasks to run later, after the current call stack unwinds
pub trait Scheduler {
    fn defer(&self, task: Task);
}

/// FIFO task queue driven explicitly by its owner
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run the oldest task. Returns false if the queue was empty.
    pub fn run_next(&self) -> bool {
        // the borrow ends before the task runs so it can enqueue more work
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks, including ones queued while running, until none are left
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Scheduler for TaskQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_tasks_run_in_submission_order() {
        let queue = TaskQueue::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for index in 0..3 {
            let order = Rc::clone(&order);
            queue.defer(Box::new(move || order.borrow_mut().push(index)));
        }

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.run_until_idle(), 3);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tasks_may_enqueue_more_tasks() {
        let queue = TaskQueue::new();
        let counter = Rc::new(Cell::new(0));

        let inner_queue = queue.clone();
        let inner_counter = Rc::clone(&counter);
        queue.defer(Box::new(move || {
            inner_counter.set(inner_counter.get() + 1);
            let nested = Rc::clone(&inner_counter);
            inner_queue.defer(Box::new(move || nested.set(nested.get() + 10)));
        }));

        assert_eq!(queue.run_until_idle(), 2);
        assert_eq!(counter.get(), 11);
    }

    #[test]
    fn test_run_next_on_empty_queue() {
        let queue = TaskQueue::new();
        assert!(!queue.run_next());
        assert_eq!(queue.run_until_idle(), 0);
    }
}
