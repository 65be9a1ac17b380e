use std::collections::HashMap;
use std::sync::Mutex;
use tokio::task::JoinHandle;

use super::lock;

/// Background tasks keyed by name. Spawning under a key that is still in use
/// aborts the previous task.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub fn spawn(&mut self, key: &str, task: JoinHandle<()>) {
        if let Some(handle) = self.tasks.insert(key.to_string(), task) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
        self.tasks.clear();
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// A single cancellable task handle. At most one task is outstanding; arming
/// the slot again aborts whatever was there before.
#[derive(Default)]
pub struct TaskSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self, task: JoinHandle<()>) {
        if let Some(previous) = lock(&self.handle).replace(task) {
            previous.abort();
        }
    }

    /// Safe to call when nothing is armed.
    pub fn cancel(&self) {
        if let Some(handle) = lock(&self.handle).take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        lock(&self.handle)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
