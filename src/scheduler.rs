use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

enum Command {
    Schedule {
        id: TaskId,
        label: String,
        period: Duration,
        task: Box<dyn FnMut() + Send>,
    },
    Cancel(TaskId),
    Shutdown,
}

struct ScheduledTask {
    label: String,
    period: Duration,
    next_run: Instant,
    task: Box<dyn FnMut() + Send>,
}

/// Runs registered tasks repeatedly on one background thread.
///
/// Scheduling is fixed-delay: a task first runs one period after it is
/// registered, and each later run starts one period after the previous run
/// finished. A task that panics is logged and dropped; the others keep
/// running.
pub struct TickScheduler {
    commands: Sender<Command>,
    worker: Option<JoinHandle<()>>,
    next_id: AtomicU64,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        let (commands, receiver) = mpsc::channel();
        let worker = thread::spawn(move || run_loop(&receiver));
        Self {
            commands,
            worker: Some(worker),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a recurring task. The label only names the task in logs.
    #[must_use]
    pub fn schedule(
        &self,
        label: impl Into<String>,
        period: Duration,
        task: impl FnMut() + Send + 'static,
    ) -> TaskId {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let _ = self.commands.send(Command::Schedule {
            id,
            label: label.into(),
            period,
            task: Box::new(task),
        });
        id
    }

    pub fn cancel(&self, id: TaskId) {
        let _ = self.commands.send(Command::Cancel(id));
    }

    /// Stops the worker thread and waits for it to finish. Safe to call more
    /// than once.
    pub fn shutdown(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(receiver: &Receiver<Command>) {
    let mut tasks: HashMap<TaskId, ScheduledTask> = HashMap::new();
    loop {
        let nearest = tasks.values().map(|task| task.next_run).min();
        let command = match nearest {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(wait) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
            None => match receiver.recv() {
                Ok(command) => Some(command),
                Err(_) => return,
            },
        };
        match command {
            Some(Command::Schedule {
                id,
                label,
                period,
                task,
            }) => {
                tasks.insert(
                    id,
                    ScheduledTask {
                        label,
                        period,
                        next_run: Instant::now() + period,
                        task,
                    },
                );
            }
            Some(Command::Cancel(id)) => {
                tasks.remove(&id);
            }
            Some(Command::Shutdown) => return,
            None => {}
        }
        run_due_tasks(&mut tasks);
    }
}

fn run_due_tasks(tasks: &mut HashMap<TaskId, ScheduledTask>) {
    let now = Instant::now();
    let due: Vec<TaskId> = tasks
        .iter()
        .filter(|(_, task)| task.next_run <= now)
        .map(|(id, _)| *id)
        .collect();
    for id in due {
        let Some(entry) = tasks.get_mut(&id) else {
            continue;
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (entry.task)()));
        if outcome.is_ok() {
            entry.next_run = Instant::now() + entry.period;
        } else {
            log::error!("task '{}' panicked and will not run again", entry.label);
            tasks.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn counting_task(count: &Arc<AtomicUsize>) -> impl FnMut() + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_task_runs_repeatedly() {
        let scheduler = TickScheduler::new();
        let count = counter();
        let _id = scheduler.schedule("counter", Duration::from_millis(10), counting_task(&count));
        thread::sleep(Duration::from_millis(150));
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_first_run_waits_one_period() {
        let scheduler = TickScheduler::new();
        let count = counter();
        let _id = scheduler.schedule("counter", Duration::from_millis(100), counting_task(&count));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        thread::sleep(Duration::from_millis(200));
        assert!(count.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_panicking_task_does_not_stop_the_others() {
        let scheduler = TickScheduler::new();
        let panics = counter();
        let panic_count = Arc::clone(&panics);
        let _bad = scheduler.schedule("bad", Duration::from_millis(10), move || {
            panic_count.fetch_add(1, Ordering::SeqCst);
            panic!("tick failed");
        });
        let count = counter();
        let _good = scheduler.schedule("good", Duration::from_millis(10), counting_task(&count));
        thread::sleep(Duration::from_millis(150));
        assert_eq!(panics.load(Ordering::SeqCst), 1);
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_cancel_stops_a_task() {
        let scheduler = TickScheduler::new();
        let count = counter();
        let id = scheduler.schedule("counter", Duration::from_millis(10), counting_task(&count));
        thread::sleep(Duration::from_millis(60));
        scheduler.cancel(id);
        thread::sleep(Duration::from_millis(60));
        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 1);
        thread::sleep(Duration::from_millis(60));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn test_shutdown_stops_ticking() {
        let mut scheduler = TickScheduler::new();
        let count = counter();
        let _id = scheduler.schedule("counter", Duration::from_millis(10), counting_task(&count));
        thread::sleep(Duration::from_millis(60));
        scheduler.shutdown();
        let after_shutdown = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(60));
        assert_eq!(count.load(Ordering::SeqCst), after_shutdown);
    }
}
