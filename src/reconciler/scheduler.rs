use std::{
    sync::{Arc, Condvar, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

/// Runs registered jobs on a fixed cadence. Injectable so tests can drive
/// passes deterministically instead of sleeping.
pub trait Scheduler: Send + Sync {
    /// Registers `job` to run immediately and then once per `interval` until
    /// the scheduler shuts down.
    fn schedule(&self, interval: Duration, job: Box<dyn FnMut() + Send>);
}

/// Thread-backed scheduler: one worker thread per job, sleeping on a condvar
/// between wakes so shutdown is observed promptly between batches, never
/// mid-batch.
pub struct ThreadScheduler {
    shutdown: Arc<(Mutex<bool>, Condvar)>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new((Mutex::new(false), Condvar::new())),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Signals every worker to stop and joins them. Jobs finish their
    /// current run first; none is interrupted mid-batch.
    pub fn shutdown(&self) {
        {
            let (lock, cvar) = &*self.shutdown;
            let mut stopped = lock.lock().unwrap();
            *stopped = true;
            cvar.notify_all();
        }
        let handles: Vec<_> = self.handles.lock().unwrap().drain(..).collect();
        for handle in handles {
            let _ = handle.join();
        }
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, interval: Duration, mut job: Box<dyn FnMut() + Send>) {
        let shutdown = Arc::clone(&self.shutdown);
        let handle = thread::spawn(move || loop {
            {
                let (lock, _) = &*shutdown;
                if *lock.lock().unwrap() {
                    break;
                }
            }
            job();
            let (lock, cvar) = &*shutdown;
            let stopped = lock.lock().unwrap();
            let (stopped, _timeout) = cvar
                .wait_timeout_while(stopped, interval, |stop| !*stop)
                .unwrap();
            if *stopped {
                break;
            }
        });
        self.handles.lock().unwrap().push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn scheduled_job_runs_and_stops_on_shutdown() {
        let scheduler = ThreadScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        scheduler.schedule(
            Duration::from_millis(5),
            Box::new(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        thread::sleep(Duration::from_millis(30));
        scheduler.shutdown();
        let runs = counter.load(Ordering::SeqCst);
        assert!(runs >= 1, "job should have run at least once, ran {}", runs);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(counter.load(Ordering::SeqCst), runs, "no runs after shutdown");
    }
}
