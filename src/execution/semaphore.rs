use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Blocking counting semaphore bounding how many chunks run at once.
pub(crate) struct Semaphore {
    permits: Mutex<usize>,
    cv: Condvar,
}

/// One held permit; returned to the semaphore on drop.
pub(crate) struct Permit<'a> {
    sem: &'a Semaphore,
}

impl Semaphore {
    pub(crate) fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits.max(1)),
            cv: Condvar::new(),
        }
    }

    /// Block until a permit is free. Also returns the time spent blocked (zero if none).
    pub(crate) fn acquire(&self) -> (Permit<'_>, Duration) {
        let start = Instant::now();
        let mut blocked = false;
        let mut free = self.permits.lock().expect("semaphore mutex poisoned");
        while *free == 0 {
            blocked = true;
            free = self.cv.wait(free).expect("semaphore mutex poisoned");
        }
        *free -= 1;
        let waited = if blocked { start.elapsed() } else { Duration::ZERO };
        (Permit { sem: self }, waited)
    }

    fn release(&self) {
        let mut free = self.permits.lock().expect("semaphore mutex poisoned");
        *free += 1;
        self.cv.notify_one();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.sem.release();
    }
}

#[cfg(test)]
mod tests {
    use super::Semaphore;
    use std::time::Duration;

    #[test]
    fn permits_are_returned_on_drop() {
        let sem = Semaphore::new(1);
        let (first, waited) = sem.acquire();
        assert_eq!(waited, Duration::ZERO);
        drop(first);
        let (_second, waited) = sem.acquire();
        assert_eq!(waited, Duration::ZERO);
    }

    #[test]
    fn zero_permits_is_clamped_to_one() {
        let sem = Semaphore::new(0);
        let (_permit, waited) = sem.acquire();
        assert_eq!(waited, Duration::ZERO);
    }
}
