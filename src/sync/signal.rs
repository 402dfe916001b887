use std_semaphore::Semaphore;

/// Counting wakeup. Signals that nobody is waiting for are remembered, so a
/// waiter that shows up late still sees them.
pub struct SignalChannel {
    customers: Semaphore,
}

impl SignalChannel {
    pub fn new() -> SignalChannel {
        SignalChannel {
            customers: Semaphore::new(0),
        }
    }

    pub fn signal(&self) {
        self.customers.release();
    }

    /// Blocks until at least one signal is pending, then consumes it.
    pub fn await_signal(&self) {
        self.customers.acquire();
    }
}

impl Default for SignalChannel {
    fn default() -> SignalChannel {
        SignalChannel::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn waiter(channel: &Arc<SignalChannel>, done_tx: mpsc::Sender<()>) -> thread::JoinHandle<()> {
        let channel = channel.clone();

        thread::spawn(move || {
            channel.await_signal();
            done_tx.send(()).unwrap();
        })
    }

    #[test]
    fn signal_before_wait_is_not_lost() {
        let channel = Arc::new(SignalChannel::new());
        let (done_tx, done_rx) = mpsc::channel();

        channel.signal();
        channel.signal();

        let first = waiter(&channel, done_tx.clone());
        let second = waiter(&channel, done_tx);

        done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        done_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        first.join().unwrap();
        second.join().unwrap();
    }

    #[test]
    fn blocked_waiter_is_released_by_signal() {
        let channel = Arc::new(SignalChannel::new());
        let (done_tx, done_rx) = mpsc::channel();

        let waiter = waiter(&channel, done_tx);

        assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());

        channel.signal();

        done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        waiter.join().unwrap();
    }

    #[test]
    fn each_signal_releases_exactly_one_waiter() {
        let channel = Arc::new(SignalChannel::new());
        let (done_tx, done_rx) = mpsc::channel();

        let waiters: Vec<_> = (0..3)
            .map(|_| waiter(&channel, done_tx.clone()))
            .collect();

        channel.signal();
        channel.signal();

        done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(done_rx.recv_timeout(Duration::from_millis(150)).is_err());

        channel.signal();
        done_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        waiters.into_iter().for_each(|waiter| waiter.join().unwrap());
    }
}
