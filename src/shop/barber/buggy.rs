use crate::config::CustomerId;
use crate::shop::barber::Routine;
use crate::shop::ShopContext;
use std::thread;
use std::time::Duration;

/// Checks the waiting area, and if it is empty takes a nap of fixed length
/// without asking anybody to wake it up. Whoever sits down during the nap
/// waits until the nap is over, and with every barber napping at once the
/// shop looks dead while customers are sitting in it.
pub struct BuggyRoutine {
    poll_interval: Duration,
}

impl BuggyRoutine {
    pub fn new(poll_interval: Duration) -> BuggyRoutine {
        BuggyRoutine { poll_interval }
    }
}

impl Routine for BuggyRoutine {
    fn next_customer(&self, context: &ShopContext, barber: usize) -> Option<CustomerId> {
        loop {
            if context.token.is_cancelled() {
                return None;
            }

            if let Some(customer) = context.shop.claim_next(barber) {
                return Some(customer);
            }

            trace!("barber {} sees nobody, napping for {:?}", barber, self.poll_interval);

            thread::sleep(self.poll_interval);
        }
    }
}
