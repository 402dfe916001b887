use crate::config::CustomerId;
use crate::shop::barber::Routine;
use crate::shop::ShopContext;

/// Sleeps on the counting signal. Every seated or handed off customer comes
/// with exactly one signal, so a barber cannot doze while someone is left in
/// a chair.
pub struct SafeRoutine;

impl Routine for SafeRoutine {
    fn next_customer(&self, context: &ShopContext, barber: usize) -> Option<CustomerId> {
        loop {
            context.shop.park(barber);

            context.signals.await_signal();

            if context.token.is_cancelled() {
                return None;
            }

            match context.shop.claim_next(barber) {
                Some(customer) => return Some(customer),
                None => debug!("barber {} woke up to an empty waiting area", barber),
            }
        }
    }
}
