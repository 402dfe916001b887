use crate::config::CustomerId;
use crate::shop::ShopContext;
use std::sync::Arc;
use std::thread;

pub mod buggy;
pub mod safe;

/// 1. `Barber` when
///     * `Idle`
///         * Asks its routine for the next customer
///     * `Sleeping`
///         * Safe routine: parked on the signal channel until a seated
///           customer (or shutdown) wakes it
///         * Buggy routine: napping for a fixed poll interval, blind to
///           arrivals until the nap ends
///     * `Serving(customer)`
///         1) Sleep for a service time from the delay source, no lock held
///         2) Count the haircut and transition to `Idle`
///     * Leaves the loop once its routine reports shutdown
pub trait Routine: Send + 'static {
    /// Returns the customer this barber has claimed, or `None` once the
    /// simulation is shutting down.
    fn next_customer(&self, context: &ShopContext, barber: usize) -> Option<CustomerId>;
}

pub struct Barber<R: Routine> {
    index: usize,
    context: Arc<ShopContext>,
    routine: R,
}

impl<R: Routine> Barber<R> {
    pub fn new(index: usize, context: Arc<ShopContext>, routine: R) -> Barber<R> {
        Barber {
            index,
            context,
            routine,
        }
    }

    pub fn run(self) {
        while let Some(customer) = self.routine.next_customer(&self.context, self.index) {
            self.serve(customer);
        }

        info!("barber {} went home", self.index);
    }

    fn serve(&self, customer: CustomerId) {
        debug!("barber {} is cutting hair of customer {}", self.index, customer);

        thread::sleep(self.context.delays.next_service_time());

        self.context.shop.finish(self.index);

        debug!("barber {} finished customer {}", self.index, customer);
    }
}
