use crate::config::Protocol;
use crate::shop::state::Admission;
use crate::shop::ShopContext;
use std::sync::Arc;

/// Only goal for ArrivalGenerator is to keep sending customers into the shop
/// until the simulation is stopped.
pub struct ArrivalGenerator {
    context: Arc<ShopContext>,
}

impl ArrivalGenerator {
    pub fn new(context: Arc<ShopContext>) -> ArrivalGenerator {
        ArrivalGenerator { context }
    }

    pub fn run(self) {
        while !self.context.token.is_cancelled() {
            let gap = self.context.delays.next_arrival_gap();

            if self.context.token.sleep(gap) {
                break;
            }

            self.arrive();
        }

        info!("arrival generator stopped");
    }

    /// One customer walks in. A seated or handed off customer is announced
    /// with exactly one signal in safe mode; a turned away one is gone for
    /// good.
    pub fn arrive(&self) -> Admission {
        let admission = self.context.shop.admit();

        match admission {
            Admission::Seated(customer) => {
                debug!("customer {} sat down", customer);

                if self.context.protocol == Protocol::Safe {
                    self.context.signals.signal();
                }
            }
            Admission::HandedOff { customer, barber } => {
                debug!("customer {} went straight to barber {}", customer, barber);

                if self.context.protocol == Protocol::Safe {
                    self.context.signals.signal();
                }
            }
            Admission::TurnedAway(customer) => {
                debug!("customer {} found no free chair and left", customer);
            }
        }

        admission
    }
}
