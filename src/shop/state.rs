use crate::config::{CustomerId, Protocol, ShopConfig};
use crate::shop::waiting_area::WaitingArea;
use crate::sync::lock;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BarberState {
    Idle,
    Sleeping,
    Serving(CustomerId),
}

impl BarberState {
    pub fn is_serving(&self) -> bool {
        match self {
            BarberState::Serving(_) => true,
            _ => false,
        }
    }
}

/// Outcome of one arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Seated(CustomerId),
    /// No free chair, but a parked barber took the customer straight away.
    HandedOff { customer: CustomerId, barber: usize },
    TurnedAway(CustomerId),
}

/// Immutable copy of the whole shop, taken in a single critical section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub barbers: u32,
    pub chairs: u32,
    pub protocol: Protocol,
    pub waiting: Vec<CustomerId>,
    pub barber_states: Vec<BarberState>,
    pub customer_count: u64,
    pub served_count: u64,
    pub turned_away_count: u64,
}

impl Snapshot {
    pub fn serving_count(&self) -> usize {
        self.barber_states
            .iter()
            .filter(|state| state.is_serving())
            .count()
    }

    /// Customers are waiting and nobody is cutting hair.
    pub fn looks_stuck(&self) -> bool {
        !self.waiting.is_empty() && self.serving_count() == 0
    }
}

#[derive(Debug)]
struct ShopState {
    waiting: WaitingArea,
    barbers: Vec<BarberState>,
    handoffs: Vec<Option<CustomerId>>, // Handed off, not yet picked up by the barber
    customer_count: u64,
    served_count: u64,
    turned_away_count: u64,
}

/// Counters, barber states and the waiting area behind one exclusive lock.
#[derive(Debug)]
pub struct Shop {
    protocol: Protocol,
    state: Mutex<ShopState>,
}

impl Shop {
    pub fn new(config: &ShopConfig) -> Shop {
        Shop {
            protocol: config.protocol,
            state: Mutex::new(ShopState {
                waiting: WaitingArea::new(config.chairs as usize),
                barbers: vec![BarberState::Idle; config.barbers as usize],
                handoffs: vec![None; config.barbers as usize],
                customer_count: 0,
                served_count: 0,
                turned_away_count: 0,
            }),
        }
    }

    /// Registers a new customer and tries to seat them. When every chair is
    /// taken and more barbers are parked than customers are waiting, a parked
    /// barber gets the customer directly and is `Serving` from this moment.
    pub fn admit(&self) -> Admission {
        let mut state = lock(&self.state);

        state.customer_count += 1;
        let customer = state.customer_count;

        if state.waiting.try_enqueue(customer) {
            return Admission::Seated(customer);
        }

        let parked = state
            .barbers
            .iter()
            .filter(|barber| **barber == BarberState::Sleeping)
            .count();

        if parked > state.waiting.len() {
            if let Some(barber) = state
                .barbers
                .iter()
                .position(|barber| *barber == BarberState::Sleeping)
            {
                state.barbers[barber] = BarberState::Serving(customer);
                state.handoffs[barber] = Some(customer);

                return Admission::HandedOff { customer, barber };
            }
        }

        state.turned_away_count += 1;

        Admission::TurnedAway(customer)
    }

    /// Finds the next customer for `barber`, in order: one handed to this
    /// barber, the head of the waiting area, one handed to another barber that
    /// has not picked it up yet. The pick and the switch to `Serving` happen
    /// in one critical section, so a customer is always either waiting or
    /// being served. With nothing to take the barber is marked `Sleeping`.
    pub fn claim_next(&self, barber: usize) -> Option<CustomerId> {
        let mut state = lock(&self.state);

        if let Some(customer) = state.handoffs[barber].take() {
            return Some(customer);
        }

        if let Some(customer) = state.waiting.try_dequeue() {
            state.barbers[barber] = BarberState::Serving(customer);
            return Some(customer);
        }

        let other = state.handoffs.iter().position(|handoff| handoff.is_some());

        if let Some(other) = other {
            if let Some(customer) = state.handoffs[other].take() {
                state.barbers[other] = BarberState::Sleeping;
                state.barbers[barber] = BarberState::Serving(customer);
                return Some(customer);
            }
        }

        state.barbers[barber] = BarberState::Sleeping;

        None
    }

    /// Marks `barber` as waiting for work, unless a customer was already
    /// handed to it.
    pub fn park(&self, barber: usize) {
        let mut state = lock(&self.state);

        if state.handoffs[barber].is_none() {
            state.barbers[barber] = BarberState::Sleeping;
        }
    }

    pub fn finish(&self, barber: usize) {
        let mut state = lock(&self.state);

        state.served_count += 1;
        state.barbers[barber] = BarberState::Idle;
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = lock(&self.state);

        Snapshot {
            barbers: state.barbers.len() as u32,
            chairs: state.waiting.capacity() as u32,
            protocol: self.protocol,
            waiting: state.waiting.snapshot_order(),
            barber_states: state.barbers.clone(),
            customer_count: state.customer_count,
            served_count: state.served_count,
            turned_away_count: state.turned_away_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop(barbers: u32, chairs: u32) -> Shop {
        Shop::new(&ShopConfig {
            barbers,
            chairs,
            ..ShopConfig::default()
        })
    }

    #[test]
    fn admissions_are_numbered_in_arrival_order() {
        let shop = shop(1, 2);

        assert_eq!(shop.admit(), Admission::Seated(1));
        assert_eq!(shop.admit(), Admission::Seated(2));
        assert_eq!(shop.admit(), Admission::TurnedAway(3));

        let snapshot = shop.snapshot();
        assert_eq!(snapshot.waiting, vec![1, 2]);
        assert_eq!(snapshot.customer_count, 3);
        assert_eq!(snapshot.turned_away_count, 1);
    }

    #[test]
    fn claim_moves_customer_from_chair_to_barber() {
        let shop = shop(2, 3);
        shop.admit();
        shop.admit();

        assert_eq!(shop.claim_next(1), Some(1));

        let snapshot = shop.snapshot();
        assert_eq!(snapshot.waiting, vec![2]);
        assert_eq!(
            snapshot.barber_states,
            vec![BarberState::Idle, BarberState::Serving(1)]
        );
        assert!(!snapshot.looks_stuck());

        shop.finish(1);

        let snapshot = shop.snapshot();
        assert_eq!(snapshot.served_count, 1);
        assert_eq!(snapshot.barber_states[1], BarberState::Idle);
        assert!(snapshot.looks_stuck());
    }

    #[test]
    fn empty_claim_puts_barber_to_sleep() {
        let shop = shop(1, 1);

        assert_eq!(shop.claim_next(0), None);
        assert_eq!(shop.snapshot().barber_states, vec![BarberState::Sleeping]);
    }

    #[test]
    fn customers_are_conserved() {
        let shop = shop(2, 2);

        for _ in 0..5 {
            shop.admit();
        }
        shop.claim_next(0);
        shop.finish(0);
        shop.claim_next(1);

        let snapshot = shop.snapshot();
        let accounted = snapshot.served_count
            + snapshot.turned_away_count
            + snapshot.waiting.len() as u64
            + snapshot.serving_count() as u64;
        assert_eq!(snapshot.customer_count, accounted);
    }

    #[test]
    fn snapshot_serializes_barber_states_tagged() {
        let shop = shop(1, 1);
        shop.admit();
        shop.claim_next(0);

        let json = serde_json::to_value(shop.snapshot()).unwrap();

        assert_eq!(json["barber_states"][0]["type"], "Serving");
        assert_eq!(json["barber_states"][0]["data"], 1);
        assert_eq!(json["protocol"], "safe");
    }

    #[test]
    fn no_chairs_hands_customer_to_parked_barber() {
        let shop = shop(1, 0);

        assert_eq!(shop.admit(), Admission::TurnedAway(1));

        shop.park(0);
        assert_eq!(shop.admit(), Admission::HandedOff { customer: 2, barber: 0 });
        assert_eq!(shop.snapshot().barber_states, vec![BarberState::Serving(2)]);

        assert_eq!(shop.admit(), Admission::TurnedAway(3));

        assert_eq!(shop.claim_next(0), Some(2));
        shop.finish(0);

        let snapshot = shop.snapshot();
        assert_eq!(snapshot.served_count, 1);
        assert_eq!(snapshot.turned_away_count, 2);
        assert!(snapshot.waiting.is_empty());
    }

    #[test]
    fn handoff_needs_more_parked_barbers_than_waiting_customers() {
        let shop = shop(2, 1);
        shop.park(0);
        shop.park(1);

        assert_eq!(shop.admit(), Admission::Seated(1));
        assert_eq!(shop.admit(), Admission::HandedOff { customer: 2, barber: 0 });
        assert_eq!(shop.admit(), Admission::TurnedAway(3));

        let snapshot = shop.snapshot();
        assert_eq!(snapshot.waiting, vec![1]);
        assert_eq!(
            snapshot.barber_states,
            vec![BarberState::Serving(2), BarberState::Sleeping]
        );
    }

    #[test]
    fn another_barber_can_pick_up_a_handoff() {
        let shop = shop(2, 0);
        shop.park(0);
        shop.park(1);
        shop.admit();

        assert_eq!(shop.claim_next(1), Some(1));
        assert_eq!(
            shop.snapshot().barber_states,
            vec![BarberState::Sleeping, BarberState::Serving(1)]
        );

        assert_eq!(shop.claim_next(0), None);
    }

    #[test]
    fn parking_keeps_a_pending_handoff() {
        let shop = shop(1, 0);
        shop.park(0);
        shop.admit();

        shop.park(0);

        assert_eq!(shop.snapshot().barber_states, vec![BarberState::Serving(1)]);
        assert_eq!(shop.claim_next(0), Some(1));
    }
}
