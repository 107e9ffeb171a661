//! Which microcycle counts as "the last one" in a mesocycle.
//!
//! Latest means highest `order`. Historical data can hold several weeks with
//! the same `order`; among those the highest id wins. Microcycle ids are
//! time-ordered, so that is also the most recently created one.

use std::cmp::Ordering;

use super::Microcycle;

/// Total order over microcycles from oldest to latest.
pub fn recency_cmp(a: &Microcycle, b: &Microcycle) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id))
}

/// Returns the latest microcycle, if any.
pub fn latest_microcycle<'a, I>(microcycles: I) -> Option<&'a Microcycle>
where
    I: IntoIterator<Item = &'a Microcycle>,
{
    microcycles.into_iter().max_by(|a, b| recency_cmp(a, b))
}

/// Order for a new microcycle appended after the existing ones.
/// `None` once the highest order has no successor.
pub fn next_order<'a, I>(microcycles: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a Microcycle>,
{
    match microcycles.into_iter().map(|m| m.order).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MesocycleId, MicrocycleId};
    use uuid::Uuid;

    fn week(order: u32, id: u128) -> Microcycle {
        let mut m = Microcycle::new(MesocycleId::new(), format!("Semana {}", order), order, false, vec![]);
        m.id = MicrocycleId::from_uuid(Uuid::from_u128(id));
        m
    }

    #[test]
    fn highest_order_wins() {
        let weeks = vec![week(1, 9), week(3, 1), week(2, 5)];
        assert_eq!(latest_microcycle(&weeks).unwrap().order, 3);
    }

    #[test]
    fn order_ties_break_on_highest_id() {
        let weeks = vec![week(2, 10), week(2, 30), week(2, 20), week(1, 99)];
        let latest = latest_microcycle(&weeks).unwrap();
        assert_eq!(latest.id, MicrocycleId::from_uuid(Uuid::from_u128(30)));
    }

    #[test]
    fn tie_break_does_not_depend_on_input_order() {
        let mut weeks = vec![week(4, 7), week(4, 8)];
        let forward = latest_microcycle(&weeks).unwrap().id;
        weeks.reverse();
        assert_eq!(latest_microcycle(&weeks).unwrap().id, forward);
    }

    #[test]
    fn empty_mesocycle_has_no_latest() {
        let weeks: Vec<Microcycle> = vec![];
        assert!(latest_microcycle(&weeks).is_none());
    }

    #[test]
    fn next_order_follows_maximum() {
        assert_eq!(next_order(&Vec::<Microcycle>::new()), Some(1));
        assert_eq!(next_order(&vec![week(1, 1), week(4, 2), week(2, 3)]), Some(5));
    }

    #[test]
    fn no_next_order_after_the_maximum() {
        assert_eq!(next_order(&vec![week(u32::MAX, 1)]), None);
        assert_eq!(next_order(&vec![week(u32::MAX - 1, 1)]), Some(u32::MAX));
    }

    #[test]
    fn comparator_sorts_oldest_first() {
        let mut weeks = vec![week(2, 2), week(1, 5), week(2, 1)];
        weeks.sort_by(recency_cmp);
        let keys: Vec<(u32, u128)> = weeks.iter().map(|w| (w.order, w.id.as_uuid().as_u128())).collect();
        assert_eq!(keys, vec![(1, 5), (2, 1), (2, 2)]);
    }
}
