use std::collections::HashSet;
use std::rc::Rc;

use proptest::prelude::*;

use lazy_pour::pouring::Vessels;
use lazy_pour::puzzle::TransitionSystem;
use lazy_pour::search::Explorer;

fn capacities() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=7, 1..=3)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn paths_come_out_shortest_first(caps in capacities()) {
        let explorer = Explorer::new(Rc::new(Vessels::new(caps).unwrap()));
        let lens: Vec<usize> = explorer.map(|p| p.len()).collect();
        prop_assert_eq!(lens.first().copied(), Some(0));
        prop_assert!(lens.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn every_state_is_emitted_once(caps in capacities()) {
        let mut explorer = Explorer::new(Rc::new(Vessels::new(caps).unwrap()));
        let mut seen = HashSet::new();
        for path in explorer.by_ref() {
            prop_assert!(seen.insert(path.state().clone()), "repeated state {}", path.state());
        }
        prop_assert_eq!(explorer.explored_len(), seen.len());
    }

    #[test]
    fn cached_state_matches_replayed_moves(caps in capacities()) {
        let vessels = Rc::new(Vessels::new(caps).unwrap());
        for path in Explorer::new(Rc::clone(&vessels)) {
            prop_assert_eq!(&vessels.lead_to(&path.moves()), path.state());
            prop_assert!(vessels.admits(path.state()));

            let states = path.states();
            prop_assert_eq!(states.len(), path.len() + 1);
            prop_assert_eq!(states.first(), Some(&vessels.initial()));
            prop_assert_eq!(states.last(), Some(path.state()));
        }
    }

    #[test]
    fn exploration_matches_plain_reachability(caps in capacities()) {
        let vessels = Vessels::new(caps).unwrap();

        // Reference: plain flood fill over the same move set.
        let mut reachable = HashSet::new();
        let mut todo = vec![vessels.initial()];
        while let Some(state) = todo.pop() {
            if reachable.insert(state.clone()) {
                for mv in vessels.moves() {
                    todo.push(vessels.apply(mv, &state));
                }
            }
        }

        let emitted: HashSet<_> = Explorer::new(Rc::new(vessels))
            .map(|p| p.state().clone())
            .collect();
        prop_assert_eq!(emitted, reachable);
    }
}
