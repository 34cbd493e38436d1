//! Property-based tests for Tab Manager operations.
//!
//! For any sequence of opens, closes and switches the manager holds at least
//! one tab and exactly one of them is active.

use chatking::managers::tab_manager::{TabManager, TabManagerTrait};
use proptest::prelude::*;

/// Operations that can be performed on the TabManager.
#[derive(Debug, Clone)]
enum TabOp {
    Add,
    Close(usize), // index into the current tab list
    Switch(usize),
    CloseUnknown,
}

/// Strategy for generating a sequence of tab operations.
fn arb_tab_ops() -> impl Strategy<Value = Vec<TabOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(TabOp::Add),
            3 => (0..20usize).prop_map(TabOp::Close),
            2 => (0..20usize).prop_map(TabOp::Switch),
            1 => Just(TabOp::CloseUnknown),
        ],
        1..80,
    )
}

fn pick(manager: &TabManager, idx: usize) -> String {
    let tabs = manager.get_all_tabs();
    tabs[idx % tabs.len()].id.clone()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exactly_one_active_tab(ops in arb_tab_ops()) {
        let mut manager = TabManager::new();
        let mut expected_count: usize = 1;

        for op in &ops {
            match op {
                TabOp::Add => {
                    let id = manager.add_tab();
                    expected_count += 1;
                    prop_assert_eq!(&manager.active_tab().id, &id);
                }
                TabOp::Close(idx) => {
                    let id = pick(&manager, *idx);
                    manager.close_tab(&id).unwrap();
                    if expected_count > 1 {
                        expected_count -= 1;
                    }
                    prop_assert!(manager.get_tab(&id).is_none());
                }
                TabOp::Switch(idx) => {
                    let id = pick(&manager, *idx);
                    manager.switch_tab(&id).unwrap();
                    prop_assert_eq!(&manager.active_tab().id, &id);
                }
                TabOp::CloseUnknown => {
                    prop_assert!(manager.close_tab("no-such-tab").is_err());
                }
            }

            let active = manager.get_all_tabs().iter().filter(|t| t.is_active).count();
            prop_assert_eq!(active, 1, "after {:?}", op);
            prop_assert_eq!(manager.tab_count(), expected_count, "after {:?}", op);
            prop_assert!(manager.tab_count() >= 1);
        }
    }

    #[test]
    fn closing_inactive_tab_keeps_active(extra in 1..10usize, victim in 0..20usize) {
        let mut manager = TabManager::new();
        for _ in 0..extra {
            manager.add_tab();
        }
        let active = manager.active_tab().id.clone();
        let candidates: Vec<String> = manager
            .get_all_tabs()
            .iter()
            .filter(|t| !t.is_active)
            .map(|t| t.id.clone())
            .collect();
        let target = &candidates[victim % candidates.len()];

        manager.close_tab(target).unwrap();
        prop_assert_eq!(&manager.active_tab().id, &active);
    }
}
