//! Local fixpoint — within-module contagion settling.

use recheck_core::FxHashSet;

use super::handlers::HandlerStore;

/// Repeatedly reclassify not-yet-broken definitions against the broken
/// set until a full pass changes nothing.
///
/// The promotion criterion is deliberately "found a referenced broken
/// name," not "a check actually flipped a flag": a definition whose
/// only match is a body reference to a broken-but-uninfected handler is
/// still moved to the broken list. This over-promotion is inherited
/// behavior and covered by a dedicated test.
///
/// Terminates because each pass strictly shrinks `not_brokens` or
/// leaves it unchanged. Worst case quadratic in the module's
/// definition count.
pub fn resolve_local_fixpoint(
    store: &mut HandlerStore,
    brokens: &mut Vec<usize>,
    not_brokens: &mut Vec<usize>,
) {
    if brokens.is_empty() || not_brokens.is_empty() {
        return;
    }

    let mut broken_names: FxHashSet<String> =
        brokens.iter().map(|&slot| store.handler(slot).name().to_string()).collect();
    let mut moved: FxHashSet<usize> = FxHashSet::default();

    let mut changed = true;
    while changed {
        changed = false;

        let pending: Vec<usize> = not_brokens.iter().copied().collect();
        for slot in pending {
            if moved.contains(&slot) {
                continue;
            }

            // Contagious references are searched first; only if none
            // matches does the body reference set get a turn.
            let found = {
                let state = store.handler(slot).state();
                state
                    .contagious_refs
                    .iter()
                    .find(|name| broken_names.contains(*name))
                    .or_else(|| {
                        state
                            .non_contagious_refs
                            .iter()
                            .find(|name| broken_names.contains(*name))
                    })
                    .cloned()
            };

            let Some(broken_name) = found else {
                continue;
            };
            let Some(broken_slot) = store.slot_of(&broken_name) else {
                continue;
            };

            let (handler, broken) = store.pair_mut(slot, broken_slot);
            let upstream = broken.state().snapshot();
            handler.check_against(&upstream);

            // Moved regardless of whether a flag flipped.
            moved.insert(slot);
            broken_names.insert(store.handler(slot).name().to_string());
            brokens.push(slot);
            changed = true;
        }

        if changed {
            not_brokens.retain(|slot| !moved.contains(slot));
        }
    }
}
