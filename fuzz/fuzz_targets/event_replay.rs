#![no_main]

use arbitrary::Arbitrary;
use common::{apply, reconstruct, LifecycleEvent, LifecycleEventKind, PrescriptionStatus};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{Env, Vec as SorobanVec};

const KINDS: [LifecycleEventKind; 6] = [
    LifecycleEventKind::Created,
    LifecycleEventKind::Dispensed,
    LifecycleEventKind::DeliveryAccepted,
    LifecycleEventKind::LogisticsReceived,
    LifecycleEventKind::LogisticsAccepted,
    LifecycleEventKind::DeliveryConfirmed,
];

/// One raw log entry. Ids are squeezed into a small range so lifecycles
/// collide and interleave.
#[derive(Arbitrary, Debug)]
pub struct RawEvent {
    id: u8,
    kind: u8,
}

fuzz_target!(|raw: Vec<RawEvent>| {
    let env = Env::default();

    let mut log = SorobanVec::new(&env);
    for entry in raw.iter().take(256) {
        log.push_back(LifecycleEvent {
            prescription_id: (entry.id % 8) as u64,
            kind: KINDS[entry.kind as usize % KINDS.len()],
        });
    }

    // Fold step by step alongside the library, stopping where it must stop.
    let mut expected: std::collections::BTreeMap<u64, PrescriptionStatus> = Default::default();
    let mut first_error = None;
    for event in log.iter() {
        match apply(expected.get(&event.prescription_id).copied(), event.kind) {
            Ok(next) => {
                if let Some(previous) = expected.get(&event.prescription_id) {
                    assert_eq!(
                        previous.successor(),
                        Some(next),
                        "INVARIANT VIOLATION: replay skipped a stage"
                    );
                }
                expected.insert(event.prescription_id, next);
            }
            Err(error) => {
                first_error = Some(error);
                break;
            }
        }
    }

    match (reconstruct(&env, &log), first_error) {
        (Ok(statuses), None) => {
            assert_eq!(statuses.len() as usize, expected.len());
            for (id, status) in expected {
                assert_eq!(statuses.get(id), Some(status));
            }
        }
        (Err(got), Some(want)) => assert_eq!(got, want),
        (got, want) => panic!("INVARIANT VIOLATION: reconstruct {:?} vs step fold {:?}", got, want),
    }
});
