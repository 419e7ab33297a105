//! Rebuilds prescription statuses from the lifecycle event stream.
//!
//! Each custody contract publishes one event per successful write under the
//! topic symbol returned by [`LifecycleEventKind::topic`]. A listener that
//! feeds those events, in ledger order, through [`reconstruct`] arrives at the
//! same status the registry holds for every prescription.

use soroban_sdk::{contracttype, symbol_short, Env, Map, Symbol, Vec};

use crate::{LedgerError, PrescriptionStatus};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleEventKind {
    Created,
    Dispensed,
    DeliveryAccepted,
    LogisticsReceived,
    LogisticsAccepted,
    DeliveryConfirmed,
}

impl LifecycleEventKind {
    pub fn topic(&self) -> Symbol {
        match self {
            LifecycleEventKind::Created => symbol_short!("RX_NEW"),
            LifecycleEventKind::Dispensed => symbol_short!("RX_DISP"),
            LifecycleEventKind::DeliveryAccepted => symbol_short!("RX_DACC"),
            LifecycleEventKind::LogisticsReceived => symbol_short!("RX_LRCV"),
            LifecycleEventKind::LogisticsAccepted => symbol_short!("RX_LACC"),
            LifecycleEventKind::DeliveryConfirmed => symbol_short!("RX_DONE"),
        }
    }

    pub fn from_topic(topic: &Symbol) -> Option<LifecycleEventKind> {
        [
            LifecycleEventKind::Created,
            LifecycleEventKind::Dispensed,
            LifecycleEventKind::DeliveryAccepted,
            LifecycleEventKind::LogisticsReceived,
            LifecycleEventKind::LogisticsAccepted,
            LifecycleEventKind::DeliveryConfirmed,
        ]
        .into_iter()
        .find(|kind| kind.topic() == *topic)
    }

    /// Status a prescription holds right after this event.
    pub fn resulting_status(&self) -> PrescriptionStatus {
        match self {
            LifecycleEventKind::Created => PrescriptionStatus::Created,
            LifecycleEventKind::Dispensed => PrescriptionStatus::Dispensed,
            LifecycleEventKind::DeliveryAccepted => PrescriptionStatus::DeliveryAccepted,
            LifecycleEventKind::LogisticsReceived => PrescriptionStatus::LogisticsReceived,
            LifecycleEventKind::LogisticsAccepted => PrescriptionStatus::LogisticsAccepted,
            LifecycleEventKind::DeliveryConfirmed => PrescriptionStatus::Delivered,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LifecycleEvent {
    pub prescription_id: u64,
    pub kind: LifecycleEventKind,
}

/// Applies one event to the status a listener currently holds.
pub fn apply(
    current: Option<PrescriptionStatus>,
    kind: LifecycleEventKind,
) -> Result<PrescriptionStatus, LedgerError> {
    match (current, kind) {
        (None, LifecycleEventKind::Created) => Ok(PrescriptionStatus::Created),
        (Some(_), LifecycleEventKind::Created) => Err(LedgerError::InvalidTransition),
        (None, _) => Err(LedgerError::NotFound),
        (Some(status), kind) => {
            let next = kind.resulting_status();
            if status.successor() == Some(next) {
                Ok(next)
            } else {
                Err(LedgerError::InvalidTransition)
            }
        }
    }
}

/// Folds an ordered event log into the status of every prescription seen.
pub fn reconstruct(
    env: &Env,
    events: &Vec<LifecycleEvent>,
) -> Result<Map<u64, PrescriptionStatus>, LedgerError> {
    let mut statuses: Map<u64, PrescriptionStatus> = Map::new(env);
    for event in events.iter() {
        let next = apply(statuses.get(event.prescription_id), event.kind)?;
        statuses.set(event.prescription_id, next);
    }
    Ok(statuses)
}
