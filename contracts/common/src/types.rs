use soroban_sdk::{contracttype, Address, BytesN, String};

/// Authorization class of an identity.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Doctor,
    Pharmacy,
    Logistics,
    Patient,
    Admin,
}

/// What a ledger demands of the acting identity.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoleRequirement {
    /// The identity must hold exactly this role.
    Exactly(Role),
    /// Any identity with a roster entry qualifies.
    AnyRegistered,
}

impl RoleRequirement {
    pub fn is_met_by(&self, role: Role) -> bool {
        match self {
            RoleRequirement::Exactly(required) => *required == role,
            RoleRequirement::AnyRegistered => true,
        }
    }
}

/// One roster entry. `access_id` is an external credential label and never
/// takes part in authorization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessEntry {
    pub identity: Address,
    pub role: Role,
    pub access_id: String,
}

/// Lifecycle stage of a prescription, in strict forward order.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PrescriptionStatus {
    Created = 0,
    Dispensed = 1,
    DeliveryAccepted = 2,
    LogisticsReceived = 3,
    LogisticsAccepted = 4,
    Delivered = 5,
}

impl PrescriptionStatus {
    /// The single legal next stage, `None` once delivered.
    pub fn successor(&self) -> Option<PrescriptionStatus> {
        match self {
            PrescriptionStatus::Created => Some(PrescriptionStatus::Dispensed),
            PrescriptionStatus::Dispensed => Some(PrescriptionStatus::DeliveryAccepted),
            PrescriptionStatus::DeliveryAccepted => Some(PrescriptionStatus::LogisticsReceived),
            PrescriptionStatus::LogisticsReceived => Some(PrescriptionStatus::LogisticsAccepted),
            PrescriptionStatus::LogisticsAccepted => Some(PrescriptionStatus::Delivered),
            PrescriptionStatus::Delivered => None,
        }
    }

    pub fn predecessor(&self) -> Option<PrescriptionStatus> {
        match self {
            PrescriptionStatus::Created => None,
            PrescriptionStatus::Dispensed => Some(PrescriptionStatus::Created),
            PrescriptionStatus::DeliveryAccepted => Some(PrescriptionStatus::Dispensed),
            PrescriptionStatus::LogisticsReceived => Some(PrescriptionStatus::DeliveryAccepted),
            PrescriptionStatus::LogisticsAccepted => Some(PrescriptionStatus::LogisticsReceived),
            PrescriptionStatus::Delivered => Some(PrescriptionStatus::LogisticsAccepted),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.successor().is_none()
    }

    /// Position in the lifecycle; equals the number of completed transitions.
    pub fn ordinal(&self) -> u32 {
        *self as u32
    }
}

/// Canonical prescription state, owned by the registry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prescription {
    pub id: u64,
    pub doctor: Address,
    pub patient: Address,
    pub payload: String,
    pub created_at: u64,
    pub updated_at: u64,
    pub status: PrescriptionStatus,
}

/// Record kept by the dispense, delivery-accept, logistics-accept and
/// confirmation ledgers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageRecord {
    pub record_id: u64,
    pub prescription_id: u64,
    pub actor: Address,
    pub recorded_at: u64,
}

/// Logistics receipt, linked to the delivery-accept record it follows.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiveRecord {
    pub record_id: u64,
    pub prescription_id: u64,
    pub actor: Address,
    pub delivery_accept_ref: u64,
    pub recorded_at: u64,
}

/// One link of a prescription's hash-chained transition history.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransitionRecord {
    pub prescription_id: u64,
    pub from: PrescriptionStatus,
    pub to: PrescriptionStatus,
    pub actor: Address,
    pub ledger: Address,
    pub timestamp: u64,
    pub prev_hash: BytesN<32>,
    pub transition_hash: BytesN<32>,
}
