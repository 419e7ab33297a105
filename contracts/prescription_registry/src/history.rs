//! Hash-chained transition history, one chain per prescription.
//!
//! Each [`TransitionRecord`] commits to the previous link's hash, so any
//! rewritten or dropped link is caught by [`verify`]. The first link chains
//! from 32 zero bytes.

use common::stage::{TTL_EXTEND_TO, TTL_THRESHOLD};
use common::{PrescriptionStatus, TransitionRecord};
use soroban_sdk::{symbol_short, xdr::ToXdr, Address, Bytes, BytesN, Env, Symbol, Vec};

const HIST: Symbol = symbol_short!("RX_HIST");
const LAST: Symbol = symbol_short!("RX_LAST");

fn history_key(prescription_id: u64) -> (Symbol, u64) {
    (HIST, prescription_id)
}

fn last_hash_key(prescription_id: u64) -> (Symbol, u64) {
    (LAST, prescription_id)
}

fn genesis(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0u8; 32])
}

#[allow(clippy::too_many_arguments)]
fn hash_transition(
    env: &Env,
    prescription_id: u64,
    from: PrescriptionStatus,
    to: PrescriptionStatus,
    actor: &Address,
    ledger: &Address,
    timestamp: u64,
    prev_hash: &BytesN<32>,
) -> BytesN<32> {
    let mut payload = Bytes::new(env);
    payload.append(&Bytes::from_slice(env, &prescription_id.to_be_bytes()));
    payload.append(&Bytes::from_slice(env, &timestamp.to_be_bytes()));
    payload.append(&Bytes::from_slice(env, &from.ordinal().to_be_bytes()));
    payload.append(&Bytes::from_slice(env, &to.ordinal().to_be_bytes()));
    payload.append(&actor.clone().to_xdr(env));
    payload.append(&ledger.clone().to_xdr(env));
    payload.append(&Bytes::from_slice(env, &prev_hash.to_array()));
    env.crypto().sha256(&payload).into()
}

pub fn get(env: &Env, prescription_id: u64) -> Vec<TransitionRecord> {
    env.storage()
        .persistent()
        .get(&history_key(prescription_id))
        .unwrap_or(Vec::new(env))
}

/// Appends a link for `from → to` and returns it.
pub fn append(
    env: &Env,
    prescription_id: u64,
    from: PrescriptionStatus,
    to: PrescriptionStatus,
    actor: &Address,
    ledger: &Address,
) -> TransitionRecord {
    let prev_key = last_hash_key(prescription_id);
    let prev_hash: BytesN<32> = env
        .storage()
        .persistent()
        .get(&prev_key)
        .unwrap_or(genesis(env));

    let timestamp = env.ledger().timestamp();
    let transition_hash = hash_transition(
        env,
        prescription_id,
        from,
        to,
        actor,
        ledger,
        timestamp,
        &prev_hash,
    );

    let record = TransitionRecord {
        prescription_id,
        from,
        to,
        actor: actor.clone(),
        ledger: ledger.clone(),
        timestamp,
        prev_hash,
        transition_hash: transition_hash.clone(),
    };

    let key = history_key(prescription_id);
    let mut links = get(env, prescription_id);
    links.push_back(record.clone());
    env.storage().persistent().set(&key, &links);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    env.storage().persistent().set(&prev_key, &transition_hash);
    env.storage()
        .persistent()
        .extend_ttl(&prev_key, TTL_THRESHOLD, TTL_EXTEND_TO);

    record
}

/// Recomputes every link and checks it chains from genesis and moves the
/// status forward one stage at a time.
pub fn verify(env: &Env, prescription_id: u64) -> bool {
    let mut expected_prev = genesis(env);
    let mut expected_from = PrescriptionStatus::Created;

    for link in get(env, prescription_id).iter() {
        if link.prescription_id != prescription_id
            || link.prev_hash != expected_prev
            || link.from != expected_from
            || link.from.successor() != Some(link.to)
        {
            return false;
        }
        let recomputed = hash_transition(
            env,
            prescription_id,
            link.from,
            link.to,
            &link.actor,
            &link.ledger,
            link.timestamp,
            &link.prev_hash,
        );
        if recomputed != link.transition_hash {
            return false;
        }
        expected_prev = link.transition_hash;
        expected_from = link.to;
    }
    true
}
