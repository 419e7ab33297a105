use soroban_sdk::{log, Env};

use crate::LedgerError;

/// Collapses the nested result of a generated `try_*` client call.
///
/// A `LedgerError` raised by the callee is passed through untouched. A value
/// that fails to decode, or a callee that aborted, is an integrity fault: the
/// wiring points at something that does not honour the interface.
pub fn lift<T, C, I>(
    env: &Env,
    outcome: Result<Result<T, C>, Result<LedgerError, I>>,
) -> Result<T, LedgerError> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(err),
        Ok(Err(_)) => {
            log!(env, "integrity fault: wired contract returned an undecodable value");
            Err(LedgerError::IntegrityFault)
        }
        Err(Err(_)) => {
            log!(env, "integrity fault: wired contract aborted");
            Err(LedgerError::IntegrityFault)
        }
    }
}
