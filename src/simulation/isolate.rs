//! Failure isolation at aggregator boundaries

use crate::core::error::{Result, SimError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run one unit's tick logic, turning a panic into `UnitProcessing`
///
/// The closure's own `Err` passes through untouched. A unit that panics
/// mid-update keeps whatever state it had reached.
pub(crate) fn isolate<T>(unit: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(SimError::UnitProcessing {
            unit: unit.to_string(),
            reason: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
