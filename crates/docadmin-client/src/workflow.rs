//! Per-workflow phase tracking.
//!
//! `Idle → Validating → Requesting → Idle`. A workflow that is not `Idle`
//! refuses to start again; there is no cancellation once `Requesting`.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{AdminError, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Requesting,
}

/// Phase of one workflow. Clones observe the same phase.
#[derive(Debug, Clone)]
pub struct Workflow {
    operation: Operation,
    phase: Arc<Mutex<Phase>>,
}

impl Workflow {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            phase: Arc::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move `Idle → Validating`, or fail with [`AdminError::Busy`].
    pub fn begin(&self) -> Result<InFlight, AdminError> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase != Phase::Idle {
            return Err(AdminError::Busy(self.operation));
        }
        *phase = Phase::Validating;
        Ok(InFlight {
            phase: Arc::clone(&self.phase),
        })
    }
}

/// Held while an operation runs; dropping it returns the workflow to `Idle`.
#[must_use = "dropping InFlight immediately ends the operation"]
#[derive(Debug)]
pub struct InFlight {
    phase: Arc<Mutex<Phase>>,
}

impl InFlight {
    /// Validation passed; the request is about to be sent.
    pub fn requesting(&self) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = Phase::Requesting;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_busy_until_released() {
        let wf = Workflow::new(Operation::Upload);
        assert_eq!(wf.phase(), Phase::Idle);

        let flight = wf.begin().unwrap();
        assert_eq!(wf.phase(), Phase::Validating);
        assert!(matches!(wf.begin(), Err(AdminError::Busy(Operation::Upload))));

        flight.requesting();
        assert_eq!(wf.clone().phase(), Phase::Requesting);
        assert!(wf.begin().is_err());

        drop(flight);
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.begin().is_ok());
    }

    #[test]
    fn workflows_are_independent() {
        let upload = Workflow::new(Operation::Upload);
        let reindex = Workflow::new(Operation::Reindex);
        let _busy = upload.begin().unwrap();
        assert!(reindex.begin().is_ok());
    }
}
