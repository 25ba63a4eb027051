//! Startup initialization state machine.
//!
//! ```text
//! Uninitialized ──Begin──► Initializing ──Resolved──► Initialized
//! ```
//!
//! A provider runs startup resolution exactly once. Any input other than the
//! two above is rejected by the machine, which is how a second call to
//! `initialize` is detected.

use rust_fsm::*;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub init_machine(Uninitialized)

    Uninitialized => {
        Begin => Initializing
    },
    Initializing => {
        Resolved => Initialized
    }
}

pub use init_machine::Input as InitInput;
pub use init_machine::State as InitState;
pub use init_machine::StateMachine as InitMachine;
