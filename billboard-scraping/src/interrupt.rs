use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::warn;

/// Exit status used when the user aborts with Ctrl-C.
pub const EXIT_CODE: i32 = 130;

#[derive(Debug, thiserror::Error)]
#[error("Interrupted by user")]
pub struct Interrupted;

/// Raised by Ctrl-C and polled by the long-running loops.
#[derive(Clone, Default, Debug)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Installs the process-wide Ctrl-C handler.  A second Ctrl-C exits at once.
    pub fn install() -> anyhow::Result<Self> {
        let interrupt = Self::default();
        let flag = Arc::clone(&interrupt.0);
        ctrlc::set_handler(move || {
            if flag.swap(true, Ordering::SeqCst) {
                std::process::exit(EXIT_CODE);
            }
            warn!("Interrupted; aborting.  Press Ctrl-C again to exit immediately.");
        })?;
        Ok(interrupt)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_raised() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}
