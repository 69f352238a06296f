use std::{io, sync::{Arc, atomic::{AtomicBool, Ordering}}};

use log::info;
use signal_hook::{consts, flag};

/// Set from a signal handler when the process is asked to terminate.
///
/// The game loop polls it once per tick and returns normally, so the terminal
/// guard is dropped on the way out. A second signal of the same kind, while the
/// flag is already set, exits straight away with status 1.
#[derive(Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self) -> io::Result<()> {
        for &sig in terminating_signals() {
            flag::register_conditional_shutdown(sig, 1, Arc::clone(&self.requested))?;
            flag::register(sig, Arc::clone(&self.requested))?;
        }

        info!("Handlers installed for signals {:?}", terminating_signals());
        Ok(())
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(unix)]
fn terminating_signals() -> &'static [i32] {
    &[consts::SIGTERM, consts::SIGINT, consts::SIGQUIT, consts::SIGHUP]
}

#[cfg(not(unix))]
fn terminating_signals() -> &'static [i32] {
    consts::TERM_SIGNALS
}
