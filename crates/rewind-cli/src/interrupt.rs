use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use rewind_mirror::{MirrorConfig, MirrorError};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::messages::{Locale, Message};
use crate::render::TerminalRenderer;

const DISARMED: u8 = 0;
const ARMED: u8 = 1;
const WRITING: u8 = 2;
const RESTORING: u8 = 3;
const RESTORED: u8 = 4;

pub(crate) const INTERRUPTED_EXIT_CODE: i32 = 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum RestorePhase {
    Disarmed,
    Armed,
    Writing,
    Restoring,
    Restored,
}

#[derive(Debug)]
pub(crate) enum InterruptOutcome {
    Restored,
    NothingToRestore,
    RestoreFailed(MirrorError),
}

/// Rendezvous between the main sequence and the interrupt watcher. Only the
/// side that moves the phase from `Armed` to `Restoring` runs the restore, and
/// once that happens the main sequence can no longer write the mirrorlist.
#[derive(Debug)]
pub(crate) struct RestoreGuard {
    mirror: MirrorConfig,
    phase: AtomicU8,
}

impl RestoreGuard {
    pub(crate) fn new(mirror: MirrorConfig) -> Self {
        Self {
            mirror,
            phase: AtomicU8::new(DISARMED),
        }
    }

    pub(crate) fn mirror(&self) -> &MirrorConfig {
        &self.mirror
    }

    pub(crate) fn phase(&self) -> RestorePhase {
        match self.phase.load(Ordering::SeqCst) {
            DISARMED => RestorePhase::Disarmed,
            ARMED => RestorePhase::Armed,
            WRITING => RestorePhase::Writing,
            RESTORING => RestorePhase::Restoring,
            _ => RestorePhase::Restored,
        }
    }

    /// Called once the backup exists; from here on an interrupt restores.
    pub(crate) fn arm(&self) {
        self.phase.store(ARMED, Ordering::SeqCst);
    }

    /// Writes the snapshot mirror while holding off restores. Returns `None`
    /// when a restore already took over and the mirrorlist was left alone.
    pub(crate) fn write_snapshot(&self, location: &str) -> Result<Option<String>, MirrorError> {
        if self
            .phase
            .compare_exchange(ARMED, WRITING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(None);
        }

        let written = self.mirror.write(location);
        self.phase.store(ARMED, Ordering::SeqCst);
        written.map(Some)
    }

    pub(crate) fn restore_from_main(&self) -> Result<(), MirrorError> {
        if !self.try_restore()? {
            self.wait_while_restoring();
        }
        Ok(())
    }

    pub(crate) fn handle_interrupt(&self) -> InterruptOutcome {
        match self.try_restore() {
            Ok(true) => InterruptOutcome::Restored,
            Ok(false) => {
                self.wait_while_restoring();
                InterruptOutcome::NothingToRestore
            }
            Err(err) => InterruptOutcome::RestoreFailed(err),
        }
    }

    fn try_restore(&self) -> Result<bool, MirrorError> {
        loop {
            match self.phase.compare_exchange(
                ARMED,
                RESTORING,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                // an in-flight write finishes before the restore starts
                Err(WRITING) => thread::sleep(Duration::from_millis(10)),
                Err(_) => return Ok(false),
            }
        }

        match self.mirror.restore() {
            Ok(()) => {
                self.phase.store(RESTORED, Ordering::SeqCst);
                Ok(true)
            }
            Err(err) => {
                // back to armed so a later attempt can retry
                self.phase.store(ARMED, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    pub(crate) fn wait_while_restoring(&self) {
        while self.phase.load(Ordering::SeqCst) == RESTORING {
            thread::sleep(Duration::from_millis(10));
        }
    }
}

pub(crate) fn spawn_interrupt_watcher(guard: Arc<RestoreGuard>, locale: Locale) -> Result<()> {
    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to register signal handlers")?;
    thread::Builder::new()
        .name("interrupt-watcher".to_string())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::warn!(signal, "received termination signal");
                report_interrupt(&guard, locale);
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
        .context("failed to spawn interrupt watcher")?;
    Ok(())
}

pub(crate) fn report_interrupt(guard: &RestoreGuard, locale: Locale) -> InterruptOutcome {
    let renderer = TerminalRenderer::current();
    let armed = matches!(guard.phase(), RestorePhase::Armed | RestorePhase::Writing);
    if armed {
        println!();
        renderer.print_status("warn", locale.text(Message::RestoringOnExit));
    }

    let outcome = guard.handle_interrupt();
    match &outcome {
        InterruptOutcome::Restored => {
            renderer.print_status("ok", locale.text(Message::Restored));
        }
        InterruptOutcome::NothingToRestore => {
            if !armed {
                println!();
                renderer.print_status("warn", locale.text(Message::Cancelled));
            }
        }
        InterruptOutcome::RestoreFailed(err) => {
            renderer.print_error(&format!("failed to restore mirrorlist: {err}"));
        }
    }
    outcome
}
