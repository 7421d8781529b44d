use std::sync::Arc;

use anyhow::{anyhow, Result};
use rewind_archive::{
    ArchiveError, ArchiveTransport, AvailabilityChecker, AvailabilityReport, Chooser,
    DirectoryLister, NavigationOutcome, OptionalRepoStatus, SnapshotNavigator,
};
use rewind_core::{SnapshotLocation, SnapshotSelection};
use rewind_mirror::mirror_server_line;

use crate::interrupt::{RestoreGuard, RestorePhase};
use crate::messages::{Locale, Message};
use crate::prompt::Confirm;
use crate::render::TerminalRenderer;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum RunState {
    Idle,
    Confirmed,
    DateSelected,
    Validated,
    BackedUp,
    MirrorWritten,
    Updated,
    Restored,
    Done,
}

impl RunState {
    pub(crate) fn has_mutated(self) -> bool {
        matches!(
            self,
            Self::BackedUp | Self::MirrorWritten | Self::Updated | Self::Restored | Self::Done
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    Completed {
        selection: SnapshotSelection,
        location: SnapshotLocation,
    },
    DryRun {
        location: SnapshotLocation,
        server_line: String,
    },
    Declined,
    Cancelled,
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct SessionOptions {
    pub(crate) assume_yes: bool,
    pub(crate) dry_run: bool,
}

/// One attended rollback: pick a date, validate it, swap the mirrorlist,
/// update, and put the original mirrorlist back.
pub(crate) struct RollbackSession<L, T, U> {
    navigator: SnapshotNavigator<L>,
    checker: AvailabilityChecker<T>,
    guard: Arc<RestoreGuard>,
    update: U,
    options: SessionOptions,
    locale: Locale,
    renderer: TerminalRenderer,
    state: RunState,
}

impl<L, T, U> RollbackSession<L, T, U>
where
    L: DirectoryLister,
    T: ArchiveTransport,
    U: FnMut() -> Result<()>,
{
    pub(crate) fn new(
        navigator: SnapshotNavigator<L>,
        checker: AvailabilityChecker<T>,
        guard: Arc<RestoreGuard>,
        update: U,
        options: SessionOptions,
        locale: Locale,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            navigator,
            checker,
            guard,
            update,
            options,
            locale,
            renderer,
            state: RunState::Idle,
        }
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn run<P: Chooser + Confirm>(&mut self, prompt: &mut P) -> Result<RunOutcome> {
        self.transition(RunState::Idle);
        if !self.options.assume_yes {
            self.renderer
                .print_status("warn", self.locale.text(Message::Warning));
            if !prompt.confirm(self.locale.text(Message::Continue)) {
                self.renderer
                    .print_status("step", self.locale.text(Message::Cancelled));
                return Ok(RunOutcome::Declined);
            }
        }
        self.transition(RunState::Confirmed);

        let (navigation, report) = loop {
            match self.select_and_validate(prompt) {
                Ok(validated) => break validated,
                Err(err) if err.is_cancellation() => {
                    self.transition(RunState::Idle);
                    self.renderer.print_status("warn", &err.to_string());
                    return Ok(RunOutcome::Cancelled);
                }
                Err(err) if err.is_reselectable() => {
                    self.transition(RunState::Idle);
                    self.renderer.print_error(&err.to_string());
                    self.renderer
                        .print_status("warn", self.locale.text(Message::SelectDifferentDate));
                    if !prompt.confirm(self.locale.text(Message::ChooseAnotherDate)) {
                        return Err(err.into());
                    }
                }
                Err(err) => return Err(err.into()),
            }
        };
        self.print_optional_repos(&report);

        let NavigationOutcome {
            selection,
            location,
        } = navigation;

        if self.options.dry_run {
            let server_line = mirror_server_line(location.as_str());
            self.renderer
                .print_status("ok", self.locale.text(Message::DryRun));
            println!("{server_line}");
            return Ok(RunOutcome::DryRun {
                location,
                server_line,
            });
        }

        self.renderer
            .print_status("step", self.locale.text(Message::BackingUp));
        self.guard.mirror().backup()?;
        self.guard.arm();
        self.transition(RunState::BackedUp);

        self.renderer
            .print_status("step", self.locale.text(Message::WritingMirrorlist));
        match self.guard.write_snapshot(location.as_str()) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(self.interrupted()),
            Err(err) => return Err(self.restore_after_failure(err.into())),
        }
        self.transition(RunState::MirrorWritten);

        if self.guard.phase() != RestorePhase::Armed {
            return Err(self.interrupted());
        }
        self.renderer
            .print_status("step", self.locale.text(Message::Updating));
        if let Err(err) = (self.update)() {
            return Err(self.restore_after_failure(err));
        }
        self.transition(RunState::Updated);

        self.renderer
            .print_status("step", self.locale.text(Message::Restoring));
        self.guard.restore_from_main()?;
        self.transition(RunState::Restored);
        self.transition(RunState::Done);
        self.renderer
            .print_status("ok", self.locale.text(Message::Success));

        Ok(RunOutcome::Completed {
            selection,
            location,
        })
    }

    fn select_and_validate<P: Chooser>(
        &mut self,
        prompt: &mut P,
    ) -> Result<(NavigationOutcome, AvailabilityReport), ArchiveError> {
        self.renderer
            .print_status("step", self.locale.text(Message::SelectingDate));
        let navigation = self.navigator.navigate(prompt)?;
        self.transition(RunState::DateSelected);
        self.renderer.print_status(
            "step",
            &format!(
                "{} {}",
                self.locale.text(Message::SelectedUrl),
                navigation.location
            ),
        );

        let spinner = self
            .renderer
            .start_spinner(self.locale.text(Message::CheckingAvailability));
        let checked = self.checker.check(&navigation.location);
        spinner.finish();
        let report = checked?;
        self.transition(RunState::Validated);
        Ok((navigation, report))
    }

    fn print_optional_repos(&self, report: &AvailabilityReport) {
        for (repo, status) in &report.optional {
            if *status != OptionalRepoStatus::Present {
                self.renderer.print_status(
                    "warn",
                    &format!("{} {repo}", self.locale.text(Message::OptionalMissing)),
                );
            }
        }
    }

    fn interrupted(&mut self) -> anyhow::Error {
        self.guard.wait_while_restoring();
        self.transition(RunState::Restored);
        anyhow!(
            "interrupted; mirrorlist restored from {}",
            self.guard.mirror().backup_path().display()
        )
    }

    fn restore_after_failure(&mut self, err: anyhow::Error) -> anyhow::Error {
        self.renderer
            .print_status("warn", self.locale.text(Message::RestoringAfterFailure));
        match self.guard.restore_from_main() {
            Ok(()) => {
                self.transition(RunState::Restored);
                self.renderer
                    .print_status("ok", self.locale.text(Message::Restored));
                err
            }
            Err(restore_err) => anyhow!(
                "{err:#}; failed restoring mirrorlist from {}: {restore_err}",
                self.guard.mirror().backup_path().display()
            ),
        }
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }
}
