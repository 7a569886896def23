//! Process exit codes and failure severity.

/// Exit status reported by the binary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// The DataVolume was created (and, when requested, imported).
    pub const SUCCESS: Self = Self(0);
    /// Command-line input was missing or malformed. Reported as 255 on Unix.
    pub const INVALID_CLI_INPUT: Self = Self(-1);
    /// The creator could not be initialised.
    pub const CREATOR_INIT: Self = Self(1);
    /// Creating or waiting for the DataVolume failed.
    pub const CREATE_DATA_VOLUME: Self = Self(3);
    /// Result files could not be written.
    pub const WRITE_RESULTS: Self = Self(4);

    /// Returns the raw code passed to [`std::process::exit`].
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }
}

/// How a failure is reported before the process exits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Expected failure; only the message is printed.
    Soft,
    /// Unexpected failure; an error event with the source chain is logged
    /// as well.
    Fatal,
}

impl Severity {
    /// Returns whether the failure is fatal.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Fatal)
    }
}
