use std::process::ExitCode;

/// Outcome of a command: an exit status and an optional message for stderr.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Exit {
    success: bool,
    message: Option<String>,
}

impl Exit {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn error() -> Self {
        Self {
            success: false,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Print the message, if any, and convert into a process exit code.
    pub fn report(self) -> ExitCode {
        if let Some(message) = &self.message {
            eprintln!("{message}");
        }
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}
