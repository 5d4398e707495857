use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

pub const UPDATE_PROMPT_TITLE: &str = "BlockTheSpot Update Available";
pub const UPDATE_PROMPT_BODY: &str =
    "A new version of BlockTheSpot is available. Do you want to update?";

/// Synchronous yes/no question to the user.
#[cfg_attr(test, mockall::automock)]
pub trait UpdatePrompt: Send + Sync {
    fn confirm(&self, title: &str, body: &str) -> bool;
}

/// Native message box.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogPrompt;

impl UpdatePrompt for DialogPrompt {
    fn confirm(&self, title: &str, body: &str) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(body)
            .set_buttons(MessageButtons::YesNo)
            .show();

        matches!(answer, MessageDialogResult::Yes)
    }
}

/// Installs a new application release once the user accepts.
#[cfg_attr(test, mockall::automock)]
pub trait UpdateInstaller: Send + Sync {
    fn install(&self);
}

/// Records the request only. Downloading and replacing files is not
/// implemented.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInstaller;

impl UpdateInstaller for LoggingInstaller {
    fn install(&self) {
        tracing::info!("Update requested by user. Automatic installation is not available.");
    }
}
