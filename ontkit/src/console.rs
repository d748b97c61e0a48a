//! Delivery of rendered commands to the technician.
//!
//! A [`Console`] renders an [`OntCommand`] against its [`NetworkProfile`],
//! writes the text to a [`Clipboard`] and reports the outcome through a
//! [`Notifier`].

use log::{debug, warn};

use crate::audit::notify::{LogNotifier, Notifier};
use crate::command::NetworkProfile;
use crate::error::{ClipboardError, CommandError, Result};

/// Trait for clipboard backends.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> std::result::Result<(), ClipboardError>;
}

/// Clipboard kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    writes: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, if anything was written.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> std::result::Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// A command that renders to text for the OLT.
pub trait OntCommand {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Validate the request and render it.
    fn render(&self, profile: &NetworkProfile) -> std::result::Result<String, CommandError>;
}

/// Renders commands and hands them to the clipboard.
#[derive(Debug)]
pub struct Console<C: Clipboard, N: Notifier = LogNotifier> {
    clipboard: C,
    notifier: N,
    profile: NetworkProfile,
}

impl<C: Clipboard, N: Notifier> Console<C, N> {
    /// Create a console using the built-in network profile.
    pub fn new(clipboard: C, notifier: N) -> Self {
        Self {
            clipboard,
            notifier,
            profile: NetworkProfile::default(),
        }
    }

    /// Use a different network profile.
    pub fn with_profile(mut self, profile: NetworkProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Render `command`, copy it and notify.
    ///
    /// Validation and clipboard failures are shown through the notifier and
    /// returned; the clipboard is left untouched when validation fails.
    pub fn issue(&mut self, command: &dyn OntCommand) -> Result<String> {
        let text = match command.render(&self.profile) {
            Ok(text) => text,
            Err(err) => {
                warn!("{} rejected: {}", command.name(), err);
                self.notifier.show_error(&err.to_string());
                return Err(err.into());
            }
        };

        if let Err(err) = self.clipboard.write_text(&text) {
            warn!("{}: {}", command.name(), err);
            self.notifier.show_error(&err.to_string());
            return Err(err.into());
        }

        debug!("{} copied ({} lines)", command.name(), text.lines().count());
        self.notifier.show_success(Some("Command copied to the clipboard"));
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::notify::{Notification, RecordingNotifier};
    use crate::command::{BridgeCheck, BridgePort, OntPosition, WebPasswordChange};
    use crate::error::Error;

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> std::result::Result<(), ClipboardError> {
            Err(ClipboardError::WriteFailed {
                message: "no display".to_string(),
            })
        }
    }

    #[test]
    fn test_issue_copies_and_notifies() {
        let mut console = Console::new(MemoryClipboard::new(), RecordingNotifier::new());
        let port = BridgePort::new(OntPosition::new(1, 2, 3), 1, 1).unwrap();

        let text = console.issue(&BridgeCheck::Mac(port)).unwrap();
        assert_eq!(text, "show vlan bridge-port-fdb 1/1/1/2/3/1/1");
        assert_eq!(console.clipboard().contents(), Some(text.as_str()));
        assert_eq!(
            console.notifier().last(),
            Some(&Notification::Success(Some(
                "Command copied to the clipboard".to_string()
            )))
        );
    }

    #[test]
    fn test_invalid_command_leaves_clipboard_alone() {
        let mut console = Console::new(MemoryClipboard::new(), RecordingNotifier::new());
        let err = console
            .issue(&WebPasswordChange::new(OntPosition::new(1, 1, 1), "ALCL"))
            .unwrap_err();

        assert!(matches!(err, Error::Command(CommandError::InvalidSerial { length: 4 })));
        assert_eq!(console.clipboard().writes(), 0);
        assert_eq!(
            console.notifier().errors().collect::<Vec<_>>(),
            vec!["ALCL serial must have exactly 12 characters, got 4"]
        );
    }

    #[test]
    fn test_clipboard_failure_is_reported() {
        let mut console = Console::new(BrokenClipboard, RecordingNotifier::new());
        let port = BridgePort::new(OntPosition::new(1, 2, 3), 1, 1).unwrap();

        let err = console.issue(&BridgeCheck::Vlan(port)).unwrap_err();
        assert!(matches!(err, Error::Clipboard(_)));
        assert_eq!(console.notifier().errors().count(), 1);
    }

    #[test]
    fn test_profile_is_used() {
        let profile = NetworkProfile::default().with_upstream_profile("HSI_300M_UP");
        let mut console =
            Console::new(MemoryClipboard::new(), RecordingNotifier::new()).with_profile(profile);
        assert_eq!(console.profile().upstream_profile, "HSI_300M_UP");

        let line = crate::command::PhoneLine::new(
            OntPosition::new(1, 1, 1),
            "1",
            "100",
            secrecy::SecretString::from("pw"),
        );
        let text = console.issue(&line).unwrap();
        assert!(text.starts_with("SET-QOS-USQUEUE::ONTL2UNIQ-1-1-1-1-1-14-1-5::::USBWPROFNAME=HSI_300M_UP;"));
    }
}
