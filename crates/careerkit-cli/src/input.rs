//! Parses stdin lines into commands.

use anyhow::{anyhow, bail, Context};
use careerkit_core::{FileDescriptor, ToastId};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A blank line; does nothing.
    Empty,
    /// Plain text: sent as a chat message.
    Chat(String),
    /// `/file NAME SIZE MIME`: a resume upload.
    Upload(FileDescriptor),
    /// `/report`: print the security report as JSON.
    Report,
    /// `/toasts`: list active toasts.
    Toasts,
    /// `/dismiss ID`
    Dismiss(ToastId),
    /// `/clear`: dismiss every toast.
    Clear,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  <text>                 send a chat message
  /file NAME SIZE MIME   upload a resume
  /report                print the security report
  /toasts                list active toasts
  /dismiss ID            dismiss a toast
  /clear                 dismiss all toasts
  /help                  show this help
  /quit                  exit";

/// Parses a line. Leading and trailing whitespace is ignored.
pub fn parse(line: &str) -> anyhow::Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("file", [file_name, size, mime]) => {
            let size = size
                .parse::<u64>()
                .with_context(|| format!("invalid size {size:?}"))?;
            Ok(Command::Upload(FileDescriptor::new(*file_name, size, *mime)))
        }
        ("file", _) => bail!("usage: /file NAME SIZE MIME"),
        ("dismiss", [id]) => {
            let id = id
                .parse::<u64>()
                .map_err(|_| anyhow!("invalid toast id {id:?}"))?;
            Ok(Command::Dismiss(ToastId(id)))
        }
        ("dismiss", _) => bail!("usage: /dismiss ID"),
        ("report", []) => Ok(Command::Report),
        ("toasts", []) => Ok(Command::Toasts),
        ("clear", []) => Ok(Command::Clear),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", _) => Ok(Command::Quit),
        _ => bail!("unknown command /{name} (try /help)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse("  hello  ").unwrap(), Command::Chat("hello".to_string()));
    }

    #[test]
    fn blank_line_is_not_chat() {
        assert_eq!(parse("").unwrap(), Command::Empty);
        assert_eq!(parse("   \t").unwrap(), Command::Empty);
    }

    #[test]
    fn file_command_parses_descriptor() {
        let cmd = parse("/file cv.pdf 2048 application/pdf").unwrap();
        assert_eq!(
            cmd,
            Command::Upload(FileDescriptor::new("cv.pdf", 2048, "application/pdf"))
        );
    }

    #[test]
    fn file_command_rejects_bad_size() {
        let err = parse("/file cv.pdf big application/pdf").unwrap_err();
        assert!(err.to_string().contains("invalid size"));
    }

    #[test]
    fn file_command_requires_three_args() {
        assert!(parse("/file cv.pdf").is_err());
    }

    #[test]
    fn dismiss_parses_id() {
        assert_eq!(parse("/dismiss 12").unwrap(), Command::Dismiss(ToastId(12)));
        assert!(parse("/dismiss x").is_err());
        assert!(parse("/dismiss").is_err());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("/report").unwrap(), Command::Report);
        assert_eq!(parse("/toasts").unwrap(), Command::Toasts);
        assert_eq!(parse("/clear").unwrap(), Command::Clear);
        assert_eq!(parse("/help").unwrap(), Command::Help);
        assert_eq!(parse("/quit").unwrap(), Command::Quit);
        assert_eq!(parse("/exit").unwrap(), Command::Quit);
    }

    #[test]
    fn unknown_command_is_error() {
        assert!(parse("/frobnicate").is_err());
    }
}
