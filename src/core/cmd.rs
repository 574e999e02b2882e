use serde::{Deserialize, Serialize};

/// Side effects requested by reducers
///
/// Reducers stay pure; anything they want done besides producing the next
/// state is returned as a command and run by the `CmdExecutor` after the
/// state has been swapped in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmd {
    LogDebug { message: String },
    LogWarn { message: String },

    // Batch command (execute multiple commands together)
    Batch(Vec<Cmd>),

    // Do nothing (for testing)
    None,
}

impl Cmd {
    /// Combine multiple commands into one
    pub fn batch(commands: Vec<Cmd>) -> Cmd {
        let mut commands: Vec<Cmd> = commands.into_iter().filter(|cmd| !cmd.is_none()).collect();
        match commands.len() {
            0 => Cmd::None,
            1 => commands.remove(0),
            _ => Cmd::Batch(commands),
        }
    }

    /// An action was accepted by its reducer but left the state as it was
    pub fn ignored(kind: &str, reason: impl AsRef<str>) -> Cmd {
        Cmd::LogWarn {
            message: format!("{kind} ignored: {}", reason.as_ref()),
        }
    }

    pub fn debug(message: impl Into<String>) -> Cmd {
        Cmd::LogDebug {
            message: message.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }
}
