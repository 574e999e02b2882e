use crate::core::cmd::Cmd;

/// Runs the commands returned by reducers
#[derive(Debug, Clone, Copy, Default)]
pub struct CmdExecutor;

impl CmdExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a single command
    pub fn execute_command(&self, cmd: &Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::LogDebug { message } => tracing::debug!("{message}"),
            Cmd::LogWarn { message } => tracing::warn!("{message}"),
            Cmd::Batch(cmds) => self.execute_commands(cmds),
        }
    }

    /// Execute commands in order
    pub fn execute_commands(&self, cmds: &[Cmd]) {
        for cmd in cmds {
            self.execute_command(cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Arc};

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use tracing::Level;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Log lines emitted while running `f`
    fn logged(f: impl FnOnce()) -> Vec<String> {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let output = String::from_utf8_lossy(&captured.0.lock()).into_owned();
        output.lines().map(|line| line.trim().to_owned()).collect()
    }

    #[test]
    fn test_execute_nested_batch_in_order() {
        let executor = CmdExecutor::new();
        let lines = logged(|| {
            executor.execute_commands(&[
                Cmd::None,
                Cmd::Batch(vec![Cmd::debug("inner"), Cmd::Batch(vec![Cmd::None])]),
                Cmd::ignored("NAVIGATION", "no source view"),
            ]);
        });

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("DEBUG"));
        assert!(lines[0].ends_with("inner"));
        assert!(lines[1].starts_with("WARN"));
        assert!(lines[1].ends_with("NAVIGATION ignored: no source view"));
    }

    #[test]
    fn test_none_logs_nothing() {
        let executor = CmdExecutor::new();
        assert!(logged(|| executor.execute_command(&Cmd::None)).is_empty());
    }
}
