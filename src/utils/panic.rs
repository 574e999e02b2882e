//! Panic and error report hooks for the binary

use std::{panic, panic::PanicHookInfo, process};

use color_eyre::{config::HookBuilder, eyre::Result};

/// Install the color-eyre error hook and a panic hook that reports, logs and
/// exits
///
/// Release builds write a human-panic crash dump; debug builds print a full
/// better-panic backtrace. Both record the stripped report in the log file.
pub fn initialize_panic_handler() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(format!(
            "This is a bug in {}. Consider reporting it at {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_REPOSITORY")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    panic::set_hook(Box::new(move |panic_info| {
        let report = panic_hook.panic_report(panic_info).to_string();

        #[cfg(not(debug_assertions))]
        crash_dump(panic_info, &report);

        log::error!("Panic: {}", strip_ansi_escapes::strip_str(&report));

        #[cfg(debug_assertions)]
        backtrace(panic_info);

        process::exit(libc::EXIT_FAILURE);
    }));
    Ok(())
}

#[cfg(not(debug_assertions))]
fn crash_dump(panic_info: &PanicHookInfo<'_>, report: &str) {
    use human_panic::{handle_dump, print_msg, Metadata};

    let meta = Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .authors(env!("CARGO_PKG_AUTHORS").replace(':', ", "))
        .homepage(env!("CARGO_PKG_HOMEPAGE"));
    let file_path = handle_dump(&meta, panic_info);
    if let Err(e) = print_msg(file_path, &meta) {
        eprintln!("human-panic: printing error message to console failed: {e}");
    }
    eprintln!("{report}");
}

#[cfg(debug_assertions)]
fn backtrace(panic_info: &PanicHookInfo<'_>) {
    better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .verbosity(better_panic::Verbosity::Full)
        .create_panic_handler()(panic_info);
}
