use std::panic::PanicHookInfo;

/// Installs a panic hook that logs through `tracing` and then terminates the
/// process with exit code 1, the same code a failed run reports.
pub fn set() {
    std::panic::set_hook(Box::new(|info| {
        tracing_panic_hook(info);
        std::process::exit(1);
    }));
}

/// Prints roughly the same message as the default panic hook but uses
/// `tracing::error` instead of stderr so panics keep the log format.
fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}
