/// Logs panics through tracing before handing them to the previous hook,
/// so they end up in the log file as well as on stderr.
pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(panic = %panic_info, "panic");
        hook(panic_info);
    }));
}
