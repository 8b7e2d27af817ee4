/// Terminates the process when any thread panics, after the already
/// installed hook (usually the logging one) has run. A provisioning run that
/// panicked half-way must not keep the process alive looking successful.
pub fn set_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        previous_hook(panic);
        std::process::exit(1);
    }));
}
