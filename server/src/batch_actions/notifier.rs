/// Fire-and-forget surface for user-visible error messages.
pub trait ErrorNotifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ErrorNotifier for LogNotifier {
    fn notify_error(&self, message: &str) {
        log::error!("{message}");
    }
}
