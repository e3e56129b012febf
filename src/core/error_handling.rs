//! Contextual error reporting
//!
//! Errors reaching the top of the binary are reported differently depending on
//! whether the user can do something about them.

/// Errors that can distinguish between user-actionable and system failures
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// True if the error carries a message the user should see directly
    ///
    /// User-actionable: configuration mistakes, a scan target that does not
    /// exist. System: IO failures, unloadable plugin code.
    fn is_user_actionable(&self) -> bool;

    /// The message to show if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with a detail level suited to who can fix them
///
/// User-actionable errors show their own message. System errors show the
/// operation that failed, with the error itself at debug level.
///
/// ```rust,no_run
/// # use plugscout::core::error_handling::log_error_with_context;
/// # use plugscout::plugin::api::DiscoveryError;
/// let error = DiscoveryError::Configuration {
///     message: "'manifest' must not be empty".to_string(),
/// };
/// log_error_with_context(&error, "Loading configuration");
/// // Logs: "FATAL: 'manifest' must not be empty"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// The primary line reported for `error`
pub fn fatal_message<'a, E: ContextualError>(error: &'a E, operation_context: &'a str) -> &'a str {
    if error.is_user_actionable() {
        error.user_message().unwrap_or(operation_context)
    } else {
        operation_context
    }
}
