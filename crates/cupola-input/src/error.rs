/// Errors raised by the input layer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    /// A listener with this name is already subscribed to the bus.
    #[error("listener `{0}` is already subscribed")]
    DuplicateListener(&'static str),
}
