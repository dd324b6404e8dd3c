use crate::input::InputError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal conditions. There is no degraded mode for an instrument without
/// an output or an input, so none of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("unsupported output sample format {0}, expected f32")]
    UnsupportedSampleFormat(String),

    #[error("no controller input backend is available on this platform")]
    NoInputBackend,

    #[error("controller input failed: {0}")]
    Input(#[from] InputError),
}
