// Purpose - controller state in, decoded performance out
//
// Backends produce raw snapshots; the decoder turns them into notes.

pub mod decoder;
pub mod scripted;
#[cfg(windows)]
pub mod xinput;

pub use decoder::{DecodedPerformance, InputDecoder, NoteMask};
pub use scripted::ScriptedInput;

/// Digital button bits of [`ControllerSnapshot::buttons`], in XInput
/// `wButtons` order.
pub mod buttons {
    /// Shifts the key window down one octave.
    pub const DPAD_LEFT: u16 = 0x0004;
    /// Shifts the key window up one octave.
    pub const DPAD_RIGHT: u16 = 0x0008;
}

/// One read of the controller. Owned by whoever polled it; the decoder only
/// looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerSnapshot {
    /// Increments whenever the device reports a new state.
    pub packet_number: u32,
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl ControllerSnapshot {
    pub fn is_pressed(&self, button: u16) -> bool {
        self.buttons & button != 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("no controller connected in slot {slot}")]
    NotConnected { slot: u32 },

    #[error("controller input unavailable: {0}")]
    Unavailable(String),

    #[error("scripted input has no more snapshots")]
    Exhausted,
}

/// Source of controller snapshots.
///
/// "Nothing new" is not an error: the backend returns the same packet number
/// again. Any `Err` is fatal to the performance.
pub trait InputBackend: Send {
    fn poll(&mut self) -> Result<ControllerSnapshot, InputError>;
}

impl<T: InputBackend + ?Sized> InputBackend for Box<T> {
    fn poll(&mut self) -> Result<ControllerSnapshot, InputError> {
        (**self).poll()
    }
}
