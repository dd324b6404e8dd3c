//! XInput backend (Windows). The keyboard shows up as an ordinary gamepad in
//! one of the four XInput user slots.

use rusty_xinput::{XInputHandle, XInputUsageError};
use tracing::info;

use crate::input::{ControllerSnapshot, InputBackend, InputError};

pub struct XInputBackend {
    handle: XInputHandle,
    slot: u32,
}

impl XInputBackend {
    /// Load the XInput DLL and read from user slot `slot` (0..=3).
    pub fn open(slot: u32) -> Result<Self, InputError> {
        if slot > 3 {
            return Err(InputError::NotConnected { slot });
        }
        let handle = XInputHandle::load_default()
            .map_err(|err| InputError::Unavailable(format!("{err:?}")))?;
        info!(slot, "xinput loaded");
        Ok(Self { handle, slot })
    }
}

impl InputBackend for XInputBackend {
    fn poll(&mut self) -> Result<ControllerSnapshot, InputError> {
        let state = self.handle.get_state(self.slot).map_err(|err| match err {
            XInputUsageError::DeviceNotConnected => InputError::NotConnected { slot: self.slot },
            other => InputError::Unavailable(format!("{other:?}")),
        })?;

        let raw = state.raw;
        let pad = raw.Gamepad;
        Ok(ControllerSnapshot {
            packet_number: raw.dwPacketNumber,
            buttons: pad.wButtons,
            left_trigger: pad.bLeftTrigger,
            right_trigger: pad.bRightTrigger,
            thumb_lx: pad.sThumbLX,
            thumb_ly: pad.sThumbLY,
            thumb_rx: pad.sThumbRX,
            thumb_ry: pad.sThumbRY,
        })
    }
}
