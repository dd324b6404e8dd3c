// Purpose: the instrument's voices
// One note per pitch, split into a render half (audio thread) and a control
// half (poll thread), all owned by the fixed-size voice bank.

pub mod bank;
pub mod message;
pub mod note;

pub use bank::{frequency_for, BankHandle, VoiceBank};
pub use note::{Note, NoteHandle};
