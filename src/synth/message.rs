/// Gate events sent from a [`NoteHandle`](super::note::NoteHandle) to its
/// [`Note`](super::note::Note) on the audio thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Trigger {
    Attack,
    Release,
}

/// Room for a burst of on/off toggles between two audio callbacks. The poll
/// loop can at most send one trigger per tick, so this only fills up when the
/// audio thread has stalled for well over a hundred milliseconds.
pub const TRIGGER_QUEUE_SIZE: usize = 16;
