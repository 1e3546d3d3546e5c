/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks completed by this field, including this one.
    pub frame: u64,
    pub particle_count: u32,
    pub connection_count: u32,
    /// False when the host surface rejected a draw call and the frame was skipped.
    pub drawn: bool,
}
