/// Buffer sizes for the session layer.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Messages a player's outbound queue holds before further messages
    /// for that player are dropped.
    pub outbound_capacity: usize,

    /// Events the bus buffers before `post` starts waiting.
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: 10,
            event_buffer: 10,
        }
    }
}
