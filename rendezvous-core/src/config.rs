use chrono::Duration;

/// Lifecycle settings of the rendezvous engine
#[derive(Debug, Clone)]
pub struct Config {
    /// How long a user counts as online after their last heartbeat
    pub presence_ttl: Duration,
    /// How long a room stays joinable after it was created
    pub room_ttl: Duration,
    /// How long an unread invite can be picked up
    pub invite_ttl: Duration,
    /// How long a player may wait in the matchmaking queue
    pub queue_entry_ttl: Duration,
    /// How long a pairing stays observable after it was made
    pub matched_record_ttl: Duration,
    /// How many random room codes are tried before giving up
    pub room_code_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presence_ttl: Duration::seconds(15),
            room_ttl: Duration::seconds(30 * 60),
            invite_ttl: Duration::seconds(10),
            // Clients stop polling after 60 seconds
            queue_entry_ttl: Duration::seconds(70),
            matched_record_ttl: Duration::seconds(5 * 60),
            room_code_attempts: 50,
        }
    }
}
