//! Result of handling one chain-update notification

/// What the registry did with a chain-update notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainUpdateOutcome {
    /// The announced hash is our own tip
    AlreadySynced,
    /// A fork for the hash exists; the sender was attached to it
    AttachedToExisting,
    /// Same cumulative difficulty as our tip; competing tips are not raced
    EqualDifficulty,
    /// Our tip is heavier; it was pushed back to the sender
    PushedLocalTip,
    /// A new fork was registered
    ForkCreated,
    /// Another task registered the same fork first; the sender was attached
    AttachedAfterRace,
    /// Registry at capacity with nothing evictable; announcement dropped
    RegistryFull,
}

impl ChainUpdateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainUpdateOutcome::AlreadySynced => "already_synced",
            ChainUpdateOutcome::AttachedToExisting => "attached_to_existing",
            ChainUpdateOutcome::EqualDifficulty => "equal_difficulty",
            ChainUpdateOutcome::PushedLocalTip => "pushed_local_tip",
            ChainUpdateOutcome::ForkCreated => "fork_created",
            ChainUpdateOutcome::AttachedAfterRace => "attached_after_race",
            ChainUpdateOutcome::RegistryFull => "registry_full",
        }
    }

    /// Whether the sender now vouches for a registered fork.
    pub fn attached(&self) -> bool {
        matches!(
            self,
            ChainUpdateOutcome::AttachedToExisting
                | ChainUpdateOutcome::ForkCreated
                | ChainUpdateOutcome::AttachedAfterRace
        )
    }
}
