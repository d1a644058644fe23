//! Round state and the events the simulation reports

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};
use super::gun::WeaponSlot;

/// Where the session is in its round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    /// App just started, no round played yet; a demo ship drifts around
    #[default]
    Fresh,
    /// Player ship is live, spawn timers running, score counting
    RoundStarted,
    /// Ship destroyed; entities keep drifting but nothing new spawns
    RoundFinished,
}

/// What the session does when a breakable entity breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrokenHook {
    /// Add the entity's score points
    AddScore,
    /// End the current round
    FinishRound,
}

/// Notifications for the view and audio layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A breakable entity was destroyed
    Broken {
        id: EntityId,
        kind: EntityKind,
        points: u32,
    },
    /// The player's weapon put a projectile in the arena
    ShotFired { slot: WeaponSlot },
    RoundStarted,
    RoundFinished { score: u64 },
}
