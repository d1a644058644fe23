//! Fixed timestep simulation tick
//!
//! Translates one tick's worth of player input into session calls, then
//! advances the simulation.

use super::session::GameSession;
use super::state::RoundState;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Forward thrust held
    pub engage: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Machine gun trigger held
    pub fire_bullet: bool,
    /// Laser trigger held
    pub fire_laser: bool,
    /// Start a round (ignored while one is running)
    pub start_round: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    if session.state() == RoundState::RoundStarted {
        if input.engage {
            session.engage();
        }
        if input.rotate_left {
            session.rotate_left(dt);
        }
        if input.rotate_right {
            session.rotate_right(dt);
        }
        if input.fire_bullet {
            session.fire_bullet();
        }
        if input.fire_laser {
            session.fire_laser();
        }
    } else if input.start_round {
        if let Err(err) = session.start_round() {
            log::warn!("Start request rejected: {err}");
        }
    }

    session.update(dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::SIM_DT;
    use crate::sim::state::GameEvent;

    #[test]
    fn test_tick_fresh_to_round_started() {
        let mut session = GameSession::new(Tuning::default(), 12345);
        assert_eq!(session.state(), RoundState::Fresh);

        // Controls do nothing before the round starts
        let input = TickInput {
            engage: true,
            fire_bullet: true,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT);
        assert_eq!(session.state(), RoundState::Fresh);
        assert!(session.drain_events().is_empty());

        let input = TickInput {
            start_round: true,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT);
        assert_eq!(session.state(), RoundState::RoundStarted);

        // Holding start during a round is ignored, not an error
        tick(&mut session, &input, SIM_DT);
        assert_eq!(session.drain_events(), vec![GameEvent::RoundStarted]);
    }

    #[test]
    fn test_tick_controls_move_ship() {
        let mut session = GameSession::new(Tuning::default(), 7);
        session.start_round().unwrap();
        let start = session.ship().unwrap().position();

        let input = TickInput {
            engage: true,
            rotate_right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut session, &input, SIM_DT);
        }

        let ship = session.ship().unwrap();
        assert!(ship.rotation() > 0.0);
        // Facing starts up (negative Y)
        assert!(ship.position().y < start.y);
    }

    #[test]
    fn test_tick_fires_both_weapons() {
        let mut session = GameSession::new(Tuning::default(), 7);
        session.start_round().unwrap();
        session.drain_events();

        let input = TickInput {
            fire_bullet: true,
            fire_laser: true,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT);
        let shots = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ShotFired { .. }))
            .count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed should produce identical results
        let mut session1 = GameSession::new(Tuning::default(), 99999);
        let mut session2 = GameSession::new(Tuning::default(), 99999);

        let inputs = [
            TickInput {
                start_round: true,
                ..Default::default()
            },
            TickInput {
                engage: true,
                fire_bullet: true,
                ..Default::default()
            },
            TickInput {
                rotate_left: true,
                fire_laser: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut session1, input, SIM_DT);
                tick(&mut session2, input, SIM_DT);
            }
        }

        assert_eq!(session1.score(), session2.score());
        assert_eq!(session1.arena().len(), session2.arena().len());
        let p1: Vec<_> = session1.arena().iter().map(|e| e.position()).collect();
        let p2: Vec<_> = session2.arena().iter().map(|e| e.position()).collect();
        assert_eq!(p1, p2);
    }
}
