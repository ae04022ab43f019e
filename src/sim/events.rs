//! Outbound notifications
//!
//! The simulation reports lifecycle changes through [`GameObserver`]. Hosts
//! either implement the trait directly or hand the session a
//! `Vec<GameEvent>` and drain it once per frame.

use serde::{Deserialize, Serialize};

/// Sound cues requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Crash,
    Collect,
    Boost,
    LevelUp,
    GameOver,
}

impl Sound {
    /// Stable cue name for hosts that key sounds by string
    pub fn name(&self) -> &'static str {
        match self {
            Sound::Crash => "crash",
            Sound::Collect => "collect",
            Sound::Boost => "boost",
            Sound::LevelUp => "levelUp",
            Sound::GameOver => "gameOver",
        }
    }
}

/// Partial update for cross-session aggregation (achievements, lifetime
/// totals). Unset fields are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_collected: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boosts_used: Option<u32>,
    /// Crashes to add to the running total
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crash_count: Option<u32>,
    /// Length of the run that just ended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_crash_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_level: Option<u32>,
}

/// Receiver for simulation notifications. All methods default to no-ops.
pub trait GameObserver {
    fn score_changed(&mut self, _score: u64) {}
    fn lives_changed(&mut self, _lives: u8) {}
    fn level_changed(&mut self, _level: u32) {}
    fn game_over(&mut self) {}
    fn play_sound(&mut self, _sound: Sound) {}
    fn stats_updated(&mut self, _delta: &StatsDelta) {}
}

/// Discards everything
impl GameObserver for () {}

/// A notification, as queued by `Vec<GameEvent>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u8),
    LevelChanged(u32),
    GameOver,
    PlaySound(Sound),
    StatsUpdated(StatsDelta),
}

impl GameObserver for Vec<GameEvent> {
    fn score_changed(&mut self, score: u64) {
        self.push(GameEvent::ScoreChanged(score));
    }

    fn lives_changed(&mut self, lives: u8) {
        self.push(GameEvent::LivesChanged(lives));
    }

    fn level_changed(&mut self, level: u32) {
        self.push(GameEvent::LevelChanged(level));
    }

    fn game_over(&mut self) {
        self.push(GameEvent::GameOver);
    }

    fn play_sound(&mut self, sound: Sound) {
        self.push(GameEvent::PlaySound(sound));
    }

    fn stats_updated(&mut self, delta: &StatsDelta) {
        self.push(GameEvent::StatsUpdated(delta.clone()));
    }
}

impl<O: GameObserver + ?Sized> GameObserver for &mut O {
    fn score_changed(&mut self, score: u64) {
        (**self).score_changed(score);
    }

    fn lives_changed(&mut self, lives: u8) {
        (**self).lives_changed(lives);
    }

    fn level_changed(&mut self, level: u32) {
        (**self).level_changed(level);
    }

    fn game_over(&mut self) {
        (**self).game_over();
    }

    fn play_sound(&mut self, sound: Sound) {
        (**self).play_sound(sound);
    }

    fn stats_updated(&mut self, delta: &StatsDelta) {
        (**self).stats_updated(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_queues_in_order() {
        let mut events: Vec<GameEvent> = Vec::new();
        events.score_changed(10);
        events.play_sound(Sound::LevelUp);
        events.game_over();
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged(10),
                GameEvent::PlaySound(Sound::LevelUp),
                GameEvent::GameOver,
            ]
        );
    }

    #[test]
    fn test_stats_delta_json_omits_unset_fields() {
        let delta = StatsDelta {
            crash_count: Some(1),
            no_crash_distance: Some(12.5),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&delta).unwrap(),
            r#"{"crash_count":1,"no_crash_distance":12.5}"#
        );
    }

    #[test]
    fn test_sound_names() {
        assert_eq!(Sound::LevelUp.name(), "levelUp");
        assert_eq!(Sound::GameOver.name(), "gameOver");
    }
}
