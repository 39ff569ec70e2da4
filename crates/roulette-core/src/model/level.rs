//! Level derivation from cumulative points.
//!
//! Levels are never stored; they are recomputed from `points` on every read.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelTier {
    Beginner,
    Practitioner,
    Master,
    /// Max tier, no further target.
    Grandmaster,
}

impl LevelTier {
    pub fn from_points(points: u32) -> Self {
        match points {
            0..=50 => LevelTier::Beginner,
            51..=200 => LevelTier::Practitioner,
            201..=500 => LevelTier::Master,
            _ => LevelTier::Grandmaster,
        }
    }

    /// 1-based level number.
    pub fn number(&self) -> u8 {
        match self {
            LevelTier::Beginner => 1,
            LevelTier::Practitioner => 2,
            LevelTier::Master => 3,
            LevelTier::Grandmaster => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LevelTier::Beginner => "Beginner",
            LevelTier::Practitioner => "Practitioner",
            LevelTier::Master => "Master",
            LevelTier::Grandmaster => "Grandmaster",
        }
    }

    /// `(base, next)` points of the tier's progress window; `None` at max tier.
    fn window(&self) -> Option<(u32, u32)> {
        match self {
            LevelTier::Beginner => Some((0, 50)),
            LevelTier::Practitioner => Some((50, 200)),
            LevelTier::Master => Some((200, 500)),
            LevelTier::Grandmaster => None,
        }
    }
}

/// Read-only level view for a point total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub tier: LevelTier,
    pub level: u8,
    pub title: &'static str,
    pub points: u32,
    /// 0.0 ..= 1.0 within the tier; always 1.0 at max tier.
    pub progress: f64,
    pub next_level_points: Option<u32>,
}

impl Level {
    pub fn is_max(&self) -> bool {
        self.next_level_points.is_none()
    }

    pub fn points_to_next_level(&self) -> Option<u32> {
        self.next_level_points
            .map(|next| next.saturating_sub(self.points))
    }
}

/// Map a point total onto its level.
pub fn level_of(points: u32) -> Level {
    let tier = LevelTier::from_points(points);
    let (progress, next_level_points) = match tier.window() {
        Some((base, next)) => {
            let progress = f64::from(points - base) / f64::from(next - base);
            (progress, Some(next))
        }
        None => (1.0, None),
    };

    Level {
        tier,
        level: tier.number(),
        title: tier.title(),
        points,
        progress,
        next_level_points,
    }
}
