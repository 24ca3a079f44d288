//! Running shot and hit tallies.

use ironsight_core::state::ScoreView;

#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub shots_fired: u32,
    pub hostile_hits: u32,
    pub surface_hits: u32,
    pub kills: u32,
}

impl ScoreState {
    /// Fraction of shots that landed on a hostile.
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.hostile_hits as f32 / self.shots_fired as f32
        }
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            shots_fired: self.shots_fired,
            hostile_hits: self.hostile_hits,
            surface_hits: self.surface_hits,
            kills: self.kills,
        }
    }
}
