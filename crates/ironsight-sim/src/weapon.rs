//! Weapons and the player's loadout.
//!
//! A weapon only decides whether a trigger pull produces a shot; spawning
//! the projectile is the engine's job. Single-shot weapons lock out while
//! their firing animation plays. Automatic weapons are rate limited and
//! drop pulls that arrive inside the interval.

use glam::Vec3;

use ironsight_core::config::WeaponTuning;
use ironsight_core::enums::WeaponKind;
use ironsight_core::state::WeaponView;
use ironsight_core::types::Direction;

/// A shot a weapon agreed to produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec3,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    kind: WeaponKind,
    ammo: u32,
    /// Minimum time between shots (0 for single-shot).
    cooldown_ms: f64,
    last_fired_at: Option<f64>,
    /// Firing animation length in ticks (0 for automatic).
    animation_ticks: u32,
    frame_hold: u32,
    /// Ticks into the current firing animation.
    animation_tick: Option<u32>,
    visible: bool,
}

impl Weapon {
    pub fn single_shot(tuning: &WeaponTuning) -> Self {
        Self {
            kind: WeaponKind::SingleShot,
            ammo: tuning.single_shot_ammo,
            cooldown_ms: 0.0,
            last_fired_at: None,
            animation_ticks: tuning
                .single_shot_animation_frames
                .saturating_mul(tuning.single_shot_frame_hold),
            frame_hold: tuning.single_shot_frame_hold.max(1),
            animation_tick: None,
            visible: true,
        }
    }

    pub fn automatic(tuning: &WeaponTuning) -> Self {
        Self {
            kind: WeaponKind::Automatic,
            ammo: tuning.automatic_ammo,
            cooldown_ms: tuning.automatic_interval_ms,
            last_fired_at: None,
            animation_ticks: 0,
            frame_hold: 1,
            animation_tick: None,
            visible: true,
        }
    }

    pub fn with_ammo(mut self, ammo: u32) -> Self {
        self.ammo = ammo;
        self
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Pull the trigger. Returns the shot if one was produced; an empty
    /// weapon, a running animation or a pull inside the rate limit all
    /// return `None` and leave the weapon untouched.
    pub fn fire(&mut self, now_ms: f64, origin: Vec3, direction: Direction) -> Option<Shot> {
        if self.ammo == 0 || self.is_animating() {
            return None;
        }
        if let Some(last) = self.last_fired_at {
            if now_ms - last < self.cooldown_ms {
                return None;
            }
        }

        self.ammo -= 1;
        self.last_fired_at = Some(now_ms);
        if self.animation_ticks > 0 {
            self.animation_tick = Some(0);
        }
        Some(Shot { origin, direction })
    }

    pub fn ammo_remaining(&self) -> u32 {
        self.ammo
    }

    pub fn is_animating(&self) -> bool {
        self.animation_tick.is_some()
    }

    /// Step the firing animation by one tick.
    pub fn advance(&mut self) {
        if let Some(tick) = self.animation_tick {
            let next = tick + 1;
            self.animation_tick = (next < self.animation_ticks).then_some(next);
        }
    }

    /// View-model frame currently shown.
    pub fn view_frame(&self) -> u32 {
        self.animation_tick.map_or(0, |t| t / self.frame_hold)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn view(&self) -> WeaponView {
        WeaponView {
            kind: self.kind,
            ammo: self.ammo,
            frame: self.view_frame(),
        }
    }
}

/// The player's weapons in switch order. Exactly one is active and visible.
#[derive(Debug, Clone)]
pub struct Loadout {
    weapons: Vec<Weapon>,
    active: usize,
}

impl Loadout {
    /// Single-shot first, then automatic.
    pub fn standard(tuning: &WeaponTuning) -> Self {
        Self::new(vec![Weapon::single_shot(tuning), Weapon::automatic(tuning)])
    }

    pub fn new(mut weapons: Vec<Weapon>) -> Self {
        for (i, weapon) in weapons.iter_mut().enumerate() {
            weapon.set_visible(i == 0);
        }
        Self { weapons, active: 0 }
    }

    pub fn active(&self) -> Option<&Weapon> {
        self.weapons.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.active)
    }

    /// Rotate to the next weapon. Returns the newly active kind.
    pub fn switch_next(&mut self) -> Option<WeaponKind> {
        if self.weapons.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.weapons.len();
        for (i, weapon) in self.weapons.iter_mut().enumerate() {
            weapon.set_visible(i == self.active);
        }
        Some(self.weapons[self.active].kind())
    }

    /// Step every weapon's animation, hidden ones included.
    pub fn advance(&mut self) {
        for weapon in &mut self.weapons {
            weapon.advance();
        }
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> Direction {
        Direction::new(Vec3::Z).unwrap()
    }

    #[test]
    fn test_single_shot_locks_during_animation() {
        let tuning = WeaponTuning::default();
        let mut pistol = Weapon::single_shot(&tuning).with_ammo(1);

        assert!(pistol.fire(0.0, Vec3::ZERO, forward()).is_some());
        assert!(pistol.fire(0.0, Vec3::ZERO, forward()).is_none());
        assert_eq!(pistol.ammo_remaining(), 0);
    }

    #[test]
    fn test_single_shot_animation_frames() {
        let tuning = WeaponTuning::default();
        let mut pistol = Weapon::single_shot(&tuning);
        pistol.fire(0.0, Vec3::ZERO, forward());

        let mut frames = vec![pistol.view_frame()];
        for _ in 0..15 {
            pistol.advance();
            frames.push(pistol.view_frame());
        }
        assert_eq!(frames, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
        assert!(pistol.is_animating());

        pistol.advance();
        assert!(!pistol.is_animating());
        assert_eq!(pistol.view_frame(), 0);
        assert!(pistol.fire(300.0, Vec3::ZERO, forward()).is_some());
        assert_eq!(pistol.ammo_remaining(), tuning.single_shot_ammo - 2);
    }

    #[test]
    fn test_automatic_rate_limit() {
        let tuning = WeaponTuning::default();
        let mut gun = Weapon::automatic(&tuning);

        assert!(gun.fire(0.0, Vec3::ZERO, forward()).is_some());
        assert!(gun.fire(50.0, Vec3::ZERO, forward()).is_none());
        assert!(gun.fire(99.9, Vec3::ZERO, forward()).is_none());
        assert!(gun.fire(100.0, Vec3::ZERO, forward()).is_some());
        assert_eq!(gun.ammo_remaining(), tuning.automatic_ammo - 2);
        assert!(!gun.is_animating());
    }

    #[test]
    fn test_empty_weapon_never_fires() {
        let tuning = WeaponTuning::default();
        let mut gun = Weapon::automatic(&tuning).with_ammo(3);

        let mut last = gun.ammo_remaining();
        for i in 0..10 {
            gun.fire(i as f64 * 1000.0, Vec3::ZERO, forward());
            assert!(gun.ammo_remaining() <= last);
            last = gun.ammo_remaining();
        }
        assert_eq!(gun.ammo_remaining(), 0);
        assert!(gun.fire(1e9, Vec3::ZERO, forward()).is_none());
    }

    #[test]
    fn test_loadout_rotates_and_hides_inactive() {
        let mut loadout = Loadout::standard(&WeaponTuning::default());
        assert_eq!(loadout.active().map(Weapon::kind), Some(WeaponKind::SingleShot));
        assert!(loadout.weapons()[0].is_visible());
        assert!(!loadout.weapons()[1].is_visible());

        assert_eq!(loadout.switch_next(), Some(WeaponKind::Automatic));
        assert!(!loadout.weapons()[0].is_visible());
        assert!(loadout.weapons()[1].is_visible());

        assert_eq!(loadout.switch_next(), Some(WeaponKind::SingleShot));
        assert_eq!(loadout.weapons().len(), 2);
    }
}
