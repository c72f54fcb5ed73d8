//! Scripted participant used to drive headless sessions.

use rand::Rng;
use rand::rngs::StdRng;
use vrpsy_core::{Pose, Scene, Vec2, Vec3, seconds_to_ns};
use vrpsy_experiment::Hand;

#[derive(Debug, Clone)]
pub struct ParticipantProfile {
    pub min_reaction_time: f64,
    pub max_reaction_time: f64,
    /// Chance of never responding to a target.
    pub lapse_rate: f64,
    /// Chance per appearance trial of pressing before the target shows.
    pub false_alarm_rate: f64,
    /// Chance per trial of glancing at the target instead of holding fixation.
    pub glance_rate: f64,
    /// Chance per frame of tapping the click pad while it is shown.
    pub click_rate: f64,
    pub gaze_noise_degrees: f64,
    pub head_jitter_meters: f64,
    /// Chance per response of using the left controller.
    pub left_hand_rate: f64,
}

impl Default for ParticipantProfile {
    fn default() -> Self {
        Self {
            min_reaction_time: 0.25,
            max_reaction_time: 0.6,
            lapse_rate: 0.05,
            false_alarm_rate: 0.05,
            glance_rate: 0.05,
            click_rate: 0.05,
            gaze_noise_degrees: 0.3,
            head_jitter_meters: 0.002,
            left_hand_rate: 0.1,
        }
    }
}

/// Everything the participant does during one frame.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantAction {
    pub gaze: Vec3,
    pub gaze_confidence: f64,
    pub head: Pose,
    pub left_hand: Pose,
    pub right_hand: Pose,
    /// Hand whose trigger was pulled, if any.
    pub confirm: Option<Hand>,
    pub click: bool,
}

#[derive(Debug, Clone, Copy)]
enum Plan {
    Respond { at_ns: u64 },
    Glance { at_ns: u64 },
    Lapse,
}

pub struct SimulatedParticipant {
    profile: ParticipantProfile,
    rng: StdRng,
    trial_active: bool,
    false_alarm_at: Option<u64>,
    plan: Option<Plan>,
    responded: bool,
}

const HAND_OFFSET: Vec3 = Vec3::new(0.2, -0.3, 0.1);

impl SimulatedParticipant {
    pub fn new(profile: ParticipantProfile, rng: StdRng) -> Self {
        Self {
            profile,
            rng,
            trial_active: false,
            false_alarm_at: None,
            plan: None,
            responded: false,
        }
    }

    pub fn act(&mut self, scene: &Scene, now_ns: u64) -> ParticipantAction {
        let depth = if scene.plane_depth > 0.0 {
            scene.plane_depth
        } else {
            1.0
        };

        match (scene.fixation_dot.is_some(), self.trial_active) {
            (true, false) => self.begin_trial(now_ns),
            (false, true) => self.trial_active = false,
            _ => {}
        }

        if scene.target.is_none() {
            self.plan = None;
            self.responded = false;
        } else if self.plan.is_none() {
            self.plan = Some(self.plan_reaction(now_ns));
        }

        let fixation = scene.fixation_dot.map_or(Vec2::ZERO, |dot| dot.center);
        let mut look_at = fixation;
        let mut aim_at = fixation;
        let mut confirm = false;

        if let Some(target) = scene.target {
            aim_at = target.offset;
            match self.plan {
                Some(Plan::Respond { at_ns }) if now_ns >= at_ns && !self.responded => {
                    confirm = true;
                    self.responded = true;
                }
                Some(Plan::Glance { at_ns }) if now_ns >= at_ns => look_at = target.offset,
                _ => {}
            }
        } else if let Some(at_ns) = self.false_alarm_at {
            if scene.fixation_dot.is_some() && now_ns >= at_ns {
                confirm = true;
                self.false_alarm_at = None;
            }
        }

        let click = scene.click_pad && self.rng.random_bool(self.profile.click_rate);
        let hand = if self.rng.random_bool(self.profile.left_hand_rate) {
            Hand::Left
        } else {
            Hand::Right
        };

        let head = Pose {
            position: Vec3::new(
                self.jitter(self.profile.head_jitter_meters),
                self.jitter(self.profile.head_jitter_meters),
                self.jitter(self.profile.head_jitter_meters),
            ),
            forward: Vec3::FORWARD,
        };
        let left_origin = Vec3::new(-HAND_OFFSET.x, HAND_OFFSET.y, HAND_OFFSET.z);

        ParticipantAction {
            gaze: self.gaze_towards(look_at, depth),
            gaze_confidence: self.rng.random_range(0.5..=1.0),
            head,
            left_hand: aim(left_origin, aim_at, depth),
            right_hand: aim(HAND_OFFSET, aim_at, depth),
            confirm: confirm.then_some(hand),
            click,
        }
    }

    fn begin_trial(&mut self, now_ns: u64) {
        self.trial_active = true;
        self.false_alarm_at = self
            .rng
            .random_bool(self.profile.false_alarm_rate)
            .then(|| now_ns + seconds_to_ns(self.rng.random_range(0.5..=2.0)));
    }

    fn plan_reaction(&mut self, now_ns: u64) -> Plan {
        let p = &self.profile;
        let (lapse, glance) = (p.lapse_rate, p.glance_rate);
        let (min, max) = (p.min_reaction_time, p.max_reaction_time.max(p.min_reaction_time));
        let at_ns = now_ns + seconds_to_ns(self.rng.random_range(min..=max));
        if self.rng.random_bool(lapse) {
            Plan::Lapse
        } else if self.rng.random_bool(glance) {
            Plan::Glance { at_ns }
        } else {
            Plan::Respond { at_ns }
        }
    }

    fn jitter(&mut self, amount: f64) -> f64 {
        self.rng.random_range(-amount..=amount)
    }

    fn gaze_towards(&mut self, point: Vec2, depth: f64) -> Vec3 {
        let noise = self.profile.gaze_noise_degrees;
        let nx = self.jitter(noise).to_radians().tan();
        let ny = self.jitter(noise).to_radians().tan();
        Vec3::new(point.x / depth + nx, point.y / depth + ny, 1.0)
            .normalized()
            .unwrap_or(Vec3::FORWARD)
    }
}

/// Controller pose at `origin` pointing at `point` on the plane at `depth`.
fn aim(origin: Vec3, point: Vec2, depth: f64) -> Pose {
    let forward = Vec3::new(point.x - origin.x, point.y - origin.y, depth - origin.z)
        .normalized()
        .unwrap_or(Vec3::FORWARD);
    Pose {
        position: origin,
        forward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use vrpsy_core::{FixationDot, Target};

    fn steady() -> ParticipantProfile {
        ParticipantProfile {
            lapse_rate: 0.0,
            false_alarm_rate: 0.0,
            glance_rate: 0.0,
            click_rate: 0.0,
            gaze_noise_degrees: 0.0,
            head_jitter_meters: 0.0,
            left_hand_rate: 0.0,
            ..ParticipantProfile::default()
        }
    }

    fn trial_scene() -> Scene {
        let mut scene = Scene::default();
        scene.plane_depth = 2.0;
        scene.fixation_dot = Some(FixationDot {
            center: Vec2::ZERO,
            radius: 0.02,
        });
        scene
    }

    #[test]
    fn holds_gaze_on_the_fixation_dot() {
        let mut p = SimulatedParticipant::new(steady(), StdRng::seed_from_u64(1));
        let action = p.act(&trial_scene(), 0);
        assert_eq!(action.gaze, Vec3::FORWARD);
        assert!(action.confirm.is_none());
        let hit = action.right_hand.ray().intersect_plane(2.0).unwrap();
        assert!(hit.length() < 1e-9);
    }

    #[test]
    fn responds_once_within_reaction_time_range() {
        let mut p = SimulatedParticipant::new(steady(), StdRng::seed_from_u64(2));
        let mut scene = trial_scene();
        scene.target = Some(Target {
            offset: Vec2::new(0.3, 0.0),
            radius: 0.03,
        });

        let step = 10_000_000;
        let mut confirms = Vec::new();
        for frame in 0..200u64 {
            if p.act(&scene, frame * step).confirm == Some(Hand::Right) {
                confirms.push(frame * step);
            }
        }
        assert_eq!(confirms.len(), 1);
        assert!(confirms[0] >= 250_000_000 && confirms[0] <= 610_000_000);
    }

    #[test]
    fn laser_aims_at_the_target() {
        let mut p = SimulatedParticipant::new(steady(), StdRng::seed_from_u64(3));
        let mut scene = trial_scene();
        scene.target = Some(Target {
            offset: Vec2::new(0.3, 0.1),
            radius: 0.03,
        });
        let action = p.act(&scene, 0);
        let hit = action.left_hand.ray().intersect_plane(2.0).unwrap();
        assert!(hit.distance(Vec2::new(0.3, 0.1)) < 1e-9);
    }
}
