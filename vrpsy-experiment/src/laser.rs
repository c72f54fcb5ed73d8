use tracing::debug;
use vrpsy_core::{Pose, Ray, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

/// Controller activity that can claim the laser for a hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerInput {
    Confirm { hand: Hand, pressed: bool },
    Stick { hand: Hand, axis: Vec2 },
}

impl ControllerInput {
    fn hand(&self) -> Hand {
        match self {
            ControllerInput::Confirm { hand, .. } | ControllerInput::Stick { hand, .. } => *hand,
        }
    }
}

/// Keeps the laser on whichever hand the participant used last.
#[derive(Debug, Clone)]
pub struct ActiveLaserManager {
    active: Hand,
    deadzone: f64,
    deactivated: bool,
    controller_changes: usize,
}

impl ActiveLaserManager {
    /// Starts on the right hand with both lasers hidden.
    pub fn new(deadzone: f64) -> Self {
        Self {
            active: Hand::Right,
            deadzone,
            deactivated: true,
            controller_changes: 0,
        }
    }

    /// Returns true when the active hand switched while lasers were shown.
    pub fn handle(&mut self, input: ControllerInput) -> bool {
        if let ControllerInput::Stick { axis, .. } = input {
            if axis.length() < self.deadzone {
                return false;
            }
        }
        let hand = input.hand();
        let changed = !self.deactivated && self.active != hand;
        if changed {
            self.controller_changes += 1;
            debug!(?hand, "active controller changed");
        }
        self.active = hand;
        changed
    }

    pub fn deactivate_both_lasers(&mut self) {
        self.deactivated = true;
    }

    pub fn activate_laser(&mut self) {
        self.deactivated = false;
    }

    pub fn active_hand(&self) -> Hand {
        self.active
    }

    pub fn is_visible(&self, hand: Hand) -> bool {
        !self.deactivated && self.active == hand
    }

    pub fn controller_changes(&self) -> usize {
        self.controller_changes
    }

    /// Laser ray of the active hand, or `None` while lasers are hidden.
    pub fn active_ray(&self, left: &Pose, right: &Pose) -> Option<Ray> {
        if self.deactivated {
            return None;
        }
        Some(match self.active {
            Hand::Left => left.ray(),
            Hand::Right => right.ray(),
        })
    }
}
