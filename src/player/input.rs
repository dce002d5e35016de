//! Keyboard sampling into the per-frame `PlayerInput`.

use bevy::prelude::*;

use super::motor::MotorInput;

/// Key bindings for the time-loop controls.
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub reset: KeyCode,
    pub full_reset: KeyCode,
    pub jump: KeyCode,
    pub crouch: KeyCode,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            reset: KeyCode::KeyF,
            full_reset: KeyCode::KeyR,
            jump: KeyCode::Space,
            crouch: KeyCode::KeyS,
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
        }
    }
}

/// Input polled once per frame. Edges are only true on the frame of the press.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    pub horizontal: f32,
    pub jump_pressed: bool,
    pub crouch_held: bool,
    pub reset_pressed: bool,
    pub full_reset_pressed: bool,
}

impl PlayerInput {
    /// Reset edge for this frame. A full reset pressed on the same frame wins.
    pub fn wants_reset(&self) -> bool {
        self.reset_pressed && !self.full_reset_pressed
    }

    pub fn motor_input(&self) -> MotorInput {
        MotorInput {
            horizontal: self.horizontal,
            crouch: self.crouch_held,
            jump_pressed: self.jump_pressed,
        }
    }
}

/// Raw axis: -1, 0 or 1 depending on which side is held.
pub fn axis(keyboard: &ButtonInput<KeyCode>, negative: &[KeyCode], positive: &[KeyCode]) -> f32 {
    let mut value = 0.0;
    if keyboard.any_pressed(negative.iter().copied()) {
        value -= 1.0;
    }
    if keyboard.any_pressed(positive.iter().copied()) {
        value += 1.0;
    }
    value
}

/// Sample the keyboard into `PlayerInput`.
pub fn read_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput {
        horizontal: axis(&keyboard, &bindings.left, &bindings.right),
        jump_pressed: keyboard.just_pressed(bindings.jump),
        crouch_held: keyboard.pressed(bindings.crouch),
        reset_pressed: keyboard.just_pressed(bindings.reset),
        full_reset_pressed: keyboard.just_pressed(bindings.full_reset),
    };
}
