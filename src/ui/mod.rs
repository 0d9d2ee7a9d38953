/// Terminal host: input, gamepad, sound and rendering.

pub mod controls;
pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sound;
pub mod view;
