use log::Level;

/// Fraction of a step that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.3;

/// Viewport inset so steps start entering slightly before they are fully on screen.
pub const REVEAL_ROOT_MARGIN_PX: u32 = 50;

/// Extra entrance delay per step, so the cards cascade in.
pub const STAGGER_STEP_MS: u32 = 100;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Engine decisions are worth seeing while developing
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

pub fn transition_delay_ms(step: usize) -> u32 {
    step as u32 * STAGGER_STEP_MS
}
