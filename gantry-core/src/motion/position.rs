//! Cartesian carriage position

/// Carriage position in millimetres from the homed origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Position {
    /// Homed origin
    pub const ORIGIN: Position = Position { x_mm: 0.0, y_mm: 0.0 };

    pub const fn new(x_mm: f32, y_mm: f32) -> Self {
        Self { x_mm, y_mm }
    }
}
