use macroquad::math::{vec2, Vec2};

/// Pan direction, named after where the view travels over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// View moves up the screen.
    North,
    /// View moves down the screen.
    South,
    /// View moves right.
    East,
    /// View moves left.
    West,
}

impl Direction {
    /// Camera offset change for one step of `step` pixels. The map moves
    /// opposite to the view.
    pub fn offset_delta(self, step: f32) -> Vec2 {
        match self {
            Direction::North => vec2(0.0, step),
            Direction::South => vec2(0.0, -step),
            Direction::East => vec2(-step, 0.0),
            Direction::West => vec2(step, 0.0),
        }
    }
}

/// Discrete camera input delivered by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraCommand {
    /// Move one pan step.
    Pan(Direction),
    /// Centre the map in the viewport.
    Reset,
}
