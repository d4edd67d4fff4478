//! Waypoint access and per-agent path progress.

use rampart_core::types::Position;

/// Ordered waypoints by index. The last waypoint is the core.
pub trait PathProvider {
    /// Waypoint at `index`, or `None` past the end of the path.
    fn waypoint(&self, index: usize) -> Option<Position>;
}

impl PathProvider for [Position] {
    fn waypoint(&self, index: usize) -> Option<Position> {
        self.get(index).copied()
    }
}

impl PathProvider for Vec<Position> {
    fn waypoint(&self, index: usize) -> Option<Position> {
        self.get(index).copied()
    }
}

/// A fixed list of waypoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Waypoints(pub Vec<Position>);

impl PathProvider for Waypoints {
    fn waypoint(&self, index: usize) -> Option<Position> {
        self.0.get(index).copied()
    }
}

/// An agent's progress along the path.
///
/// The waypoint is resolved lazily and cached until it is reached. The index
/// only ever increases.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathCursor {
    index: usize,
    target: Option<Position>,
}

impl PathCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the waypoint currently being pursued.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current waypoint, fetched from the provider if not cached.
    pub fn resolve(&mut self, path: &dyn PathProvider) -> Option<Position> {
        if self.target.is_none() {
            self.target = path.waypoint(self.index);
        }
        self.target
    }

    /// Move on to the next waypoint. Returns `None` when the path is exhausted.
    pub fn advance(&mut self, path: &dyn PathProvider) -> Option<Position> {
        self.index += 1;
        self.target = path.waypoint(self.index);
        self.target
    }
}
