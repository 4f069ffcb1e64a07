//! Point sources for gamification.

/// Actions that award points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointSource {
    FirstInvite,
}

impl PointSource {
    pub fn points(&self) -> u32 {
        match self {
            PointSource::FirstInvite => 100,
        }
    }
}
