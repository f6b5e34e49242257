use crate::Pos;

/// Estimate of the remaining cost between two cells. Implementations must be pure.
/// A* only guarantees optimal paths when the estimate never exceeds the true cost.
pub trait Heuristic {
    fn estimate(&self, a: &Pos, b: &Pos) -> u32;
}

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), admissible and
/// consistent for 4-directional movement with unit step cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    #[inline]
    fn estimate(&self, a: &Pos, b: &Pos) -> u32 {
        a.manhattan_distance(b)
    }
}

/// Manhattan distance scaled by `factor`. With a factor above 1 this is Weighted A*: nodes
/// closer to the goal are expanded sooner, usually with fewer expansions, but the returned
/// path is no longer guaranteed to be the shortest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weighted {
    pub factor: f32,
}

impl Weighted {
    pub fn new(factor: f32) -> Weighted {
        Weighted { factor }
    }
}

impl Heuristic for Weighted {
    fn estimate(&self, a: &Pos, b: &Pos) -> u32 {
        (a.manhattan_distance(b) as f32 * self.factor) as u32
    }
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    fn estimate(&self, a: &Pos, b: &Pos) -> u32 {
        (**self).estimate(a, b)
    }
}
