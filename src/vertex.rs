/// One sample of the sphere surface, projected onto the screen plane
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatticePoint {
    pub x: f64,
    pub y: f64,
}

impl LatticePoint {
    /// `[x, y]`, the shape the rasterizer takes
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    #[cfg(test)]
    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}
