use crate::color::Color;
use crate::sphere::{SphereLattice, LAT_BANDS, LON_BANDS};
use crate::surface::Surface;

/// One filled triangle of the ball's checkerboard
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// Latitude row of the quad the triangle belongs to
    pub row: usize,
    /// Longitude column of the quad the triangle belongs to
    pub column: usize,
    pub corners: [[f64; 2]; 3],
    pub color: Color,
}

/// Splits the lattice into a red and white checkerboard
#[derive(Clone, Copy, Debug)]
pub struct Tiler {
    pub primary: Color,
    pub secondary: Color,
}

impl Default for Tiler {
    fn default() -> Self {
        Tiler {
            primary: Color::RED,
            secondary: Color::WHITE,
        }
    }
}

impl Tiler {
    /// Lists the triangles for one frame, two per quad
    ///
    /// The color flips after every quad and keeps flipping across columns;
    /// with an odd number of quads per column that yields a checkerboard.
    pub fn tiles(&self, lattice: &SphereLattice, alternate: bool) -> Vec<Tile> {
        let mut alternate = alternate;
        let mut tiles = Vec::with_capacity((LAT_BANDS - 1) * (LON_BANDS - 1) * 2);

        for j in 0..LON_BANDS - 1 {
            for i in 0..LAT_BANDS - 1 {
                let color = if alternate { self.primary } else { self.secondary };
                let a = lattice.get(i, j).as_array();
                let b = lattice.get(i + 1, j).as_array();
                let c = lattice.get(i + 1, j + 1).as_array();
                let d = lattice.get(i, j + 1).as_array();

                tiles.push(Tile { row: i, column: j, corners: [a, b, c], color });
                tiles.push(Tile { row: i, column: j, corners: [c, d, a], color });
                alternate = !alternate;
            }
        }

        tiles
    }

    /// Fills the frame's triangles into `target`, returning how many were drawn
    pub fn paint<S: Surface>(&self, lattice: &SphereLattice, alternate: bool, target: &mut S) -> usize {
        let tiles = self.tiles(lattice, alternate);
        for tile in &tiles {
            let [p0, p1, p2] = tile.corners;
            target.fill_triangle(p0, p1, p2, tile.color);
        }
        tiles.len()
    }
}
