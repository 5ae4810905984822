use crate::math::{EIGHTH_PI, HALF_PI};
use crate::vertex::LatticePoint;

/// Latitude rows, poles included
pub const LAT_BANDS: usize = 10;
/// Longitude columns, front half of the globe only
pub const LON_BANDS: usize = 9;

/// Fixed grid of sphere samples, indexed `[latitude][longitude]`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SphereLattice {
    pub points: [[LatticePoint; LON_BANDS]; LAT_BANDS],
}

impl SphereLattice {
    /// Point at latitude row `lat`, longitude column `lon`
    pub fn get(&self, lat: usize, lon: usize) -> LatticePoint {
        self.points[lat][lon]
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &LatticePoint> {
        self.points.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LatticePoint> {
        self.points.iter_mut().flatten()
    }
}

/// Latitude of row `index` for the given texture phase
///
/// The poles never move; the eight interior bands slide together with the
/// phase, which is what makes the ball look like it spins.
pub fn latitude(phase: f64, index: usize) -> f64 {
    match index {
        0 => -HALF_PI,
        i if i == LAT_BANDS - 1 => HALF_PI,
        i => -HALF_PI + phase + (i - 1) as f64 * EIGHTH_PI,
    }
}

/// Longitude of column `index`, from -90 to +90 degrees
pub fn longitude(index: usize) -> f64 {
    -HALF_PI + index as f64 * EIGHTH_PI
}

/// Owns the lattice and rebuilds it for each frame
#[derive(Debug, Default)]
pub struct SphereModel {
    lattice: SphereLattice,
}

impl SphereModel {
    /// Model with an all-zero lattice; call [`SphereModel::regenerate`] before use
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every point for `phase`, overwriting the previous frame
    pub fn regenerate(&mut self, phase: f64) -> &mut SphereLattice {
        let mut sin_lat = [0.0; LAT_BANDS];
        for (i, s) in sin_lat.iter_mut().enumerate() {
            *s = latitude(phase, i).sin();
        }

        for j in 0..LON_BANDS {
            let (y, l) = longitude(j).sin_cos();
            for (i, row) in self.lattice.points.iter_mut().enumerate() {
                row[j] = LatticePoint {
                    x: sin_lat[i] * l,
                    y,
                };
            }
        }

        &mut self.lattice
    }
}
