use crate::math::rotate;
use crate::sphere::SphereLattice;

/// Places the lattice on screen: a constant lean, then scale and offset
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    sin_tilt: f64,
    cos_tilt: f64,
}

impl Transform {
    /// Transform leaning the ball by `tilt_rad` radians
    pub fn new(tilt_rad: f64) -> Self {
        let (sin_tilt, cos_tilt) = tilt_rad.sin_cos();
        Transform { sin_tilt, cos_tilt }
    }

    /// Tilts around the object origin, then scales and translates.
    /// The order matters: tilt is defined in object space.
    pub fn apply(&self, lattice: &mut SphereLattice, scale: f64, tx: f64, ty: f64) {
        self.tilt(lattice);
        scale_translate(lattice, scale, tx, ty);
    }

    fn tilt(&self, lattice: &mut SphereLattice) {
        for point in lattice.iter_mut() {
            (point.x, point.y) = rotate(point.x, point.y, self.sin_tilt, self.cos_tilt);
        }
    }
}

fn scale_translate(lattice: &mut SphereLattice, scale: f64, tx: f64, ty: f64) {
    for point in lattice.iter_mut() {
        point.x = point.x * scale + tx;
        point.y = point.y * scale + ty;
    }
}
