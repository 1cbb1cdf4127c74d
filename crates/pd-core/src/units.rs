// pd-core/src/units.rs

use uom::si::f64::{Length as UomLength, Volume as UomVolume};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Volume = UomVolume;

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn cm(v: f64) -> Length {
    use uom::si::length::centimeter;
    Length::new::<centimeter>(v)
}

#[inline]
pub fn in_m3(v: Volume) -> f64 {
    use uom::si::volume::cubic_meter;
    v.get::<cubic_meter>()
}

#[inline]
pub fn in_m(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}
