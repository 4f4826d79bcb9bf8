use itertools::Itertools;
use log::debug;

use crate::{
    color::{ColorMetric, DistanceCache, PerceptualColor, Rgb},
    geometry::Side,
};

/// Reference crayons used to give each side center a readable name in logs
/// and cube printouts. Brown is left out because it is too easily mistaken for
/// red or orange.
pub const CRAYONS: [(&str, Rgb); 11] = [
    ("Rd", Rgb::new(0xc9, 0x11, 0x11)),
    ("Or", Rgb::new(0xd8, 0x4e, 0x09)),
    ("OR", Rgb::new(0xff, 0x80, 0x00)),
    ("Ye", Rgb::new(0xf6, 0xeb, 0x20)),
    ("Yg", Rgb::new(0x51, 0xc2, 0x01)),
    ("Gr", Rgb::new(0x1c, 0x8e, 0x0d)),
    ("Sy", Rgb::new(0x09, 0xc5, 0xf4)),
    ("Bu", Rgb::new(0x28, 0x62, 0xb9)),
    ("Pu", Rgb::new(0x7e, 0x44, 0xbc)),
    ("Wh", Rgb::new(0xff, 0xff, 0xff)),
    ("Bl", Rgb::new(0x00, 0x00, 0x00)),
];

/// Name every side center after its closest crayon, going through the sides
/// in order. A crayon is taken out of the box once a side uses it.
pub fn name_sides<M: ColorMetric>(
    centers: &[PerceptualColor; 6],
    cache: &mut DistanceCache<M>,
) -> [&'static str; 6] {
    let mut remaining = CRAYONS
        .iter()
        .map(|&(name, rgb)| (name, PerceptualColor::from_rgb(rgb)))
        .collect_vec();

    std::array::from_fn(|i| {
        let closest = remaining
            .iter()
            .map(|(_, crayon)| cache.distance(&centers[i], crayon))
            .position_min_by(f64::total_cmp);
        let name = closest.map_or("??", |index| remaining.remove(index).0);
        debug!(target: "classify", "{} center {} looks like {name}", Side::ALL[i], centers[i].rgb());
        name
    })
}
