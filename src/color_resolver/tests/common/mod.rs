#![allow(dead_code)]

use color_resolver::{Facelets, Rgb, Scan};

/// Clean reference colors for U, L, F, R, B, D.
pub const CANONICAL: [Rgb; 6] = [
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0xff, 0x80, 0x00),
    Rgb::new(0x1c, 0x8e, 0x0d),
    Rgb::new(0xc9, 0x11, 0x11),
    Rgb::new(0x28, 0x62, 0xb9),
    Rgb::new(0xf6, 0xeb, 0x20),
];

/// Legal scrambles in U, L, F, R, B, D facet order.
pub const SCRAMBLES: [&str; 4] = [
    "FLLLULFRFUFUFLDLBRLDDFFUBRURUURRRBBBBDRBBULBDDFRDDUFLD",
    "BULRUDFDDRDURLLBURLFRUFFFBLFLDRRRBFBFBUBBUDBDULUFDLLDR",
    "BLBLUFFFFDUUFLULRRLDLBFRDBUDULURFRRUUDRLBRBLBFDFBDDDBR",
    "DUULUFBDDFUUFLRBDFRBBUFBLBLRRFURDBFLRFRLBDFRDULURDLLBD",
];

pub fn facelets(letters: &str) -> Facelets {
    letters.parse().unwrap()
}

/// A noise free scan of `facelets`.
pub fn paint(facelets: &Facelets) -> Scan {
    Scan::from_fn(|position| CANONICAL[facelets.side(position).unwrap().index()])
}

/// A scan of `facelets` where every channel is off by up to `amplitude`.
pub fn noisy(facelets: &Facelets, rng: &mut fastrand::Rng, amplitude: i16) -> Scan {
    let mut jitter = |channel: u8| {
        (i16::from(channel) + rng.i16(-amplitude..=amplitude)).clamp(0, 255) as u8
    };
    Scan::from_fn(|position| {
        let Rgb { red, green, blue } = CANONICAL[facelets.side(position).unwrap().index()];
        Rgb::new(jitter(red), jitter(green), jitter(blue))
    })
}
