//! Track color assignment.

use rand::Rng;

/// Ten-entry qualitative palette, indexed by track position.
pub const TRACK_PALETTE: [&str; 10] = [
    "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#e6f598", "#abdda4", "#66c2a5",
    "#3288bd", "#5e4fa2",
];

/// Picks the display color for the track at `index`.
///
/// An explicit color always wins; otherwise the palette entry for `index`
/// is used, and tracks past the end of the palette get a random color.
pub fn track_color<R: Rng + ?Sized>(explicit: Option<&str>, index: usize, rng: &mut R) -> String {
    match explicit.filter(|hex| !hex.is_empty()) {
        Some(hex) => hex.to_string(),
        None => TRACK_PALETTE
            .get(index)
            .map(|hex| hex.to_string())
            .unwrap_or_else(|| random_color(rng)),
    }
}

/// A random `#rrggbb` color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06x}", rng.gen_range(0..=0xff_ffffu32))
}
