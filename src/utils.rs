//!  Various utilities

use std::f64::consts::PI;

/// Bring an angle into the `[-PI, PI]` range.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

#[inline]
pub fn translate_point(x: f64, y: f64, angle: f64, dist: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();
    let x2 = x + dist * cos;
    let y2 = y + dist * sin;
    (x2, y2)
}

/// Darken an ARGB color (used for walls hit on their E/W faces).
#[inline]
pub fn shade_color(color: u32) -> u32 {
    (color & 0xFF00_0000) | ((color >> 1) & 0x007F_7F7F)
}

#[inline]
pub fn color_alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

#[inline]
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-9 || (normalize_angle(3.0 * PI) + PI).abs() < 1e-9);
        assert!((normalize_angle(PI / 2.0 + 4.0 * PI) - PI / 2.0).abs() < 1e-9);
        assert!((normalize_angle(-PI / 2.0 - 2.0 * PI) + PI / 2.0).abs() < 1e-9);
        assert!((normalize_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_shade_color_keeps_alpha() {
        let c = rgb(200, 100, 50);
        let s = shade_color(c);
        assert_eq!(color_alpha(s), 0xFF);
        assert_eq!(s, rgb(100, 50, 25));
    }

    #[test]
    fn test_translate_point() {
        let (x, y) = translate_point(1.0, 2.0, 0.0, 3.0);
        assert!((x - 4.0).abs() < 1e-9);
        assert!((y - 2.0).abs() < 1e-9);
    }
}
