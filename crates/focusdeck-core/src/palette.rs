//! Theme palette helpers for the presentation layer.
//!
//! Pure string/color math with no dependency on the rest of the core: the
//! dashboard feeds the stored theme color through these to derive chart
//! series colors. Hue and saturation are preserved; only lightness ramps.

/// Normalize a user-supplied color token to `#rrggbb`.
///
/// The theme color is stored as an opaque token, so anything can arrive
/// here. Only ASCII hex digits are kept: the first six survive, shorter
/// results are zero-padded, and a token with no hex digits at all falls
/// back to black.
pub fn sanitize_hex(color: &str) -> String {
    let mut hex: String = color
        .chars()
        .filter(char::is_ascii_hexdigit)
        .take(6)
        .collect();
    while hex.len() < 6 {
        hex.push('0');
    }
    format!("#{hex}")
}

/// A monochromatic `n`-color ramp from `base_hex` toward lightness 0.9.
pub fn monochromatic(base_hex: &str, n: usize) -> Vec<String> {
    let base = sanitize_hex(base_hex);
    let (r, g, b) = parse_rgb(&base);
    let (h, l, s) = rgb_to_hls(r, g, b);
    (0..n)
        .map(|i| {
            let factor = i as f64 / n.max(1) as f64;
            let new_l = (l + factor * (0.9 - l)).min(0.9);
            let (nr, ng, nb) = hls_to_rgb(h, new_l, s);
            format!(
                "#{:02x}{:02x}{:02x}",
                (nr * 255.0).round() as u8,
                (ng * 255.0).round() as u8,
                (nb * 255.0).round() as u8
            )
        })
        .collect()
}

fn parse_rgb(sanitized: &str) -> (f64, f64, f64) {
    let hex = &sanitized[1..];
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0) as f64 / 255.0
    };
    (channel(0), channel(2), channel(4))
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let l = (minc + maxc) / 2.0;
    if (maxc - minc).abs() < f64::EPSILON {
        return (0.0, l, 0.0);
    }
    let delta = maxc - minc;
    let s = if l <= 0.5 {
        delta / (maxc + minc)
    } else {
        delta / (2.0 - maxc - minc)
    };
    let rc = (maxc - r) / delta;
    let gc = (maxc - g) / delta;
    let bc = (maxc - b) / delta;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
