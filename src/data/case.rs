use regex::{Regex, RegexBuilder};

use super::model::{CaseName, Geometry, Profile};

lazy_static::lazy_static! {
    // Four decimal angles right after an "angle" tag, e.g.
    // "P3_mls_angle_10.0_45.0_30.0_180.0_tropo".
    static ref RE_ANGLES: Regex =
        RegexBuilder::new(r"angle_?([\d.]+)_([\d.]+)_([\d.]+)_([\d.]+)")
            .case_insensitive(true)
            .build()
            .unwrap();
}

/// Recover the profile and viewing geometry from a case folder name.
///
/// Expected shape: `P<int>[_...]_angle[_]<vza>_<vaa>_<sza>_<saa>[_...]`.
/// Names that do not carry a usable angle tag get all-zero angles and a
/// warning; this never fails.
pub fn parse_case_name(name: &str) -> CaseName {
    let profile = parse_profile(name);
    let geometry = parse_angles(name).unwrap_or_else(|| {
        log::warn!("Could not parse angles from folder name '{name}', using 0.0");
        Geometry::default()
    });
    CaseName { profile, geometry }
}

fn parse_profile(name: &str) -> Profile {
    let head = name.split('_').next().unwrap_or(name);
    match head.strip_prefix('P') {
        Some(rest) if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) => rest
            .parse()
            .map(Profile::Number)
            .unwrap_or_else(|_| Profile::Label(rest.to_string())),
        Some(rest) => Profile::Label(rest.to_string()),
        None => Profile::Unknown,
    }
}

fn parse_angles(name: &str) -> Option<Geometry> {
    let has_tag = name
        .split('_')
        .any(|part| part.to_ascii_lowercase().starts_with("angle"));
    if !has_tag {
        return None;
    }

    let caps = RE_ANGLES.captures(name)?;
    let mut angles = [0.0; 4];
    for (slot, i) in angles.iter_mut().zip(1..=4) {
        *slot = caps.get(i)?.as_str().parse::<f64>().ok()?;
    }
    Some(Geometry::new(angles[0], angles[1], angles[2], angles[3]))
}
