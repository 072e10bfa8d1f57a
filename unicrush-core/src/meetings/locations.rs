use rand::seq::SliceRandom;

/// Well-trafficked on-campus spots a first meetup can be pointed at. Every
/// institute shares the same list; the point is a public, easy-to-find
/// place, not a per-building lookup.
pub const SAFE_LOCATIONS: &[&str] = &[
    "Main canteen",
    "Coworking space",
    "Entrance turnstiles",
    "Gym entrance",
    "Food court by the main entrance",
    "Food court under the stairs",
    "Main cloakroom",
    "Lower-floor cloakroom",
];

pub fn random_location() -> String {
    SAFE_LOCATIONS
        .choose(&mut rand::thread_rng())
        .expect("location list is non-empty")
        .to_string()
}
