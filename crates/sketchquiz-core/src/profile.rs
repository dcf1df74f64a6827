//! Avatar and color assignment.
//!
//! Each new player gets an avatar and a color drawn uniformly from the pool
//! entries nobody in the roster is using. Once a pool is exhausted the pick
//! falls back to the full pool, so duplicates become possible.

use sketchquiz_protocol::Profile;

use crate::rng::GameRng;

pub const AVATARS: &[&str] = &[
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮",
];

pub const COLORS: &[&str] = &[
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    "#F8B739", "#52B788", "#E76F51", "#2A9D8F",
];

pub fn assign_profile<'a>(
    rng: &mut GameRng,
    in_use: impl Iterator<Item = &'a Profile> + Clone,
) -> Profile {
    let avatar = pick_unused(rng, AVATARS, in_use.clone().map(|p| p.avatar.as_str()));
    let color = pick_unused(rng, COLORS, in_use.map(|p| p.color.as_str()));
    Profile { avatar, color }
}

fn pick_unused<'a>(
    rng: &mut GameRng,
    pool: &[&'static str],
    used: impl Iterator<Item = &'a str>,
) -> String {
    let used: Vec<&str> = used.collect();
    let free: Vec<&'static str> = pool
        .iter()
        .copied()
        .filter(|candidate| !used.contains(candidate))
        .collect();

    let source = if free.is_empty() { pool } else { &free[..] };
    rng.choose(source).copied().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_unique_until_pool_runs_out() {
        let mut rng = GameRng::seed_from_u64(11);
        let mut assigned: Vec<Profile> = Vec::new();
        for _ in 0..AVATARS.len() {
            let profile = assign_profile(&mut rng, assigned.iter());
            assert!(assigned.iter().all(|p| p.avatar != profile.avatar));
            assert!(assigned.iter().all(|p| p.color != profile.color));
            assigned.push(profile);
        }
    }

    #[test]
    fn exhausted_pool_falls_back_to_full_pool() {
        let mut rng = GameRng::seed_from_u64(12);
        let everything: Vec<Profile> = AVATARS
            .iter()
            .zip(COLORS)
            .map(|(a, c)| Profile {
                avatar: (*a).to_string(),
                color: (*c).to_string(),
            })
            .collect();
        let profile = assign_profile(&mut rng, everything.iter());
        assert!(AVATARS.contains(&profile.avatar.as_str()));
        assert!(COLORS.contains(&profile.color.as_str()));
    }
}
