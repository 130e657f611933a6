//! Hit resolution for melee strikes and chaining beams.

use debugger_core::{BeamTrace, BugId};
use glam::Vec2;
use rand::Rng;

use crate::bugs::{BugRegistry, DeathNotice};

/// Tuning of a beam weapon that radius upgrades may change.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BeamSettings {
    pub(crate) max_distance: f32,
    pub(crate) chain_probability: f64,
    pub(crate) max_chain_depth: u32,
    pub(crate) chain_radius: f32,
}

/// Geometry shared by every beam regardless of weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BeamGeometry {
    /// Perpendicular distance within which a beam strikes a bug centre.
    pub(crate) hit_radius: f32,
    /// Shortest visible beam when a bug is struck.
    pub(crate) min_length: f32,
}

/// Damages every living bug whose centre lies within `radius` of `point`.
///
/// Returns the centres of the bugs that died together with their notices.
pub(crate) fn melee_strike(
    bugs: &mut BugRegistry,
    point: Vec2,
    radius: f32,
    damage: u32,
) -> (Vec<Vec2>, Vec<DeathNotice>) {
    let limit = radius * radius;
    let mut killed_centers = Vec::new();
    let mut deaths = Vec::new();

    for bug in bugs.iter_mut() {
        if !bug.is_alive() || bug.center().distance_squared(point) > limit {
            continue;
        }
        if let Some(notice) = bug.take_damage(damage) {
            killed_centers.push(notice.center);
            deaths.push(notice);
        }
    }

    (killed_centers, deaths)
}

/// Casts a beam from `emitter` toward `target`, chaining off killed bugs.
///
/// Every kill may spawn one chained cast from the dead bug's centre toward
/// the nearest living bug within the chain radius, up to the configured
/// depth. A zero-length aim casts nothing.
pub(crate) fn cast_beam<R: Rng>(
    bugs: &mut BugRegistry,
    emitter: Vec2,
    target: Vec2,
    settings: &BeamSettings,
    geometry: &BeamGeometry,
    damage: u32,
    rng: &mut R,
) -> (Vec<BeamTrace>, Vec<DeathNotice>) {
    let mut traces = Vec::new();
    let mut deaths = Vec::new();

    let mut origin = emitter;
    let mut aim = target;
    let mut depth = 0;

    loop {
        let Some(direction) = (aim - origin).try_normalize() else {
            break;
        };

        let Some((bug_id, along)) = first_hit(bugs, origin, direction, settings, geometry) else {
            let length = settings.max_distance.min(origin.distance(aim));
            traces.push(BeamTrace {
                origin,
                end: origin + direction * length,
                depth,
                struck: None,
            });
            break;
        };

        let length = along.min(settings.max_distance).max(geometry.min_length);
        traces.push(BeamTrace {
            origin,
            end: origin + direction * length,
            depth,
            struck: Some(bug_id),
        });

        let Some(notice) = bugs.get_mut(bug_id).and_then(|bug| bug.take_damage(damage)) else {
            break;
        };
        deaths.push(notice);

        if depth >= settings.max_chain_depth {
            break;
        }
        if rng.gen::<f64>() >= settings.chain_probability {
            break;
        }
        let Some((_, next_center)) = bugs.nearest_living_within(notice.center, settings.chain_radius)
        else {
            break;
        };

        origin = notice.center;
        aim = next_center;
        depth += 1;
    }

    (traces, deaths)
}

/// Living bug struck first along the ray, with its distance along the ray.
///
/// A bug is struck when its centre projects onto `(0, max_distance]` and lies
/// within the hit radius of the ray. Ties resolve to the lowest identifier.
fn first_hit(
    bugs: &BugRegistry,
    origin: Vec2,
    direction: Vec2,
    settings: &BeamSettings,
    geometry: &BeamGeometry,
) -> Option<(BugId, f32)> {
    let hit_limit = geometry.hit_radius * geometry.hit_radius;
    let mut best: Option<(BugId, f32)> = None;

    for bug in bugs.iter().filter(|bug| bug.is_alive()) {
        let offset = bug.center() - origin;
        let along = offset.dot(direction);
        if along <= 0.0 || along > settings.max_distance {
            continue;
        }
        let perpendicular = offset.length_squared() - along * along;
        if perpendicular > hit_limit {
            continue;
        }
        match best {
            Some((_, closest)) if closest <= along => {}
            _ => best = Some((bug.id(), along)),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use debugger_core::{config::ArchetypeProfile, ArchetypeId, Compass, GameConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn profile(hp: u32) -> ArchetypeProfile {
        let mut profile = GameConfig::default()
            .archetype(ArchetypeId::Ant)
            .cloned()
            .expect("ant profile");
        profile.hp = hp;
        profile.size = 20.0;
        profile
    }

    fn spawn_centered(bugs: &mut BugRegistry, center: Vec2, hp: u32) -> BugId {
        bugs.spawn(&profile(hp), center - Vec2::splat(10.0), Compass::North)
    }

    fn settings(chain_probability: f64, max_chain_depth: u32) -> BeamSettings {
        BeamSettings {
            max_distance: 600.0,
            chain_probability,
            max_chain_depth,
            chain_radius: 120.0,
        }
    }

    const GEOMETRY: BeamGeometry = BeamGeometry {
        hit_radius: 18.0,
        min_length: 12.0,
    };

    #[test]
    fn melee_hit_test_is_inclusive() {
        let mut bugs = BugRegistry::new();
        let edge = spawn_centered(&mut bugs, Vec2::new(130.0, 100.0), 1);
        let _outside = spawn_centered(&mut bugs, Vec2::new(131.0, 100.0 + 30.0), 1);

        let (centers, deaths) = melee_strike(&mut bugs, Vec2::new(100.0, 100.0), 30.0, 1);

        assert_eq!(centers, vec![Vec2::new(130.0, 100.0)]);
        assert_eq!(deaths.len(), 1);
        assert_eq!(deaths[0].bug_id, edge);
    }

    #[test]
    fn beam_strikes_the_nearest_bug_along_the_ray() {
        let mut bugs = BugRegistry::new();
        let far = spawn_centered(&mut bugs, Vec2::new(400.0, 300.0), 5);
        let near = spawn_centered(&mut bugs, Vec2::new(400.0, 500.0), 5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let (traces, deaths) = cast_beam(
            &mut bugs,
            Vec2::new(400.0, 600.0),
            Vec2::new(400.0, 100.0),
            &settings(0.0, 3),
            &GEOMETRY,
            1,
            &mut rng,
        );

        assert!(deaths.is_empty());
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].struck, Some(near));
        assert!((traces[0].length() - 100.0).abs() < 1e-3);
        assert_ne!(traces[0].struck, Some(far));
    }

    #[test]
    fn beam_ignores_bugs_outside_hit_radius_or_behind_emitter() {
        let mut bugs = BugRegistry::new();
        let _beside = spawn_centered(&mut bugs, Vec2::new(430.0, 400.0), 5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let (traces, _) = cast_beam(
            &mut bugs,
            Vec2::new(400.0, 600.0),
            Vec2::new(400.0, 500.0),
            &settings(0.0, 3),
            &GEOMETRY,
            1,
            &mut rng,
        );

        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].struck, None);
        assert!((traces[0].length() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn missed_beam_is_capped_at_max_distance() {
        let mut bugs = BugRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let (traces, _) = cast_beam(
            &mut bugs,
            Vec2::new(0.0, 1000.0),
            Vec2::new(0.0, 0.0),
            &settings(0.0, 3),
            &GEOMETRY,
            1,
            &mut rng,
        );

        assert!((traces[0].length() - 600.0).abs() < 1e-3);
    }

    #[test]
    fn short_hits_are_drawn_with_minimum_length() {
        let mut bugs = BugRegistry::new();
        let _close = spawn_centered(&mut bugs, Vec2::new(400.0, 595.0), 5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let (traces, _) = cast_beam(
            &mut bugs,
            Vec2::new(400.0, 600.0),
            Vec2::new(400.0, 100.0),
            &settings(0.0, 3),
            &GEOMETRY,
            1,
            &mut rng,
        );

        assert!((traces[0].length() - 12.0).abs() < 1e-3);
    }

    #[test]
    fn zero_length_aim_casts_nothing() {
        let mut bugs = BugRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let emitter = Vec2::new(400.0, 600.0);

        let (traces, deaths) = cast_beam(
            &mut bugs,
            emitter,
            emitter,
            &settings(1.0, 3),
            &GEOMETRY,
            1,
            &mut rng,
        );

        assert!(traces.is_empty());
        assert!(deaths.is_empty());
    }

    #[test]
    fn certain_chain_kills_a_line_of_bugs_up_to_depth() {
        let mut bugs = BugRegistry::new();
        let ids: Vec<BugId> = (0..6)
            .map(|index| spawn_centered(&mut bugs, Vec2::new(400.0, 500.0 - 100.0 * index as f32), 1))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let (traces, deaths) = cast_beam(
            &mut bugs,
            Vec2::new(400.0, 600.0),
            Vec2::new(400.0, 500.0),
            &settings(1.0, 3),
            &GEOMETRY,
            1,
            &mut rng,
        );

        assert_eq!(traces.len(), 4);
        let depths: Vec<u32> = traces.iter().map(|trace| trace.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
        let killed: Vec<BugId> = deaths.iter().map(|notice| notice.bug_id).collect();
        assert_eq!(killed, ids[..4].to_vec());
    }

    #[test]
    fn impossible_chain_stops_after_first_kill() {
        let mut bugs = BugRegistry::new();
        let _first = spawn_centered(&mut bugs, Vec2::new(400.0, 500.0), 1);
        let _second = spawn_centered(&mut bugs, Vec2::new(400.0, 450.0), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let (traces, deaths) = cast_beam(
            &mut bugs,
            Vec2::new(400.0, 600.0),
            Vec2::new(400.0, 500.0),
            &settings(0.0, 3),
            &GEOMETRY,
            1,
            &mut rng,
        );

        assert_eq!(traces.len(), 1);
        assert_eq!(deaths.len(), 1);
    }
}
