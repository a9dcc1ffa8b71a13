//! Maps a traveler's place inside the entry portal onto the exit portal.

use crate::core::frame::find_limit;
use crate::core::geometry::remap;
use crate::domain::model::{Axis, CellKind, Location, Position, ReferencePoint, Traveler};
use crate::domain::ports::CellClassifier;

/// Span `[lo, hi)` covered by the portal interior along its axis.
fn interior_span<W: CellClassifier + ?Sized>(
    world: &W,
    reference: &ReferencePoint,
    max_width: i32,
) -> Option<(Axis, f64, f64)> {
    let axis = world.classify(reference.realm, reference.cell).portal_axis()?;
    let far = find_limit(
        world,
        reference.realm,
        reference.cell,
        axis.direction(),
        &[CellKind::Portal(axis)],
        max_width,
    )?;

    let lo = f64::from(reference.cell.along(axis));
    let hi = f64::from(far.cell.along(axis) + 1);
    Some((axis, lo, hi))
}

fn rotate_yaw(yaw: f32, degrees: f32) -> f32 {
    (yaw + degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Final location and orientation of `traveler` leaving through `exit`.
///
/// Returns `None` when the far wall of either portal can't be found.
pub fn adjust<W: CellClassifier + ?Sized>(
    world: &W,
    traveler: &Traveler,
    entry: &ReferencePoint,
    exit: &ReferencePoint,
    max_width: i32,
) -> Option<Location> {
    let Some((entry_axis, entry_lo, entry_hi)) = interior_span(world, entry, max_width) else {
        tracing::debug!("no far wall for entry portal at {}", entry.cell);
        return None;
    };
    let Some((exit_axis, exit_lo, exit_hi)) = interior_span(world, exit, max_width) else {
        tracing::debug!("no far wall for exit portal at {}", exit.cell);
        return None;
    };

    let position_factor = remap(traveler.position.along(entry_axis), entry_lo, entry_hi, 0.0, 1.0);
    let mut along = remap(position_factor, 0.0, 1.0, exit_lo, exit_hi);

    let half_width = traveler.hitbox.half_width(exit_axis);
    along = if exit_hi - exit_lo >= 2.0 * half_width {
        along.clamp(exit_lo + half_width, exit_hi - half_width)
    } else {
        (exit_lo + exit_hi) / 2.0
    };

    let across = f64::from(exit.cell.along(exit_axis.perpendicular())) + 0.5;
    let y = f64::from(exit.cell.y);
    let position = match exit_axis {
        Axis::X => Position::new(along, y, across),
        Axis::Z => Position::new(across, y, along),
    };

    let yaw = if entry_axis == exit_axis {
        traveler.yaw
    } else {
        rotate_yaw(traveler.yaw, 90.0)
    };

    Some(Location {
        realm: exit.realm,
        position,
        yaw,
        pitch: traveler.pitch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sparse_world::SparseWorld;
    use crate::domain::model::{Cell, Flavor, Realm};
    use crate::domain::ports::VoxelWorld;

    fn portal(world: &mut SparseWorld, realm: Realm, at: Cell, axis: Axis, width: i32) -> ReferencePoint {
        world.build_frame(realm, at, axis, width, 3, Flavor::Custom);
        world.fill_interior(realm, at, axis, width, 3);
        ReferencePoint::new(realm, at, Flavor::Custom)
    }

    #[test]
    fn test_center_maps_to_center() {
        let mut world = SparseWorld::new();
        let entry = portal(&mut world, Realm::Overworld, Cell::new(0, 64, 0), Axis::X, 3);
        let exit = portal(&mut world, Realm::Nether, Cell::new(10, 40, 7), Axis::X, 5);

        let traveler = Traveler::player(Realm::Overworld, Position::new(1.5, 64.0, 0.5));
        let location = adjust(&world, &traveler, &entry, &exit, 21).unwrap();

        assert_eq!(location.realm, Realm::Nether);
        assert_eq!(location.position, Position::new(12.5, 40.0, 7.5));
        assert_eq!(location.position.containing_cell(), Cell::new(12, 40, 7));
    }

    #[test]
    fn test_edge_is_clamped_to_hitbox() {
        let mut world = SparseWorld::new();
        let entry = portal(&mut world, Realm::Overworld, Cell::new(0, 64, 0), Axis::Z, 4);
        let exit = portal(&mut world, Realm::Nether, Cell::new(3, 40, -2), Axis::Z, 2);

        let traveler = Traveler::player(Realm::Overworld, Position::new(0.5, 64.0, 0.0));
        let location = adjust(&world, &traveler, &entry, &exit, 21).unwrap();

        assert_eq!(location.position.z, -2.0 + 0.3);
        assert_eq!(location.position.x, 3.5);
    }

    #[test]
    fn test_relative_offset_preserved() {
        let mut world = SparseWorld::new();
        let entry = portal(&mut world, Realm::Overworld, Cell::new(0, 64, 0), Axis::X, 4);
        let exit = portal(&mut world, Realm::Nether, Cell::new(0, 40, 0), Axis::X, 8);

        let traveler = Traveler::player(Realm::Overworld, Position::new(1.0, 64.0, 0.5));
        let location = adjust(&world, &traveler, &entry, &exit, 21).unwrap();

        assert_eq!(location.position.x, 2.0);
    }

    #[test]
    fn test_axis_change_rotates_yaw() {
        let mut world = SparseWorld::new();
        let entry = portal(&mut world, Realm::Overworld, Cell::new(0, 64, 0), Axis::X, 2);
        let exit = portal(&mut world, Realm::Nether, Cell::new(0, 40, 0), Axis::Z, 2);

        let mut traveler = Traveler::player(Realm::Overworld, Position::new(1.0, 64.0, 0.5));
        traveler.yaw = 135.0;
        traveler.pitch = -20.0;

        let location = adjust(&world, &traveler, &entry, &exit, 21).unwrap();

        assert_eq!(location.yaw, -135.0);
        assert_eq!(location.pitch, -20.0);
        assert_eq!(location.position, Position::new(0.5, 40.0, 1.0));
    }

    #[test]
    fn test_same_axis_keeps_yaw() {
        let mut world = SparseWorld::new();
        let entry = portal(&mut world, Realm::Overworld, Cell::new(0, 64, 0), Axis::Z, 2);
        let exit = portal(&mut world, Realm::Nether, Cell::new(0, 40, 0), Axis::Z, 2);

        let mut traveler = Traveler::player(Realm::Overworld, Position::new(0.5, 64.0, 1.0));
        traveler.yaw = 45.0;

        assert_eq!(adjust(&world, &traveler, &entry, &exit, 21).unwrap().yaw, 45.0);
    }

    #[test]
    fn test_missing_wall_aborts() {
        let mut world = SparseWorld::new();
        let entry = portal(&mut world, Realm::Overworld, Cell::new(0, 64, 0), Axis::X, 3);
        let exit = portal(&mut world, Realm::Nether, Cell::new(0, 40, 0), Axis::X, 3);
        world.apply(Realm::Nether, Cell::new(3, 40, 0), CellKind::Air);

        let traveler = Traveler::player(Realm::Overworld, Position::new(1.5, 64.0, 0.5));
        assert!(adjust(&world, &traveler, &entry, &exit, 21).is_none());

        let missing = ReferencePoint::new(Realm::Nether, Cell::new(50, 40, 50), Flavor::Custom);
        assert!(adjust(&world, &traveler, &entry, &missing, 21).is_none());
    }

    #[test]
    fn test_rotate_yaw_wraps() {
        assert_eq!(rotate_yaw(0.0, 90.0), 90.0);
        assert_eq!(rotate_yaw(90.0, 90.0), -180.0);
        assert_eq!(rotate_yaw(-170.0, 90.0), -80.0);
    }
}
