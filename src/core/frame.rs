//! Frame detection: marching to frame walls and validating rectangular frames.

use crate::core::geometry::enumerate_cells;
use crate::domain::model::{
    Axis, Cell, CellKind, Direction, Flavor, FrameGeometry, Realm, ReferencePoint, Traveler,
};
use crate::domain::ports::CellClassifier;

/// Cells a freshly lit frame may enclose.
pub const REPLACEABLE: [CellKind; 2] = [CellKind::Air, CellKind::Fire];

/// Accepted interior size of a frame, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    pub min_height: i32,
    pub max_height: i32,
    pub min_width: i32,
    pub max_width: i32,
}

impl FrameBounds {
    fn height_fits(&self, height: i32) -> bool {
        height >= self.min_height && height <= self.max_height
    }

    fn width_fits(&self, width: i32) -> bool {
        width >= self.min_width && width <= self.max_width
    }
}

/// March from `origin` along `direction` for at most `max_offset` steps.
///
/// The first frame cell ends the march and yields the cell just before it,
/// tagged with that frame's flavor. Any other cell outside `passable` fails
/// the search, as does running out of steps.
pub fn find_limit<W: CellClassifier + ?Sized>(
    world: &W,
    realm: Realm,
    origin: Cell,
    direction: Direction,
    passable: &[CellKind],
    max_offset: i32,
) -> Option<ReferencePoint> {
    for offset in 1..=max_offset {
        let target = origin.step(direction, offset);
        let kind = world.classify(realm, target);

        if let Some(flavor) = kind.frame_flavor() {
            return Some(ReferencePoint::new(
                realm,
                target.step(direction, -1),
                flavor,
            ));
        }

        if !passable.contains(&kind) {
            return None;
        }
    }

    None
}

/// Detect the frame around `seed`, trying the X axis before the Z axis.
pub fn compute_frame<W: CellClassifier + ?Sized>(
    world: &W,
    realm: Realm,
    seed: Cell,
    passable: &[CellKind],
    bounds: &FrameBounds,
) -> Option<FrameGeometry> {
    compute_frame_along(world, realm, seed, passable, bounds, &Axis::SCAN_ORDER)
}

/// Like [`compute_frame`], restricted to the given axes in the given order.
pub fn compute_frame_along<W: CellClassifier + ?Sized>(
    world: &W,
    realm: Realm,
    seed: Cell,
    passable: &[CellKind],
    bounds: &FrameBounds,
    axes: &[Axis],
) -> Option<FrameGeometry> {
    let bottom = find_limit(world, realm, seed, Direction::DOWN, passable, bounds.max_height)?;
    let top = find_limit(world, realm, seed, Direction::UP, passable, bounds.max_height)?;

    let height = top.cell.y - bottom.cell.y + 1;
    if !bounds.height_fits(height) {
        tracing::debug!("frame at {} rejected: height {} out of bounds", seed, height);
        return None;
    }

    let (axis, left, right) = axes.iter().find_map(|&axis| {
        let direction = axis.direction();
        let left = find_limit(world, realm, seed, direction.reversed(), passable, bounds.max_width)?;
        let right = find_limit(world, realm, seed, direction, passable, bounds.max_width)?;

        let width = right.cell.along(axis) - left.cell.along(axis) + 1;
        bounds.width_fits(width).then_some((axis, left, right))
    })?;

    let corner = |horizontal: Cell, vertical: Cell| horizontal.with_y(vertical.y);
    let bottom_left = corner(left.cell, bottom.cell);
    let bottom_right = corner(right.cell, bottom.cell);
    let top_left = corner(left.cell, top.cell);
    let top_right = corner(right.cell, top.cell);

    let flavor = left.flavor;
    let direction = axis.direction();

    let walls_ok = check_wall(world, realm, bottom_left, bottom_right, Direction::DOWN, flavor)
        && check_wall(world, realm, top_left, top_right, Direction::UP, flavor)
        && check_wall(world, realm, bottom_left, top_left, direction.reversed(), flavor)
        && check_wall(world, realm, bottom_right, top_right, direction, flavor);

    if !walls_ok {
        tracing::debug!("frame at {} rejected: incomplete {:?} wall", seed, flavor);
        return None;
    }

    Some(FrameGeometry {
        realm,
        bottom_left,
        top_right,
        axis,
        flavor,
        interior: enumerate_cells(bottom_left, top_right, false),
    })
}

/// Every cell next to the line `corner_a..=corner_b`, shifted by
/// `frame_direction`, must be frame material of `flavor`.
pub fn check_wall<W: CellClassifier + ?Sized>(
    world: &W,
    realm: Realm,
    corner_a: Cell,
    corner_b: Cell,
    frame_direction: Direction,
    flavor: Flavor,
) -> bool {
    enumerate_cells(corner_a, corner_b, false)
        .into_iter()
        .all(|cell| world.classify(realm, cell.offset(frame_direction)) == CellKind::Frame(flavor))
}

/// Reference point of the lit portal containing `cell`, if any.
pub fn locate_reference_point<W: CellClassifier + ?Sized>(
    world: &W,
    realm: Realm,
    cell: Cell,
    bounds: &FrameBounds,
) -> Option<ReferencePoint> {
    let axis = world.classify(realm, cell).portal_axis()?;
    let passable = [CellKind::Portal(axis)];

    compute_frame_along(world, realm, cell, &passable, bounds, &[axis])
        .map(|frame| frame.reference_point())
}

/// Reference point of the portal the traveler's hitbox touches. When several
/// portal cells are touched, the one closest to the traveler wins.
pub fn locate_reference_point_for<W: CellClassifier + ?Sized>(
    world: &W,
    traveler: &Traveler,
    bounds: &FrameBounds,
) -> Option<ReferencePoint> {
    let (min, max) = traveler.overlapped_cells();

    let mut closest: Option<(Cell, f64)> = None;
    for cell in enumerate_cells(min, max, false) {
        if world.classify(traveler.realm, cell).portal_axis().is_none() {
            continue;
        }
        let distance = cell.center().distance(&traveler.position);
        if closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((cell, distance));
        }
    }

    let (touched, _) = closest?;
    locate_reference_point(world, traveler.realm, touched, bounds)
}
