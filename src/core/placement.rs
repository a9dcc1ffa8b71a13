//! Bounded search for a volume where a new portal can be generated.

use crate::config::toml_config::EngineConfig;
use crate::core::geometry::{enumerate_cells, neighbors};
use crate::domain::model::{Axis, Cell, Direction, Flavor, PlannedCell, PortalBlockPlan, Realm};
use crate::domain::ports::CellClassifier;
use std::collections::{HashSet, VecDeque};

/// Everything the search needs to know about the destination realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementParams {
    pub realm: Realm,
    pub flavor: Flavor,
    pub portal_height: i32,
    pub portal_width: i32,
    pub max_horizontal_offset: i32,
    pub max_vertical_offset: i32,
    pub realm_min_height: i32,
    /// Structural ceiling if the realm has one, otherwise its max height.
    pub realm_ceiling: i32,
}

impl PlacementParams {
    pub fn from_config(config: &EngineConfig, realm: Realm, flavor: Flavor) -> Self {
        let realm_config = config.realm(realm);
        Self {
            realm,
            flavor,
            portal_height: config.portal_size.height.new,
            portal_width: config.portal_size.width.new,
            max_horizontal_offset: config.placement_offset.horizontal,
            max_vertical_offset: config.placement_offset.vertical,
            realm_min_height: realm_config.min_height,
            realm_ceiling: realm_config.effective_ceiling(),
        }
    }

    pub fn lowest_y(&self) -> i32 {
        self.realm_min_height + 1
    }

    pub fn highest_y(&self) -> i32 {
        self.realm_ceiling - (self.portal_height + 1)
    }

    /// Moves `y` into the band where a new portal fits vertically.
    pub fn clamp_y(&self, y: i32) -> i32 {
        y.min(self.highest_y()).max(self.lowest_y())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementFlags {
    /// Demand buildable ground under the portal.
    pub require_floor: bool,
    /// Skip validation and overwrite whatever is in the way.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub reference: Cell,
    pub plan: PortalBlockPlan,
}

/// Lay out a new portal whose bottom-left interior cell is `reference`.
///
/// The frame is written as a full slab first and the interior on top of it.
/// With `with_platform`, a ledge of frame material runs along both sides of
/// the bottom row with air cleared above it, so a traveler can step out of a
/// floating portal.
pub fn plan_portal_blocks(
    params: &PlacementParams,
    reference: Cell,
    axis: Axis,
    with_platform: bool,
) -> PortalBlockPlan {
    let mut plan = PortalBlockPlan::new(params.realm, reference, axis, params.flavor);
    let direction = axis.direction();
    let side = axis.side();
    let (width, height) = (params.portal_width, params.portal_height);

    let frame_from = reference.offset(direction.reversed()).offset(Direction::DOWN);
    let frame_to = reference.step(direction, width).step(Direction::UP, height);
    for cell in enumerate_cells(frame_from, frame_to, false) {
        plan.insert(cell, PlannedCell::Frame);
    }

    if with_platform {
        for horizontal in 0..width {
            let base = reference
                .offset(Direction::DOWN)
                .step(direction, horizontal);

            for ledge in [base.offset(side.reversed()), base.offset(side)] {
                plan.insert(ledge, PlannedCell::Platform);
                for vertical in 1..=height {
                    plan.insert(ledge.step(Direction::UP, vertical), PlannedCell::ClearAir);
                }
            }
        }
    }

    let interior_to = reference
        .step(direction, width - 1)
        .step(Direction::UP, height - 1);
    for cell in enumerate_cells(reference, interior_to, false) {
        plan.insert(cell, PlannedCell::Interior);
    }

    plan
}

/// Whether a portal along `axis` can be generated at `cell` without
/// destroying anything, returning its plan when it can.
pub fn is_valid_location<W: CellClassifier + ?Sized>(
    world: &W,
    params: &PlacementParams,
    cell: Cell,
    axis: Axis,
    require_floor: bool,
) -> Option<PortalBlockPlan> {
    let direction = axis.direction();
    let side = axis.side();

    if require_floor {
        let floor_from = cell
            .offset(side.reversed())
            .step(Direction::DOWN, 2);
        let floor_to = cell
            .offset(side)
            .step(direction, params.portal_width - 1)
            .step(Direction::DOWN, 2);

        let has_floor = enumerate_cells(floor_from, floor_to, false)
            .into_iter()
            .all(|floor| world.classify(params.realm, floor).is_buildable());
        if !has_floor {
            return None;
        }
    }

    let plan = plan_portal_blocks(params, cell, axis, !require_floor);

    let fits = plan.writes().all(|(target, kind)| {
        let existing = world.classify(params.realm, target);
        existing == kind || existing.is_replaceable()
    });

    fits.then_some(plan)
}

/// Breadth-first expansion from `desired` that stops at the first cell where
/// either axis validates, trying `preferred_axis` first.
///
/// Cells farther than the configured offsets from `desired`, or outside the
/// realm's usable height band, are neither validated nor expanded, so the
/// work is bounded by the offsets.
pub fn search<W: CellClassifier + ?Sized>(
    world: &W,
    params: &PlacementParams,
    desired: Cell,
    preferred_axis: Axis,
    require_floor: bool,
) -> Option<Placement> {
    let mut visited: HashSet<Cell> = HashSet::new();
    let mut queue: VecDeque<Cell> = VecDeque::new();
    queue.push_back(desired);

    let axes = [preferred_axis, preferred_axis.perpendicular()];

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }

        if current.horizontal_distance(desired) > f64::from(params.max_horizontal_offset) {
            continue;
        }

        if (current.y - desired.y).abs() > params.max_vertical_offset {
            continue;
        }

        if current.y < params.lowest_y() || current.y > params.highest_y() {
            continue;
        }

        queue.extend(neighbors(current).filter(|next| !visited.contains(next)));

        for axis in axes {
            if let Some(plan) = is_valid_location(world, params, current, axis, require_floor) {
                tracing::debug!(
                    "placement found at {} along {:?} after {} cells (floor: {})",
                    current,
                    axis,
                    visited.len(),
                    require_floor
                );
                return Some(Placement {
                    reference: current,
                    plan,
                });
            }
        }
    }

    tracing::debug!(
        "no placement within offsets around {} (floor: {}, visited {} cells)",
        desired,
        require_floor,
        visited.len()
    );
    None
}

/// Plan a portal at `seed` directly, honouring `flags` without searching.
pub fn plan_at<W: CellClassifier + ?Sized>(
    world: &W,
    params: &PlacementParams,
    seed: Cell,
    axis: Axis,
    flags: PlacementFlags,
) -> Option<PortalBlockPlan> {
    if flags.force {
        return Some(plan_portal_blocks(params, seed, axis, true));
    }
    is_valid_location(world, params, seed, axis, flags.require_floor)
}
