//! Picks the destination portal for a reference point: an existing anchor
//! near the scaled position, or a freshly planned one.

use crate::config::toml_config::{ArrivalHeight, EngineConfig};
use crate::core::geometry::remap;
use crate::core::placement::{plan_portal_blocks, search, Placement, PlacementParams};
use crate::domain::model::{Axis, Cell, Realm, ReferencePoint, Traveler};
use crate::domain::ports::CellClassifier;

/// Where a reference point maps to in the paired realm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkTarget {
    pub destination: Realm,
    pub scale_factor: f64,
    /// Maximum horizontal distance at which an existing anchor is reused.
    pub budget: f64,
    pub candidate: Cell,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Existing { portal: ReferencePoint, axis: Axis },
    New(Placement),
}

pub struct LinkResolver<'a, W: CellClassifier + ?Sized> {
    config: &'a EngineConfig,
    world: &'a W,
}

impl<'a, W: CellClassifier + ?Sized> LinkResolver<'a, W> {
    pub fn new(config: &'a EngineConfig, world: &'a W) -> Self {
        Self { config, world }
    }

    pub fn target(&self, reference: &ReferencePoint) -> LinkTarget {
        let origin = reference.realm;
        let destination = origin.paired();
        let scale_factor = self.config.scale_factor(reference.flavor, origin, destination);
        let budget = self.config.min_distance(reference.flavor, destination);

        let x = (f64::from(reference.cell.x) * scale_factor).floor() as i32;
        let z = (f64::from(reference.cell.z) * scale_factor).floor() as i32;
        let y = self.arrival_y(origin, destination, reference.cell.y);

        let params = PlacementParams::from_config(self.config, destination, reference.flavor);

        LinkTarget {
            destination,
            scale_factor,
            budget,
            candidate: Cell::new(x, params.clamp_y(y), z),
        }
    }

    fn arrival_y(&self, origin: Realm, destination: Realm, y: i32) -> i32 {
        let from = self.config.realm(origin);
        let to = self.config.realm(destination);

        match to.arrival {
            ArrivalHeight::Fixed(fixed) => fixed,
            ArrivalHeight::Interpolate => remap(
                f64::from(y),
                f64::from(from.min_height),
                f64::from(from.max_height),
                f64::from(to.min_height),
                f64::from(to.effective_ceiling()),
            )
            .floor() as i32,
        }
    }

    /// Pick a destination for `reference`, reusing an anchor when one is
    /// close enough and otherwise planning a new portal (players only).
    pub fn resolve(
        &self,
        reference: &ReferencePoint,
        traveler: &Traveler,
        anchors: &[Cell],
    ) -> Option<Resolution> {
        let target = self.target(reference);
        tracing::debug!(
            "resolving {} portal at {} ({}) -> {} candidate {} (scale {}, budget {})",
            reference.flavor.key(),
            reference.cell,
            reference.realm,
            target.destination,
            target.candidate,
            target.scale_factor,
            target.budget
        );

        if let Some(existing) = self.select_existing(&target, reference, anchors) {
            return Some(existing);
        }

        if !traveler.can_create_portals() {
            tracing::debug!("no anchor in range and traveler may not create portals");
            return None;
        }

        let preferred_axis = self.world.classify(reference.realm, reference.cell).portal_axis()?;
        self.plan_new_portal(&target, reference, preferred_axis)
            .map(Resolution::New)
    }

    fn select_existing(
        &self,
        target: &LinkTarget,
        reference: &ReferencePoint,
        anchors: &[Cell],
    ) -> Option<Resolution> {
        for anchor in rank_anchors(target.candidate, anchors, target.budget, target.scale_factor) {
            match self.world.classify(target.destination, anchor).portal_axis() {
                Some(axis) => {
                    tracing::debug!("reusing anchor {} in {}", anchor, target.destination);
                    return Some(Resolution::Existing {
                        portal: ReferencePoint::new(target.destination, anchor, reference.flavor),
                        axis,
                    });
                }
                None => tracing::warn!(
                    "anchor {} in {} is not a portal anymore, skipping it",
                    anchor,
                    target.destination
                ),
            }
        }
        None
    }

    /// Floor-backed search, then floating search, then forced placement at the
    /// candidate. The last two only when enabled in the configuration.
    pub fn plan_new_portal(
        &self,
        target: &LinkTarget,
        reference: &ReferencePoint,
        preferred_axis: Axis,
    ) -> Option<Placement> {
        let params = PlacementParams::from_config(self.config, target.destination, reference.flavor);

        if let Some(found) = search(self.world, &params, target.candidate, preferred_axis, true) {
            return Some(found);
        }

        if self.config.allow_floating_placement {
            if let Some(found) = search(self.world, &params, target.candidate, preferred_axis, false)
            {
                return Some(found);
            }
        }

        if self.config.allow_forced_placement {
            tracing::debug!("forcing a portal at {}", target.candidate);
            return Some(Placement {
                reference: target.candidate,
                plan: plan_portal_blocks(&params, target.candidate, preferred_axis, true),
            });
        }

        tracing::debug!("no room for a new portal near {}", target.candidate);
        None
    }
}

/// Anchors within `budget + epsilon` of `candidate`, closest first. Only X
/// and Z count. Equal distances keep their input order.
pub fn rank_anchors(candidate: Cell, anchors: &[Cell], budget: f64, epsilon: f64) -> Vec<Cell> {
    let mut in_range: Vec<(Cell, f64)> = anchors
        .iter()
        .map(|anchor| (*anchor, candidate.horizontal_distance(*anchor)))
        .filter(|(_, distance)| *distance < budget + epsilon)
        .collect();

    in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
    in_range.into_iter().map(|(anchor, _)| anchor).collect()
}

/// The closest anchor in range, first-seen on ties.
pub fn nearest_anchor(candidate: Cell, anchors: &[Cell], budget: f64, epsilon: f64) -> Option<Cell> {
    rank_anchors(candidate, anchors, budget, epsilon)
        .into_iter()
        .next()
}
