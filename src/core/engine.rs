use crate::config::toml_config::EngineConfig;
use crate::core::adjust::adjust;
use crate::core::frame::{self, REPLACEABLE};
use crate::core::placement::{plan_at, PlacementFlags, PlacementParams};
use crate::core::resolver::{LinkResolver, Resolution};
use crate::domain::model::{
    Axis, Cell, CellKind, Destination, Direction, Flavor, PortalBlockPlan, Realm, ReferencePoint,
    Traveler,
};
use crate::domain::ports::{Notifier, PortalRegistry, Proposal, VoxelWorld};
use std::sync::Arc;

/// Ceiling used when probing finds no bedrock in the column.
pub const BACKUP_CEILING: i32 = 128;

/// Entry point for portal events: locating portals, lighting frames,
/// resolving teleports and forgetting destroyed portals.
///
/// Every mutation is offered to the notifier first; a veto leaves both the
/// world and the registry untouched.
pub struct PortalEngine<W: VoxelWorld, R: PortalRegistry, N: Notifier> {
    config: Arc<EngineConfig>,
    world: W,
    registry: R,
    notifier: N,
}

impl<W: VoxelWorld, R: PortalRegistry, N: Notifier> PortalEngine<W, R, N> {
    pub fn new(config: EngineConfig, world: W, registry: R, notifier: N) -> Self {
        Self {
            config: Arc::new(config),
            world,
            registry,
            notifier,
        }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<EngineConfig> {
        Arc::clone(&self.config)
    }

    /// Swap in a new snapshot. Resolutions already holding the old one are unaffected.
    pub fn reload(&mut self, config: EngineConfig) {
        tracing::info!("configuration reloaded");
        self.config = Arc::new(config);
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn into_parts(self) -> (W, R, N) {
        (self.world, self.registry, self.notifier)
    }

    /// Replace the ceiling of every realm with `probe_ceiling` set by the
    /// topmost bedrock cell of the column at x=0, z=0.
    pub fn probe_ceilings(&mut self) {
        let mut next = (*self.config).clone();
        let mut changed = false;

        for realm in Realm::ALL {
            if !next.realm(realm).probe_ceiling {
                continue;
            }
            let ceiling = self.probe_ceiling(realm);
            next.realm_mut(realm).ceiling = Some(ceiling);
            changed = true;
        }

        if changed {
            self.config = Arc::new(next);
        }
    }

    fn probe_ceiling(&self, realm: Realm) -> i32 {
        let bounds = self.config.realm(realm);
        let found = (bounds.min_height..=bounds.max_height)
            .rev()
            .find(|&y| self.world.classify(realm, Cell::new(0, y, 0)) == CellKind::Bedrock);

        match found {
            Some(y) => {
                tracing::debug!("{} ceiling probed at y={}", realm, y);
                y
            }
            None => {
                tracing::warn!(
                    "Could not find the {} ceiling. Using backup value {}",
                    realm,
                    BACKUP_CEILING
                );
                BACKUP_CEILING
            }
        }
    }

    /// Reference point of the lit portal containing `cell`.
    pub fn locate_reference_point(&self, realm: Realm, cell: Cell) -> Option<ReferencePoint> {
        frame::locate_reference_point(&self.world, realm, cell, &self.config.frame_bounds())
    }

    /// Reference point of the lit portal the traveler is standing in.
    pub fn locate_reference_point_for(&self, traveler: &Traveler) -> Option<ReferencePoint> {
        frame::locate_reference_point_for(&self.world, traveler, &self.config.frame_bounds())
    }

    /// Find or build the exit for `traveler` entering through `reference`.
    ///
    /// A newly planned portal is offered as [`Proposal::CreatePortal`] and,
    /// once materialized, saved as an anchor. The final location is offered
    /// as [`Proposal::Teleport`] before it is returned.
    pub fn resolve_teleport(
        &mut self,
        reference: &ReferencePoint,
        traveler: &Traveler,
    ) -> Option<Destination> {
        let config = Arc::clone(&self.config);
        let destination_realm = reference.realm.paired();
        let anchors = self.registry.anchors(destination_realm, reference.flavor);

        let resolution =
            LinkResolver::new(&config, &self.world).resolve(reference, traveler, &anchors)?;

        let (exit, axis, created) = match resolution {
            Resolution::Existing { portal, axis } => (portal, axis, false),
            Resolution::New(placement) => {
                let plan = placement.plan;
                if !self.materialize(&plan) {
                    return None;
                }
                (plan.reference_point(), plan.axis, true)
            }
        };

        let location = adjust(
            &self.world,
            traveler,
            reference,
            &exit,
            config.portal_size.width.max,
        )?;

        if self.notifier.notify(&Proposal::Teleport {
            traveler,
            destination: &location,
        }) {
            tracing::debug!("teleport to {} vetoed", exit.cell);
            return None;
        }

        Some(Destination {
            location,
            axis,
            portal: exit,
            created,
        })
    }

    fn materialize(&mut self, plan: &PortalBlockPlan) -> bool {
        if self.notifier.notify(&Proposal::CreatePortal { plan }) {
            tracing::debug!("portal creation at {} vetoed", plan.reference);
            return false;
        }

        for (cell, kind) in plan.writes() {
            self.world.apply(plan.realm, cell, kind);
        }
        self.registry.save(plan.reference, plan.realm, plan.flavor);

        tracing::info!(
            "created {} portal in {} at {} ({} cells)",
            plan.flavor.key(),
            plan.realm,
            plan.reference,
            plan.len()
        );
        true
    }

    /// Locate the portal the traveler stands in and resolve its exit.
    pub fn travel(&mut self, traveler: &Traveler) -> Option<Destination> {
        let reference = self.locate_reference_point_for(traveler)?;
        self.resolve_teleport(&reference, traveler)
    }

    /// Plan a new portal whose bottom-left interior cell is `seed`, without
    /// writing anything.
    pub fn plan_new_structure(
        &self,
        realm: Realm,
        seed: Cell,
        axis: Axis,
        flavor: Flavor,
        flags: PlacementFlags,
    ) -> Option<PortalBlockPlan> {
        let params = PlacementParams::from_config(&self.config, realm, flavor);
        plan_at(&self.world, &params, seed, axis, flags)
    }

    /// Light the frame around `seed`, fill it with portal cells and save its
    /// reference point as an anchor.
    pub fn ignite(&mut self, realm: Realm, seed: Cell) -> Option<ReferencePoint> {
        if !self.world.classify(realm, seed).is_replaceable() {
            return None;
        }

        let frame =
            frame::compute_frame(&self.world, realm, seed, &REPLACEABLE, &self.config.frame_bounds())?;

        if !frame
            .interior
            .iter()
            .all(|cell| self.world.classify(realm, *cell).is_replaceable())
        {
            tracing::debug!("frame at {} has an obstructed interior", frame.bottom_left);
            return None;
        }

        if self.notifier.notify(&Proposal::IgnitePortal { frame: &frame }) {
            tracing::debug!("ignition at {} vetoed", frame.bottom_left);
            return None;
        }

        for cell in &frame.interior {
            self.world.apply(realm, *cell, CellKind::Portal(frame.axis));
        }

        let reference = frame.reference_point();
        self.registry.save(reference.cell, realm, reference.flavor);
        tracing::info!(
            "lit {} portal in {} at {} ({}x{})",
            reference.flavor.key(),
            realm,
            reference.cell,
            frame.width(),
            frame.height()
        );

        Some(reference)
    }

    /// Drop the anchors of every portal broken by removing `cells`. Call it
    /// before the cells are removed from the world.
    pub fn forget_portals(&mut self, realm: Realm, cells: &[Cell]) -> Vec<ReferencePoint> {
        let mut portals: Vec<ReferencePoint> = Vec::new();

        for &cell in cells {
            for portal_cell in self.affected_portal_cells(realm, cell) {
                if let Some(reference) = self.locate_reference_point(realm, portal_cell) {
                    if !portals.contains(&reference) {
                        portals.push(reference);
                    }
                }
            }
        }

        if portals.is_empty() {
            return portals;
        }

        if self.notifier.notify(&Proposal::DestroyPortals {
            realm,
            portals: &portals,
        }) {
            tracing::debug!("destruction of {} portal(s) vetoed", portals.len());
            return Vec::new();
        }

        for reference in &portals {
            self.registry.delete(reference.cell, realm, reference.flavor);
            tracing::info!(
                "forgot {} portal in {} at {}",
                reference.flavor.key(),
                realm,
                reference.cell
            );
        }

        portals
    }

    /// Portal cells whose frame loses `cell`: the cell itself when it is a
    /// portal, otherwise its portal neighbours lying in the same plane.
    fn affected_portal_cells(&self, realm: Realm, cell: Cell) -> Vec<Cell> {
        match self.world.classify(realm, cell) {
            CellKind::Portal(_) => vec![cell],
            CellKind::Frame(_) => [
                Direction::EAST,
                Direction::WEST,
                Direction::SOUTH,
                Direction::NORTH,
                Direction::UP,
                Direction::DOWN,
            ]
            .into_iter()
            .filter_map(|direction| {
                let neighbour = cell.offset(direction);
                let axis = self.world.classify(realm, neighbour).portal_axis()?;
                let in_plane = match axis {
                    Axis::X => direction.dz == 0,
                    Axis::Z => direction.dx == 0,
                };
                in_plane.then_some(neighbour)
            })
            .collect(),
            _ => Vec::new(),
        }
    }
}
