use crate::domain::model::{
    Cell, CellKind, Flavor, FrameGeometry, Location, PortalBlockPlan, Realm, ReferencePoint,
    Traveler,
};
use serde::Serialize;

/// Read access to the voxel grid of both realms.
pub trait CellClassifier {
    fn classify(&self, realm: Realm, cell: Cell) -> CellKind;
}

/// Read/write access to the voxel grid of both realms.
pub trait VoxelWorld: CellClassifier {
    fn apply(&mut self, realm: Realm, cell: Cell, kind: CellKind);
}

/// Known portal anchors, one independent namespace per (realm, flavor).
pub trait PortalRegistry {
    /// Anchors in insertion order.
    fn anchors(&self, realm: Realm, flavor: Flavor) -> Vec<Cell>;
    fn save(&mut self, anchor: Cell, realm: Realm, flavor: Flavor);
    fn delete(&mut self, anchor: Cell, realm: Realm, flavor: Flavor);
}

/// A mutation offered to observers before it is committed.
#[derive(Debug, Clone, Copy)]
pub enum Proposal<'a> {
    Teleport {
        traveler: &'a Traveler,
        destination: &'a Location,
    },
    CreatePortal {
        plan: &'a PortalBlockPlan,
    },
    IgnitePortal {
        frame: &'a FrameGeometry,
    },
    DestroyPortals {
        realm: Realm,
        portals: &'a [ReferencePoint],
    },
}

impl Proposal<'_> {
    pub fn kind(&self) -> ProposalKind {
        match self {
            Proposal::Teleport { .. } => ProposalKind::Teleport,
            Proposal::CreatePortal { .. } => ProposalKind::CreatePortal,
            Proposal::IgnitePortal { .. } => ProposalKind::IgnitePortal,
            Proposal::DestroyPortals { .. } => ProposalKind::DestroyPortals,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    Teleport,
    CreatePortal,
    IgnitePortal,
    DestroyPortals,
}

/// Observers that may veto a proposed mutation.
pub trait Notifier {
    /// Returns `true` when the proposal is vetoed.
    fn notify(&mut self, proposal: &Proposal<'_>) -> bool;
}

impl<F> Notifier for F
where
    F: FnMut(&Proposal<'_>) -> bool,
{
    fn notify(&mut self, proposal: &Proposal<'_>) -> bool {
        self(proposal)
    }
}
