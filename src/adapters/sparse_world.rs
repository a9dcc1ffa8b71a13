use crate::core::geometry::enumerate_cells;
use crate::domain::model::{Axis, Cell, CellKind, Flavor, Realm};
use crate::domain::ports::{CellClassifier, VoxelWorld};
use std::collections::HashMap;

/// Implicit content of cells nobody has written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Terrain {
    /// Cells at or below this Y are solid ground.
    pub floor: Option<i32>,
    /// Cells at or above this Y are bedrock.
    pub ceiling: Option<i32>,
}

impl Terrain {
    fn classify(&self, y: i32) -> CellKind {
        if self.ceiling.is_some_and(|ceiling| y >= ceiling) {
            CellKind::Bedrock
        } else if self.floor.is_some_and(|floor| y <= floor) {
            CellKind::Solid
        } else {
            CellKind::Air
        }
    }
}

/// In-memory voxel grid for both realms: explicit cells over flat terrain.
#[derive(Debug, Clone, Default)]
pub struct SparseWorld {
    cells: HashMap<(Realm, Cell), CellKind>,
    terrain: HashMap<Realm, Terrain>,
}

impl SparseWorld {
    /// Empty world: every cell of both realms is air.
    pub fn new() -> Self {
        Self::default()
    }

    /// World with solid ground up to `floor_y` in `realm`.
    pub fn flat(realm: Realm, floor_y: i32) -> Self {
        Self::new().with_floor(realm, floor_y)
    }

    pub fn with_floor(mut self, realm: Realm, floor_y: i32) -> Self {
        self.terrain.entry(realm).or_default().floor = Some(floor_y);
        self
    }

    pub fn with_ceiling(mut self, realm: Realm, ceiling_y: i32) -> Self {
        self.terrain.entry(realm).or_default().ceiling = Some(ceiling_y);
        self
    }

    pub fn terrain(&self, realm: Realm) -> Terrain {
        self.terrain.get(&realm).copied().unwrap_or_default()
    }

    /// Frame ring around a `width` x `height` interior whose bottom-left
    /// cell is `bottom_left`.
    pub fn build_frame(
        &mut self,
        realm: Realm,
        bottom_left: Cell,
        axis: Axis,
        width: i32,
        height: i32,
        flavor: Flavor,
    ) {
        let direction = axis.direction();
        let from = bottom_left.step(direction, -1).add(0, -1, 0);
        let to = bottom_left.step(direction, width).add(0, height, 0);

        let (lo, hi) = (from.along(axis), to.along(axis));
        for cell in enumerate_cells(from, to, false) {
            let along = cell.along(axis);
            if along == lo || along == hi || cell.y == from.y || cell.y == to.y {
                self.apply(realm, cell, CellKind::Frame(flavor));
            }
        }
    }

    /// Fill a `width` x `height` interior with portal cells.
    pub fn fill_interior(&mut self, realm: Realm, bottom_left: Cell, axis: Axis, width: i32, height: i32) {
        let top_right = bottom_left
            .step(axis.direction(), width - 1)
            .add(0, height - 1, 0);

        for cell in enumerate_cells(bottom_left, top_right, false) {
            self.apply(realm, cell, CellKind::Portal(axis));
        }
    }

    /// Number of explicitly written cells of `kind` in `realm`.
    pub fn count(&self, realm: Realm, kind: CellKind) -> usize {
        self.cells
            .iter()
            .filter(|((cell_realm, _), cell_kind)| *cell_realm == realm && **cell_kind == kind)
            .count()
    }
}

impl CellClassifier for SparseWorld {
    fn classify(&self, realm: Realm, cell: Cell) -> CellKind {
        match self.cells.get(&(realm, cell)) {
            Some(kind) => *kind,
            None => self.terrain(realm).classify(cell.y),
        }
    }
}

impl VoxelWorld for SparseWorld {
    fn apply(&mut self, realm: Realm, cell: Cell, kind: CellKind) {
        self.cells.insert((realm, cell), kind);
    }
}
