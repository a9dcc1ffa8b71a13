use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the two paired coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Realm {
    Overworld,
    Nether,
}

impl Realm {
    pub const ALL: [Realm; 2] = [Realm::Overworld, Realm::Nether];

    /// The realm a portal in `self` leads to.
    pub fn paired(self) -> Realm {
        match self {
            Realm::Overworld => Realm::Nether,
            Realm::Nether => Realm::Overworld,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Realm::Overworld => "overworld",
            Realm::Nether => "nether",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Frame material family. Custom and vanilla portals never share ratios,
/// registries or distance budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Custom,
    Vanilla,
}

impl Flavor {
    pub const ALL: [Flavor; 2] = [Flavor::Custom, Flavor::Vanilla];

    pub fn is_custom(self) -> bool {
        matches!(self, Flavor::Custom)
    }

    pub fn key(self) -> &'static str {
        match self {
            Flavor::Custom => "custom",
            Flavor::Vanilla => "vanilla",
        }
    }
}

/// Horizontal axis a portal plane runs along. Y is always vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Fixed order in which frame detection tries the axes.
    pub const SCAN_ORDER: [Axis; 2] = [Axis::X, Axis::Z];

    pub fn direction(self) -> Direction {
        match self {
            Axis::X => Direction::EAST,
            Axis::Z => Direction::SOUTH,
        }
    }

    /// Unit vector perpendicular to the portal plane.
    pub fn side(self) -> Direction {
        self.perpendicular().direction()
    }

    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

/// Integer unit step between neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl Direction {
    pub const UP: Direction = Direction::new(0, 1, 0);
    pub const DOWN: Direction = Direction::new(0, -1, 0);
    pub const EAST: Direction = Direction::new(1, 0, 0);
    pub const WEST: Direction = Direction::new(-1, 0, 0);
    pub const SOUTH: Direction = Direction::new(0, 0, 1);
    pub const NORTH: Direction = Direction::new(0, 0, -1);

    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }

    pub fn reversed(self) -> Direction {
        Direction::new(-self.dx, -self.dy, -self.dz)
    }
}

/// Integer-aligned voxel coordinate. Ordering is lexicographic on (x, y, z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn step(self, direction: Direction, times: i32) -> Cell {
        Cell::new(
            self.x + direction.dx * times,
            self.y + direction.dy * times,
            self.z + direction.dz * times,
        )
    }

    pub fn offset(self, direction: Direction) -> Cell {
        self.step(direction, 1)
    }

    pub fn add(self, dx: i32, dy: i32, dz: i32) -> Cell {
        Cell::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn along(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Z => self.z,
        }
    }

    pub fn with_y(self, y: i32) -> Cell {
        Cell::new(self.x, y, self.z)
    }

    /// Euclidean distance ignoring Y.
    pub fn horizontal_distance(self, other: Cell) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dz = f64::from(self.z - other.z);
        (dx * dx + dz * dz).sqrt()
    }

    pub fn center(self) -> Position {
        Position::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Continuous coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Z => self.z,
        }
    }

    pub fn containing_cell(&self) -> Cell {
        Cell::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// What occupies a cell, as far as portal logic cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Air,
    Fire,
    Frame(Flavor),
    Portal(Axis),
    Solid,
    Bedrock,
    Other,
}

impl CellKind {
    /// Cells a portal may overwrite freely.
    pub fn is_replaceable(self) -> bool {
        matches!(self, CellKind::Air | CellKind::Fire)
    }

    /// Cells solid enough to stand on.
    pub fn is_buildable(self) -> bool {
        matches!(self, CellKind::Frame(_) | CellKind::Solid | CellKind::Bedrock)
    }

    pub fn frame_flavor(self) -> Option<Flavor> {
        match self {
            CellKind::Frame(flavor) => Some(flavor),
            _ => None,
        }
    }

    pub fn portal_axis(self) -> Option<Axis> {
        match self {
            CellKind::Portal(axis) => Some(axis),
            _ => None,
        }
    }
}

/// Canonical bottom, lowest-coordinate interior cell of a validated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub realm: Realm,
    pub cell: Cell,
    pub flavor: Flavor,
}

impl ReferencePoint {
    pub fn new(realm: Realm, cell: Cell, flavor: Flavor) -> Self {
        Self {
            realm,
            cell,
            flavor,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.flavor.is_custom()
    }
}

/// A detected, fully validated portal frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    pub realm: Realm,
    pub bottom_left: Cell,
    pub top_right: Cell,
    pub axis: Axis,
    pub flavor: Flavor,
    pub interior: Vec<Cell>,
}

impl FrameGeometry {
    pub fn reference_point(&self) -> ReferencePoint {
        ReferencePoint::new(self.realm, self.bottom_left, self.flavor)
    }

    pub fn width(&self) -> i32 {
        self.top_right.along(self.axis) - self.bottom_left.along(self.axis) + 1
    }

    pub fn height(&self) -> i32 {
        self.top_right.y - self.bottom_left.y + 1
    }
}

/// Technical role of a cell in a portal that is about to be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedCell {
    Frame,
    Interior,
    Platform,
    ClearAir,
}

/// Cells to write when materializing a new portal. Later insertions for the
/// same cell replace earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalBlockPlan {
    pub realm: Realm,
    pub reference: Cell,
    pub axis: Axis,
    pub flavor: Flavor,
    pub cells: BTreeMap<Cell, PlannedCell>,
}

impl PortalBlockPlan {
    pub fn new(realm: Realm, reference: Cell, axis: Axis, flavor: Flavor) -> Self {
        Self {
            realm,
            reference,
            axis,
            flavor,
            cells: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, cell: Cell, planned: PlannedCell) {
        self.cells.insert(cell, planned);
    }

    /// Concrete cell content the plan writes for a role.
    pub fn target_kind(&self, planned: PlannedCell) -> CellKind {
        match planned {
            PlannedCell::Frame | PlannedCell::Platform => CellKind::Frame(self.flavor),
            PlannedCell::Interior => CellKind::Portal(self.axis),
            PlannedCell::ClearAir => CellKind::Air,
        }
    }

    pub fn writes(&self) -> impl Iterator<Item = (Cell, CellKind)> + '_ {
        self.cells
            .iter()
            .map(|(cell, planned)| (*cell, self.target_kind(*planned)))
    }

    pub fn reference_point(&self) -> ReferencePoint {
        ReferencePoint::new(self.realm, self.reference, self.flavor)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelerKind {
    Player,
    Entity,
}

/// Axis-aligned hitbox dimensions, anchored at the traveler's feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width_x: f64,
    pub width_z: f64,
    pub height: f64,
}

impl Hitbox {
    pub fn half_width(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width_x / 2.0,
            Axis::Z => self.width_z / 2.0,
        }
    }
}

impl Default for Hitbox {
    fn default() -> Self {
        Self {
            width_x: 0.6,
            width_z: 0.6,
            height: 1.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traveler {
    pub kind: TravelerKind,
    pub realm: Realm,
    pub position: Position,
    pub yaw: f32,
    pub pitch: f32,
    pub hitbox: Hitbox,
}

impl Traveler {
    pub fn player(realm: Realm, position: Position) -> Self {
        Self {
            kind: TravelerKind::Player,
            realm,
            position,
            yaw: 0.0,
            pitch: 0.0,
            hitbox: Hitbox::default(),
        }
    }

    pub fn can_create_portals(&self) -> bool {
        self.kind == TravelerKind::Player
    }

    /// Inclusive cell range overlapped by the hitbox.
    pub fn overlapped_cells(&self) -> (Cell, Cell) {
        let half_x = self.hitbox.width_x / 2.0;
        let half_z = self.hitbox.width_z / 2.0;
        let min = Position::new(
            self.position.x - half_x,
            self.position.y,
            self.position.z - half_z,
        );
        let max = Position::new(
            self.position.x + half_x,
            self.position.y + self.hitbox.height,
            self.position.z + half_z,
        );
        (min.containing_cell(), max.containing_cell())
    }
}

/// Final placement of a traveler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub realm: Realm,
    pub position: Position,
    pub yaw: f32,
    pub pitch: f32,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub location: Location,
    pub axis: Axis,
    pub portal: ReferencePoint,
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realm_pairing_is_a_bijection() {
        for realm in Realm::ALL {
            assert_ne!(realm.paired(), realm);
            assert_eq!(realm.paired().paired(), realm);
        }
    }

    #[test]
    fn test_axis_side_is_perpendicular() {
        assert_eq!(Axis::X.side(), Direction::SOUTH);
        assert_eq!(Axis::Z.side(), Direction::EAST);
    }

    #[test]
    fn test_cell_ordering_is_lexicographic() {
        let mut cells = vec![Cell::new(1, 0, 0), Cell::new(0, 2, 0), Cell::new(0, 1, 5)];
        cells.sort();
        assert_eq!(
            cells,
            vec![Cell::new(0, 1, 5), Cell::new(0, 2, 0), Cell::new(1, 0, 0)]
        );
    }

    #[test]
    fn test_containing_cell_floors_negative_coordinates() {
        let position = Position::new(-0.5, 64.2, -3.0);
        assert_eq!(position.containing_cell(), Cell::new(-1, 64, -3));
    }

    #[test]
    fn test_plan_later_insert_wins() {
        let mut plan = PortalBlockPlan::new(Realm::Nether, Cell::default(), Axis::X, Flavor::Custom);
        plan.insert(Cell::new(0, 0, 0), PlannedCell::Frame);
        plan.insert(Cell::new(0, 0, 0), PlannedCell::Interior);

        assert_eq!(plan.len(), 1);
        let writes: Vec<_> = plan.writes().collect();
        assert_eq!(writes, vec![(Cell::new(0, 0, 0), CellKind::Portal(Axis::X))]);
    }

    #[test]
    fn test_traveler_overlapped_cells() {
        let traveler = Traveler::player(Realm::Overworld, Position::new(0.5, 64.0, 0.5));
        let (min, max) = traveler.overlapped_cells();
        assert_eq!(min, Cell::new(0, 64, 0));
        assert_eq!(max, Cell::new(0, 65, 0));
    }
}
