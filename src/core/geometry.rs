//! Pure helpers over integer cells: interval remapping and box enumeration.

use crate::domain::model::Cell;

/// Linear map of `value` from `[old_lo, old_hi]` onto `[new_lo, new_hi]`.
///
/// Callers guarantee a non-degenerate old interval.
pub fn remap(value: f64, old_lo: f64, old_hi: f64, new_lo: f64, new_hi: f64) -> f64 {
    new_lo + (new_hi - new_lo) / (old_hi - old_lo) * (value - old_lo)
}

/// Every cell of the box spanned by two corners, inclusive, in (x, y, z)
/// lexicographic order. `hollow` keeps only cells on the box surface.
pub fn enumerate_cells(corner_a: Cell, corner_b: Cell, hollow: bool) -> Vec<Cell> {
    let (min_x, max_x) = (corner_a.x.min(corner_b.x), corner_a.x.max(corner_b.x));
    let (min_y, max_y) = (corner_a.y.min(corner_b.y), corner_a.y.max(corner_b.y));
    let (min_z, max_z) = (corner_a.z.min(corner_b.z), corner_a.z.max(corner_b.z));

    let on_surface = |value: i32, lo: i32, hi: i32| value == lo || value == hi;

    let mut cells = Vec::new();
    for x in min_x..=max_x {
        let x_face = on_surface(x, min_x, max_x);
        for y in min_y..=max_y {
            let y_face = on_surface(y, min_y, max_y);
            for z in min_z..=max_z {
                if hollow && !(x_face || y_face || on_surface(z, min_z, max_z)) {
                    continue;
                }
                cells.push(Cell::new(x, y, z));
            }
        }
    }
    cells
}

/// The 26 cells surrounding `center`, in lexicographic offset order.
pub fn neighbors(center: Cell) -> impl Iterator<Item = Cell> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1)
                .filter(move |&dz| (dx, dy, dz) != (0, 0, 0))
                .map(move |dz| center.add(dx, dy, dz))
        })
    })
}
