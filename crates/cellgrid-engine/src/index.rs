//! O(1) per-cell lookup indexes
//!
//! Both indexes are built once per walk, up front. Without them the walk
//! would rescan the sheet's merge list and drawing list for every cell,
//! which is quadratic on busy sheets.

use ahash::AHashMap;

use cellgrid_core::{CellPos, CellRange};

use crate::sheet::DrawingObject;

/// What the merge index knows about one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeHit {
    /// The declared range this cell belongs to
    pub range: CellRange,
    /// This cell is the range's top-left (main) cell
    pub is_main: bool,
}

/// Maps every cell of every merged range to its range
#[derive(Debug, Default)]
pub struct MergeIndex {
    map: AHashMap<(u32, u32), usize>,
    ranges: Vec<CellRange>,
}

impl MergeIndex {
    pub fn build(merges: &[CellRange]) -> Self {
        let mut index = Self {
            map: AHashMap::with_capacity(merges.iter().map(|r| r.cell_count() as usize).sum()),
            ranges: merges.to_vec(),
        };
        for (id, range) in merges.iter().enumerate() {
            for pos in range.cells() {
                // First declaration wins if ranges overlap (malformed input).
                index.map.entry((pos.row, pos.col)).or_insert(id);
            }
        }
        index
    }

    /// Merge membership of a cell, if any
    pub fn lookup(&self, row: u32, col: u32) -> Option<MergeHit> {
        let id = *self.map.get(&(row, col))?;
        let range = self.ranges[id];
        Some(MergeHit {
            range,
            is_main: range.start == CellPos::new(row, col),
        })
    }

    pub fn ranges(&self) -> &[CellRange] {
        &self.ranges
    }
}

/// Buckets drawing ids by their from-anchor cell
#[derive(Debug, Default)]
pub struct DrawingIndex {
    map: AHashMap<(u32, u32), Vec<usize>>,
}

impl DrawingIndex {
    pub fn build(drawings: &[DrawingObject]) -> Self {
        let mut map: AHashMap<(u32, u32), Vec<usize>> = AHashMap::new();
        for (id, obj) in drawings.iter().enumerate() {
            map.entry((obj.from.row, obj.from.col)).or_default().push(id);
        }
        Self { map }
    }

    /// Ids of all drawings anchored at a cell, in document order
    pub fn ids_at(&self, row: u32, col: u32) -> &[usize] {
        self.map.get(&(row, col)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when at least one picture is anchored at the cell
    pub fn has_picture_at(&self, drawings: &[DrawingObject], row: u32, col: u32) -> bool {
        self.ids_at(row, col).iter().any(|&id| drawings[id].is_picture())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::AnchorMarker;
    use cellgrid_core::record::FloatingKind;

    fn drawing(kind: FloatingKind, row: u32, col: u32) -> DrawingObject {
        DrawingObject {
            kind,
            name: String::new(),
            text: None,
            from: AnchorMarker::at(row, col),
            to: None,
            extent_emu: None,
            data: None,
            natural_px: None,
        }
    }

    #[test]
    fn merge_index_membership() {
        let merges = vec![
            CellRange::parse("B2:C3").unwrap(),
            CellRange::parse("E1:E4").unwrap(),
        ];
        let index = MergeIndex::build(&merges);

        let main = index.lookup(2, 2).unwrap();
        assert!(main.is_main);
        assert_eq!(main.range.to_a1_string(), "B2:C3");

        let member = index.lookup(3, 3).unwrap();
        assert!(!member.is_main);
        assert_eq!(member.range, main.range);

        assert!(index.lookup(1, 1).is_none());
        assert!(!index.lookup(4, 5).unwrap().is_main);
    }

    #[test]
    fn drawing_index_buckets_by_from_cell() {
        let drawings = vec![
            drawing(FloatingKind::Picture, 1, 1),
            drawing(FloatingKind::Shape, 1, 1),
            drawing(FloatingKind::Chart, 2, 5),
        ];
        let index = DrawingIndex::build(&drawings);

        assert_eq!(index.ids_at(1, 1), &[0, 1]);
        assert_eq!(index.ids_at(2, 5), &[2]);
        assert!(index.ids_at(9, 9).is_empty());

        assert!(index.has_picture_at(&drawings, 1, 1));
        assert!(!index.has_picture_at(&drawings, 2, 5));
    }
}
