//! Cell position and range types
//!
//! Positions are 1-based on both axes, matching the coordinates the document
//! library reports. `CellPos { row: 2, col: 3 }` is `C2`.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell position (e.g., "A1", "C2")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPos {
    /// Row index (1-based)
    pub row: u32,
    /// Column index (1-based, A=1, B=2, ..., XFD=16384)
    pub col: u32,
}

impl CellPos {
    /// Create a new cell position
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a position from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use cellgrid_core::CellPos;
    ///
    /// let pos = CellPos::parse("A1").unwrap();
    /// assert_eq!(pos.row, 1);
    /// assert_eq!(pos.col, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim().trim_start_matches('$');
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == 0 {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..pos])?;

        // Tolerate an absolute row marker ("A$1"); the engine never cares.
        let row_str = s[pos..].trim_start_matches('$');
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self { row, col })
    }

    /// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to a 1-based index (A = 1, Z = 26, AA = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        if col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }

        Ok(col)
    }

    /// Format as an A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row)
    }

    /// Create a range from this position to another
    pub fn to(&self, other: CellPos) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellPos {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular range of cells (e.g., "B2:C3")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start position (top-left after normalization)
    pub start: CellPos,
    /// End position (bottom-right after normalization)
    pub end: CellPos,
}

impl CellRange {
    /// Create a new range, normalized so start is top-left
    pub fn new(a: CellPos, b: CellPos) -> Self {
        Self {
            start: CellPos::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellPos::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a range from 1-based row/column indices
    pub fn from_indices(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::new(
            CellPos::new(start_row, start_col),
            CellPos::new(end_row, end_col),
        )
    }

    /// Create a single-cell range
    pub fn single(pos: CellPos) -> Self {
        Self { start: pos, end: pos }
    }

    /// Parse a range from "B2:C3" notation (a bare "C3" is a single cell)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(colon_pos) = s.find(':') {
            let start = CellPos::parse(&s[..colon_pos])?;
            let end = CellPos::parse(&s[colon_pos + 1..])?;
            Ok(Self::new(start, end))
        } else {
            Ok(Self::single(CellPos::parse(s)?))
        }
    }

    /// Check if a position is within this range
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row >= self.start.row
            && pos.row <= self.end.row
            && pos.col >= self.start.col
            && pos.col <= self.end.col
    }

    /// Number of rows spanned
    pub fn row_span(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns spanned
    pub fn col_span(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_span() as u64 * self.col_span() as u64
    }

    /// Check if this is a single cell
    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Check if another range pokes out of this one in any direction
    pub fn exceeded_by(&self, other: &CellRange) -> bool {
        other.start.row < self.start.row
            || other.start.col < self.start.col
            || other.end.row > self.end.row
            || other.end.col > self.end.col
    }

    /// Iterate over all positions in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
        }
    }

    /// Format as a "B2:C3" string (single cells format without a colon)
    pub fn to_a1_string(&self) -> String {
        if self.is_single_cell() {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over positions in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u32,
}

impl Iterator for CellRangeIterator {
    type Item = CellPos;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end.row {
            return None;
        }

        let pos = CellPos::new(self.current_row, self.current_col);

        self.current_col += 1;
        if self.current_col > self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        }

        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellPos::column_to_letters(1), "A");
        assert_eq!(CellPos::column_to_letters(2), "B");
        assert_eq!(CellPos::column_to_letters(26), "Z");
        assert_eq!(CellPos::column_to_letters(27), "AA");
        assert_eq!(CellPos::column_to_letters(28), "AB");
        assert_eq!(CellPos::column_to_letters(702), "ZZ");
        assert_eq!(CellPos::column_to_letters(703), "AAA");
        assert_eq!(CellPos::column_to_letters(16384), "XFD"); // Max column
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellPos::letters_to_column("A").unwrap(), 1);
        assert_eq!(CellPos::letters_to_column("Z").unwrap(), 26);
        assert_eq!(CellPos::letters_to_column("AA").unwrap(), 27);
        assert_eq!(CellPos::letters_to_column("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(CellPos::letters_to_column("aa").unwrap(), 27);

        assert!(CellPos::letters_to_column("XFE").is_err());
        assert!(CellPos::letters_to_column("").is_err());
    }

    #[test]
    fn test_parse() {
        let pos = CellPos::parse("A1").unwrap();
        assert_eq!(pos, CellPos::new(1, 1));

        let pos = CellPos::parse("B2").unwrap();
        assert_eq!(pos, CellPos::new(2, 2));

        // Absolute markers are tolerated and ignored
        let pos = CellPos::parse("$C$10").unwrap();
        assert_eq!(pos, CellPos::new(10, 3));

        assert!(CellPos::parse("").is_err());
        assert!(CellPos::parse("A").is_err());
        assert!(CellPos::parse("1").is_err());
        assert!(CellPos::parse("A0").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellPos::new(1, 1).to_string(), "A1");
        assert_eq!(CellPos::new(100, 3).to_string(), "C100");
    }

    #[test]
    fn test_range_parse() {
        let range = CellRange::parse("B2:C3").unwrap();
        assert_eq!(range.start, CellPos::new(2, 2));
        assert_eq!(range.end, CellPos::new(3, 3));
        assert_eq!(range.row_span(), 2);
        assert_eq!(range.col_span(), 2);

        // Single cell
        let range = CellRange::parse("C3").unwrap();
        assert!(range.is_single_cell());

        // Reversed endpoints normalize
        let range = CellRange::parse("C3:B2").unwrap();
        assert_eq!(range.to_a1_string(), "B2:C3");
    }

    #[test]
    fn test_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();

        assert!(range.contains(CellPos::new(2, 2))); // B2
        assert!(range.contains(CellPos::new(4, 4))); // D4
        assert!(range.contains(CellPos::new(3, 3))); // C3

        assert!(!range.contains(CellPos::new(1, 1))); // A1
        assert!(!range.contains(CellPos::new(5, 2))); // B5
    }

    #[test]
    fn test_range_exceeded_by() {
        let merge = CellRange::parse("B2:C3").unwrap();

        assert!(!merge.exceeded_by(&CellRange::parse("B2:C3").unwrap()));
        assert!(!merge.exceeded_by(&CellRange::parse("B2").unwrap()));
        assert!(merge.exceeded_by(&CellRange::parse("B2:D3").unwrap()));
        assert!(merge.exceeded_by(&CellRange::parse("A2:C3").unwrap()));
    }

    #[test]
    fn test_range_iterator() {
        let range = CellRange::parse("A1:B2").unwrap();
        let cells: Vec<_> = range.cells().collect();

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], CellPos::new(1, 1)); // A1
        assert_eq!(cells[1], CellPos::new(1, 2)); // B1
        assert_eq!(cells[2], CellPos::new(2, 1)); // A2
        assert_eq!(cells[3], CellPos::new(2, 2)); // B2
    }
}
