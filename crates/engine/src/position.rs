//! Cell identity: a (row, col) pair with A1-style label parsing/formatting.

/// Upper bound on rows, matching spec's "16384 rows" convention.
pub const MAX_ROWS: usize = 16384;
/// Upper bound on columns, matching spec's "16384 cols" convention.
pub const MAX_COLS: usize = 16384;

/// A cell's coordinates: 0-indexed row and column.
///
/// `Position` is the stable identity used everywhere edges, caches, and
/// lookups are keyed — cells are never addressed by a direct handle that
/// could be invalidated by a container resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionParseError {
    #[error("malformed cell label")]
    Malformed,
    #[error("cell label out of range")]
    OutOfRange,
}

impl Position {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True iff `0 <= row < MAX_ROWS` and `0 <= col < MAX_COLS`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse an A1-style label ("A1", "AA27") into a `Position`, rejecting
    /// labels that decode outside `MAX_ROWS`/`MAX_COLS`.
    ///
    /// Accepts one or more uppercase letters followed by one or more decimal
    /// digits. Letters encode the column in base-26 (A=0, Z=25, AA=26, ...);
    /// digits encode the 1-indexed row, returned 0-indexed. Never panics on
    /// malformed or oversized input.
    pub fn parse(label: &str) -> Result<Self, PositionParseError> {
        let pos = Self::decode_label(label)?;
        if !pos.is_valid() {
            return Err(PositionParseError::OutOfRange);
        }
        Ok(pos)
    }

    /// Decode an A1-style label's syntax without enforcing `MAX_ROWS`/
    /// `MAX_COLS`: used by the formula lexer, where a syntactically valid
    /// but out-of-range reference (spec §4.2) must still produce a
    /// `CellRef`, not a parse failure — it only becomes a `Ref` error at
    /// evaluation time (§4.6), via `Sheet::lookup`. A label whose decoded
    /// column or row overflows `u64` still reports `OutOfRange` rather than
    /// panicking.
    pub(crate) fn decode_label(label: &str) -> Result<Self, PositionParseError> {
        let split = label
            .char_indices()
            .find(|(_, c)| !c.is_ascii_uppercase())
            .map(|(i, _)| i)
            .unwrap_or(label.len());

        let (letters, digits) = label.split_at(split);
        if letters.is_empty() || digits.is_empty() {
            return Err(PositionParseError::Malformed);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PositionParseError::Malformed);
        }

        let mut col: u64 = 0;
        for c in letters.bytes() {
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add((c - b'A') as u64 + 1))
                .ok_or(PositionParseError::OutOfRange)?;
        }
        let col = (col - 1) as usize;

        let row_1based: u64 = digits.parse().map_err(|_| PositionParseError::OutOfRange)?;
        if row_1based == 0 {
            return Err(PositionParseError::OutOfRange);
        }
        let row = (row_1based - 1) as usize;

        Ok(Position::new(row, col))
    }

    /// Format back into an A1-style label. Bijective with `parse` over valid
    /// positions (spec property 7).
    pub fn format(&self) -> String {
        let mut col_str = String::new();
        let mut n = self.col + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            col_str.insert(0, (b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        format!("{col_str}{}", self.row + 1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_labels() {
        assert_eq!(Position::parse("A1").unwrap(), Position::new(0, 0));
        assert_eq!(Position::parse("B1").unwrap(), Position::new(0, 1));
        assert_eq!(Position::parse("A2").unwrap(), Position::new(1, 0));
    }

    #[test]
    fn parses_multi_letter_columns() {
        assert_eq!(Position::parse("Z1").unwrap(), Position::new(0, 25));
        assert_eq!(Position::parse("AA1").unwrap(), Position::new(0, 26));
        assert_eq!(Position::parse("AA27").unwrap(), Position::new(26, 26));
        assert_eq!(Position::parse("AZ1").unwrap(), Position::new(0, 51));
        assert_eq!(Position::parse("BA1").unwrap(), Position::new(0, 52));
    }

    #[test]
    fn formats_back_to_label() {
        assert_eq!(Position::new(0, 0).format(), "A1");
        assert_eq!(Position::new(0, 25).format(), "Z1");
        assert_eq!(Position::new(0, 26).format(), "AA1");
        assert_eq!(Position::new(26, 26).format(), "AA27");
    }

    #[test]
    fn round_trips_for_every_valid_position_sampled() {
        for (row, col) in [(0, 0), (0, 25), (0, 26), (26, 26), (9999, 9999)] {
            let p = Position::new(row, col);
            assert_eq!(Position::parse(&p.format()).unwrap(), p);
        }
    }

    #[test]
    fn rejects_malformed_labels() {
        assert_eq!(Position::parse(""), Err(PositionParseError::Malformed));
        assert_eq!(Position::parse("1A"), Err(PositionParseError::Malformed));
        assert_eq!(Position::parse("A"), Err(PositionParseError::Malformed));
        assert_eq!(Position::parse("1"), Err(PositionParseError::Malformed));
        assert_eq!(Position::parse("A0"), Err(PositionParseError::OutOfRange));
        assert_eq!(Position::parse("a1"), Err(PositionParseError::Malformed));
    }

    #[test]
    fn rejects_out_of_range_positions() {
        assert!(!Position::new(MAX_ROWS, 0).is_valid());
        assert!(!Position::new(0, MAX_COLS).is_valid());
        assert!(Position::new(MAX_ROWS - 1, MAX_COLS - 1).is_valid());
    }

    #[test]
    fn decode_label_accepts_syntax_beyond_max_rows_and_cols() {
        // "A20000" is a syntactically valid label (row 19999 >= MAX_ROWS);
        // parse() rejects it, but decode_label() must still succeed so the
        // formula lexer can build a CellRef that errors at lookup time.
        assert_eq!(Position::parse("A20000"), Err(PositionParseError::OutOfRange));
        assert_eq!(
            Position::decode_label("A20000").unwrap(),
            Position::new(19999, 0)
        );
    }

    #[test]
    fn decode_label_reports_out_of_range_on_overflow_instead_of_panicking() {
        // A column prefix this long overflows a u64 column accumulator.
        let huge_cols = "Z".repeat(20);
        assert_eq!(
            Position::decode_label(&huge_cols),
            Err(PositionParseError::OutOfRange)
        );
        assert_eq!(
            Position::parse(&format!("{huge_cols}1")),
            Err(PositionParseError::OutOfRange)
        );

        let huge_row = "9".repeat(30);
        assert_eq!(
            Position::decode_label(&format!("A{huge_row}")),
            Err(PositionParseError::OutOfRange)
        );
    }
}
