//! The scalar value a cell displays or a formula evaluates to.

/// The three in-band error categories a formula can produce. These are
/// ordinary data — they never unwind as `Result::Err`, they flow through
/// arithmetic as the short-circuit value (first error wins, left-to-right).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A formula referenced an invalid position.
    Ref,
    /// A formula referenced a text cell whose content was not purely numeric.
    Value,
    /// Division by zero, or a non-finite arithmetic result.
    Arithmetic,
}

impl ErrorKind {
    /// Stable short code used on the printed wire (spec §6).
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Ref => "#REF!",
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Arithmetic => "#ARITHM!",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What a cell displays: the tagged variant of spec §3.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Error(ErrorKind),
}

impl CellValue {
    /// Render for `PrintValues`: number via default formatting, text as-is,
    /// error as its short code, empty as the empty string.
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Error(e) => e.code().to_string(),
        }
    }
}

/// Default double formatting: integral values print without a trailing
/// `.0`, everything else prints via Rust's shortest round-trip `Display`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
