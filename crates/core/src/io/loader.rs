//! Problem description loader
//!
//! # Format
//!
//! ```text
//! <rows>, <cols>
//! ----
//! <row>, <col>, <value>     zero or more source lines
//! ----
//! <threshold>
//! <max_iterations>
//! <cyclic flag>             0 = clamped, anything else = cyclic
//! ```
//!
//! Lines may end in `\r\n`. Anything after the cyclic flag is ignored.

use crate::error::{GeometryError, LoadError};
use crate::grid::{GridShape, HeatGrid, SourcePoint, SourceSet};
use crate::solver::{BoundaryMode, ConvergenceCriterion};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const SEPARATOR: &str = "----";

/// A validated heat problem: grid shape, sources and run parameters
///
/// Every source lies inside the grid. Deserialization goes through
/// [`ProblemDescription::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DescriptionFields")]
pub struct ProblemDescription {
    shape: GridShape,
    sources: Vec<SourcePoint>,
    criterion: ConvergenceCriterion,
    boundary: BoundaryMode,
}

#[derive(Deserialize)]
struct DescriptionFields {
    shape: GridShape,
    sources: Vec<SourcePoint>,
    criterion: ConvergenceCriterion,
    boundary: BoundaryMode,
}

impl TryFrom<DescriptionFields> for ProblemDescription {
    type Error = GeometryError;

    fn try_from(fields: DescriptionFields) -> Result<Self, Self::Error> {
        Self::new(fields.shape, fields.sources, fields.criterion, fields.boundary)
    }
}

impl ProblemDescription {
    /// Assemble a description, checking every source against `shape`
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SourceOutOfBounds`] for the first source, in
    /// input order, outside the grid.
    pub fn new(
        shape: GridShape,
        sources: Vec<SourcePoint>,
        criterion: ConvergenceCriterion,
        boundary: BoundaryMode,
    ) -> Result<Self, GeometryError> {
        if let Some(p) = sources.iter().find(|p| !shape.contains(p.row, p.col)) {
            return Err(GeometryError::SourceOutOfBounds {
                row: p.row,
                col: p.col,
                rows: shape.rows(),
                cols: shape.cols(),
            });
        }
        Ok(Self {
            shape,
            sources,
            criterion,
            boundary,
        })
    }

    #[must_use]
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    /// Sources in input order
    #[must_use]
    pub fn sources(&self) -> &[SourcePoint] {
        &self.sources
    }

    #[must_use]
    pub const fn criterion(&self) -> ConvergenceCriterion {
        self.criterion
    }

    #[must_use]
    pub const fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// Read and parse a description file
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, otherwise any
    /// error of [`ProblemDescription::parse`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let description = Self::parse(&text)?;
        debug!(
            "loaded {}x{} problem with {} source(s) from {}",
            description.shape.rows(),
            description.shape.cols(),
            description.sources.len(),
            path.display()
        );
        Ok(description)
    }

    /// Parse description text
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::BadFormat`] for a missing or malformed line and
    /// [`LoadError::Geometry`] for empty grids, out-of-bounds sources, a
    /// negative threshold or a zero iteration cap.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut lines = Lines::new(text);

        let (line, dims) = lines.next("grid dimensions")?;
        let [rows, cols] = fields::<2>(dims, line, "'<rows>, <cols>'")?;
        let shape = GridShape::new(
            parse_field(rows, line, "row count")?,
            parse_field(cols, line, "column count")?,
        )?;

        lines.separator()?;

        let mut sources = Vec::new();
        loop {
            let (line, text) = lines.next("source point or separator")?;
            if text == SEPARATOR {
                break;
            }
            let [row, col, value] = fields::<3>(text, line, "'<row>, <col>, <value>'")?;
            sources.push(SourcePoint::new(
                parse_field(row, line, "source row")?,
                parse_field(col, line, "source column")?,
                parse_field(value, line, "source value")?,
            ));
        }

        let (line, text) = lines.next("termination threshold")?;
        let threshold: f64 = parse_field(text, line, "termination threshold")?;
        let (line, text) = lines.next("iteration count")?;
        let max_iterations: u32 = parse_field(text, line, "iteration count")?;
        let (line, text) = lines.next("cyclic flag")?;
        let cyclic: i64 = parse_field(text, line, "cyclic flag")?;

        let criterion = ConvergenceCriterion::new(threshold, max_iterations)?;
        Self::new(shape, sources, criterion, BoundaryMode::from_flag(cyclic))
            .map_err(LoadError::from)
    }

    /// Zeroed grid with source values written in input order
    #[must_use]
    pub fn initial_grid(&self) -> HeatGrid {
        let mut grid = HeatGrid::new(self.shape);
        for p in &self.sources {
            grid.set(p.row, p.col, p.value);
        }
        grid
    }

    /// Sources sorted row-major for the engine
    #[must_use]
    pub fn source_set(&self) -> SourceSet {
        SourceSet::new(self.sources.iter().copied())
    }
}

impl FromStr for ProblemDescription {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Numbered, trimmed line reader
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn next(&mut self, expected: &str) -> Result<(usize, &'a str), LoadError> {
        match self.inner.next() {
            Some((index, text)) => {
                self.last = index + 1;
                Ok((self.last, text.trim()))
            }
            None => Err(LoadError::bad_format(
                self.last + 1,
                format!("unexpected end of input, expected {expected}"),
            )),
        }
    }

    fn separator(&mut self) -> Result<(), LoadError> {
        let (line, text) = self.next("separator")?;
        if text == SEPARATOR {
            Ok(())
        } else {
            Err(LoadError::bad_format(
                line,
                format!("expected '{SEPARATOR}', found '{text}'"),
            ))
        }
    }
}

fn fields<'a, const N: usize>(
    text: &'a str,
    line: usize,
    pattern: &str,
) -> Result<[&'a str; N], LoadError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    parts
        .try_into()
        .map_err(|_| LoadError::bad_format(line, format!("expected {pattern}, found '{text}'")))
}

fn parse_field<T: FromStr>(text: &str, line: usize, what: &str) -> Result<T, LoadError> {
    text.parse()
        .map_err(|_| LoadError::bad_format(line, format!("invalid {what} '{text}'")))
}
