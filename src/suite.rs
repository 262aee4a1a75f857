//! Perft suites: positions paired with the number of variations expected at each depth
//!
//! Suites are stored as YAML lists:
//!
//! ```yaml
//! - name: start
//!   fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1
//!   depths:
//!     1: 20
//!     2: 400
//! ```
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{read_to_string, write};
use std::io::{self, Write};
use std::path::Path;
use chrono::{DateTime, Duration, Local};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use chess::{variations, Position};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// One position of a suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteEntry {
    /// A name to report the position by
    pub name: String,
    /// The position in Forsyth-Edwards Notation
    pub fen: String,
    /// The expected number of variations, keyed by depth
    pub depths: BTreeMap<usize, usize>,
}

impl SuiteEntry {
    fn new(name: &str, fen: &str, counts: &[usize]) -> SuiteEntry {
        SuiteEntry {
            name: name.to_owned(),
            fen: fen.to_owned(),
            depths: counts.iter().enumerate().map(|(i, &n)| (i + 1, n)).collect(),
        }
    }
}

/// A depth whose count differs from the expected count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Name of the entry
    pub name: String,
    /// The depth searched
    pub depth: usize,
    /// The count the suite expects
    pub expected: usize,
    /// The count actually found
    pub counted: usize,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: depth {}: expected {} but counted {}",
               self.name, self.depth, self.expected, self.counted)
    }
}

/// The outcome of running a suite
#[derive(Debug, Clone)]
pub struct Report {
    /// When the run began
    pub started: DateTime<Local>,
    /// How long the run took
    pub elapsed: Duration,
    /// The number of depths counted
    pub checked: usize,
    /// Every depth which did not match
    pub failures: Vec<Failure>,
}

impl Report {
    /// Returns true if every depth matched
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Started:  {}", self.started.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Elapsed:  {}.{:03}s",
                 self.elapsed.num_seconds(), self.elapsed.num_milliseconds() % 1000)?;
        write!(f, "Checked:  {}, failed: {}", self.checked, self.failures.len())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Errors from reading or running a suite
#[derive(Debug)]
pub enum Error {
    /// The suite file could not be read or written
    Io(io::Error),
    /// The suite file is not a valid suite
    Yaml(serde_yaml::Error),
    /// An entry has an invalid FEN string
    Position {
        /// Name of the entry
        name: String,
        /// The reason the FEN string was rejected
        error: chess::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Yaml(err) => err.fmt(f),
            Error::Position { name, error } => write!(f, "{}: {}", name, error),
        }
    }
}

impl std::error::Error for Error { }

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

/// Result type for suite operations
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Returns the built-in suite: the starting position, "Kiwipete" and the standard test positions
/// 3 to 6
pub fn reference() -> Vec<SuiteEntry> {
    vec![
        SuiteEntry::new(
            "start",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902, 197281, 4865609],
        ),
        SuiteEntry::new(
            "kiwipete",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2039, 97862, 4085603],
        ),
        SuiteEntry::new(
            "position 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            &[14, 191, 2812, 43238, 674624],
        ),
        SuiteEntry::new(
            "position 4",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[6, 264, 9467, 422333],
        ),
        SuiteEntry::new(
            "position 5",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[44, 1486, 62379, 2103487],
        ),
        SuiteEntry::new(
            "position 6",
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            &[46, 2079, 89890, 3894594],
        ),
    ]
}

/// Parses a suite from YAML text
pub fn from_yaml(s: &str) -> Result<Vec<SuiteEntry>> {
    Ok(serde_yaml::from_str(s)?)
}

/// Reads a suite from a YAML file
pub fn read(path: &Path) -> Result<Vec<SuiteEntry>> {
    from_yaml(&read_to_string(path)?)
}

/// Writes a suite to a YAML file
pub fn write_file(path: &Path, entries: &[SuiteEntry]) -> Result<()> {
    let s = serde_yaml::to_string(entries)?;
    write(path, s)?;
    Ok(())
}

/// Counts variations for every entry, skipping depths greater than `max_depth`
///
/// Progress is written to `out`. Every FEN string is checked before anything is counted.
pub fn run<W: Write>(entries: &[SuiteEntry], max_depth: Option<usize>, out: &mut W)
    -> Result<Report>
{
    let positions = entries.iter()
        .map(|entry| {
            entry.fen.parse::<Position>().map_err(|error| {
                Error::Position { name: entry.name.clone(), error }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let started = Local::now();
    let mut checked = 0;
    let mut failures = Vec::new();
    info!("running {} suite entries", entries.len());

    for (entry, pos) in entries.iter().zip(&positions) {
        writeln!(out, "\n{}:\t{}", entry.name, entry.fen)?;

        for (&depth, &expected) in &entry.depths {
            if max_depth.map_or(false, |max| depth > max) {
                continue;
            }

            let counted = variations::count(pos, depth);
            checked += 1;
            writeln!(out, "Depth {} expected:\t{:12}", depth, expected)?;
            writeln!(out, "Depth {} result:  \t{:12}", depth, counted)?;

            if counted == expected {
                info!("{}: depth {}: {}", entry.name, depth, counted);
            } else {
                let failure = Failure { name: entry.name.clone(), depth, expected, counted };
                warn!("{}", failure);
                failures.push(failure);
            }
        }
    }

    let elapsed = Local::now() - started;
    info!("suite finished in {}ms with {} failures", elapsed.num_milliseconds(), failures.len());

    Ok(Report { started, elapsed, checked, failures })
}
