use std::{
    fmt::{Display, Formatter},
    io::{self, Write},
};

use crate::types::{FetchOutcome, ResultMap};

pub const NOT_FOUND: &str = "Dimensions not found";

/// One output line: `identifier,width,height` or `identifier,Dimensions not found`.
pub struct Record<'a> {
    pub id: &'a str,
    pub outcome: &'a FetchOutcome,
}

impl Display for Record<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.outcome {
            FetchOutcome::Success(d) => write!(f, "{},{},{}", self.id, d.width, d.height),
            FetchOutcome::Failure => write!(f, "{},{}", self.id, NOT_FOUND),
        }
    }
}

pub fn records(map: &ResultMap) -> impl Iterator<Item = Record<'_>> {
    map.iter().map(|(id, outcome)| Record { id, outcome })
}

/// Writes one record per entry, newline terminated.
pub fn write_records<W: Write>(map: &ResultMap, writer: &mut W) -> io::Result<()> {
    for record in records(map) {
        writeln!(writer, "{}", record)?;
    }
    Ok(())
}
