//! API response models

use std::io;
use std::sync::Arc;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::sensors::{Snapshot, OTHER_LABEL};

/// Count report, keyed by the target label and `other`
///
/// ```json
/// {
///   "CO" : 1,
///   "other" : 1000
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CountReport {
    pub target_label: Arc<str>,
    pub snapshot: Snapshot,
}

impl CountReport {
    /// Indented JSON with a space on both sides of each colon
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(64);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, ReportFormatter::default());
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

/// [`PrettyFormatter`] with `" : "` between key and value
#[derive(Default)]
struct ReportFormatter(PrettyFormatter<'static>);

impl Formatter for ReportFormatter {
    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

impl Serialize for CountReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&*self.target_label, &self.snapshot.target)?;
        map.serialize_entry(OTHER_LABEL, &self.snapshot.other)?;
        map.end()
    }
}
