use std::fmt::{self, Display};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rescreen_core::models::{OverlapRecord, RecoveryRecord};
use rescreen_core::{RescreenError, Result};

/// The tables `analyze` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportTable {
    Overlaps,
    Recovery,
    SubsetRecovery,
}

impl ExportTable {
    pub const ALL: [ExportTable; 3] = [
        ExportTable::Overlaps,
        ExportTable::Recovery,
        ExportTable::SubsetRecovery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTable::Overlaps => "overlaps",
            ExportTable::Recovery => "recovery",
            ExportTable::SubsetRecovery => "subset_recovery",
        }
    }

    /// `<name>.tsv`, or `<name>.csv` for a comma delimiter.
    pub fn file_name(&self, delimiter: u8) -> String {
        let extension = match delimiter {
            b',' => "csv",
            _ => "tsv",
        };
        format!("{}.{}", self.as_str(), extension)
    }

    pub fn path_in(&self, outdir: &Path, delimiter: u8) -> PathBuf {
        outdir.join(self.file_name(delimiter))
    }
}

impl FromStr for ExportTable {
    type Err = RescreenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overlaps" => Ok(ExportTable::Overlaps),
            "recovery" => Ok(ExportTable::Recovery),
            "subset_recovery" => Ok(ExportTable::SubsetRecovery),
            _ => Err(RescreenError::Config(format!(
                "Unknown table `{}`; expected one of overlaps, recovery, subset_recovery",
                s
            ))),
        }
    }
}

impl Display for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn writer<W: Write>(sink: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(delimiter).from_writer(sink)
}

///
/// Write overlap records as `cohort, replicate, subset, num_overlapping, frac_overlapping`.
///
pub fn write_overlaps<W: Write>(sink: W, records: &[OverlapRecord], delimiter: u8) -> Result<()> {
    let mut writer = writer(sink, delimiter);
    writer.write_record(OverlapRecord::HEADER)?;
    for record in records {
        writer.write_record(record.to_fields())?;
    }
    writer.flush()?;
    Ok(())
}

///
/// Write recovery records as `gene, num_tests, frac_tests`, plus `subset` when
/// `with_subset` is set.
///
pub fn write_recovery<W: Write>(
    sink: W,
    records: &[RecoveryRecord],
    with_subset: bool,
    delimiter: u8,
) -> Result<()> {
    let mut writer = writer(sink, delimiter);
    match with_subset {
        true => writer.write_record(RecoveryRecord::SUBSET_HEADER)?,
        false => writer.write_record(RecoveryRecord::HEADER)?,
    }
    for record in records {
        writer.write_record(record.to_fields())?;
    }
    writer.flush()?;
    Ok(())
}
