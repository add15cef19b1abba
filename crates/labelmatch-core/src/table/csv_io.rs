use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::{LabeledTable, TableError};

impl LabeledTable {
    /// Reads a comma-separated table whose first record is the header.
    ///
    /// Every record must have as many fields as the header.
    pub fn read_csv<R>(reader: R) -> Result<Self, TableError>
    where
        R: io::Read,
    {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns = reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let mut table = LabeledTable::new(columns);
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            table.push_row(record.iter().map(str::to_owned).collect())?;
        }

        log::debug!(
            "read {} rows over {} columns",
            table.len(),
            table.columns().len()
        );
        Ok(table)
    }

    /// Reads a CSV file from disk.
    pub fn from_csv_path<P>(path: P) -> Result<Self, TableError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::read_csv(BufReader::new(file))
    }

    /// Writes the header followed by every row, without an index column.
    pub fn write_csv<W>(&self, writer: W) -> Result<(), TableError>
    where
        W: io::Write,
    {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(self.columns())?;
        for row in self.rows() {
            writer.write_record(row.values())?;
        }
        writer.flush()?;
        Ok(())
    }
}
