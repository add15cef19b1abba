use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use labelmatch_core::LabeledTable;
use labelmatch_stats::share::LabelShare;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn save_csv(table: &LabeledTable, output_path: Option<PathBuf>) -> anyhow::Result<()> {
        let mut output = Output::from_output_path(output_path)?;
        output.write_csv(table)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    pub fn write_csv(&mut self, table: &LabeledTable) -> anyhow::Result<()> {
        table
            .write_csv(&mut *self)
            .with_context(|| format!("Failed to write CSV to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Read a CSV table, attaching the file kind and path to any error
pub fn read_csv_file<P>(file_kind: &str, path: P) -> anyhow::Result<LabeledTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    log::info!("Loading {file_kind} data from {}...", path.display());
    let table = LabeledTable::from_csv_path(path).with_context(|| {
        format!(
            "Failed to read {} CSV file: {}",
            file_kind,
            path.display()
        )
    })?;
    log::info!("Loaded {} {file_kind} rows", table.len());
    Ok(table)
}

/// Read a CSV table that must contain `label_column`
///
/// The check happens here so the error names the offending file rather than
/// the abstract table role.
pub fn read_labeled_csv_file<P>(
    file_kind: &str,
    path: P,
    label_column: &str,
) -> anyhow::Result<LabeledTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let table = read_csv_file(file_kind, path)?;
    if !table.has_column(label_column) {
        anyhow::bail!(
            "The {file_kind} file {} must contain a '{label_column}' column",
            path.display()
        );
    }
    Ok(table)
}

/// Print a percentage breakdown to stderr
pub fn print_shares(title: &str, shares: &[LabelShare]) {
    let max_count = shares.iter().map(|s| s.count).max().unwrap_or(1).max(1);
    let max_bar_width = 40;
    eprintln!("{title}:");
    for share in shares {
        let bar_width = (share.count * max_bar_width) / max_count;
        eprintln!(
            "{:>15} | {:>8} {:>6} {}",
            share.label,
            share.formatted_percent(),
            share.count,
            "#".repeat(bar_width)
        );
    }
}
