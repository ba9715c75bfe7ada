//! CSV output of a match assignment

use crate::error::Result;
use catmatch_core::Table;
use catmatch_matcher::Assignment;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

pub const OUTPUT_HEADER: [&str; 8] = [
    "a_idx",
    "b_idx",
    "fuzz_title",
    "tfidf_sim",
    "emb_sim",
    "price_diff",
    "A_Title",
    "B_Title",
];

/// Write the assignment as CSV, one row per match in assignment order
///
/// An unknown price difference is written as an empty field. Titles are the
/// original, unnormalized text.
pub fn write_assignment_to<W: Write>(
    writer: W,
    assignment: &Assignment,
    table_a: &Table,
    table_b: &Table,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(OUTPUT_HEADER)?;

    for row in assignment {
        let features = &row.features;
        wtr.write_record([
            row.a_idx.to_string(),
            row.b_idx.to_string(),
            features.fuzz_title.to_string(),
            features.tfidf_sim.to_string(),
            features.emb_sim.to_string(),
            features.price_diff.map(|d| d.to_string()).unwrap_or_default(),
            table_a.title_of(row.a_idx),
            table_b.title_of(row.b_idx),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the assignment to a file, replacing any previous one
///
/// Rows go to a temporary file next to `path`, which is renamed into place only
/// once everything is written; a failed write leaves no output behind.
pub fn write_assignment<P: AsRef<Path>>(
    path: P,
    assignment: &Assignment,
    table_a: &Table,
    table_b: &Table,
) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    write_assignment_to(std::io::BufWriter::new(staged.as_file_mut()), assignment, table_a, table_b)?;
    staged.persist(path).map_err(|e| e.error)?;

    info!("Wrote {} matches to {:?}", assignment.len(), path);
    Ok(())
}
