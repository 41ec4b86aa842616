//! Coordinate tables: one box per row as `x_1,y_1,x_2,y_2`, top-left corner first.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::BoundingBox;

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    x_1: f64,
    y_1: f64,
    x_2: f64,
    y_2: f64,
}

impl From<&BoundingBox> for Row {
    fn from(b: &BoundingBox) -> Self {
        let (tl, br) = (b.top_left(), b.bottom_right());
        Self {
            x_1: tl.x(),
            y_1: tl.y(),
            x_2: br.x(),
            y_2: br.y(),
        }
    }
}

/// Write a header and one row per box.
pub fn write_table<W: Write>(writer: W, boxes: &[BoundingBox]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for b in boxes {
        wtr.serialize(Row::from(b))?;
    }
    if boxes.is_empty() {
        // serialize only emits the header together with the first record
        wtr.write_record(["x_1", "y_1", "x_2", "y_2"])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the table to `path`, creating missing parent directories.
pub fn save_table(path: impl AsRef<Path>, boxes: &[BoundingBox]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_table(File::create(path)?, boxes)?;
    info!("wrote {} boxes to {}", boxes.len(), path.display());
    Ok(())
}

/// Read a table written by [`write_table`]. Rows with swapped corners are normalized.
pub fn read_table<R: Read>(reader: R) -> Result<Vec<BoundingBox>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut boxes = Vec::new();
    for row in rdr.deserialize() {
        let row: Row = row?;
        boxes.push(BoundingBox::try_from_slices(
            &[row.x_1, row.y_1],
            &[row.x_2, row.y_2],
        )?);
    }
    Ok(boxes)
}
