use crate::Result;

use csv::Writer;

use serde::Serialize;

/// Serializes every row, header first, into one CSV string
pub fn write_report<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    for row in rows {
        writer.serialize(row)?;
    }

    let utf8 = writer.into_inner()?;
    return Ok(String::from_utf8(utf8)?);
}
