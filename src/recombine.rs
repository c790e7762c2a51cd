//! Positional recombination of chunk columns.

use crate::errors::KeyshareError;

/// Concatenate corresponding chunks across columns.
///
/// Every column is an ordered chunk sequence produced by an independent
/// reconstruction path. Element `j` of the output is element `j` of the first
/// column, followed by element `j` of the second, and so on. Alignment is
/// purely positional.
///
/// # Errors
///
/// [`KeyshareError::ShareLengthMismatch`] if the columns differ in length.
pub fn recombine_shares_into_bytestring(columns: &[Vec<Vec<u8>>]) -> Result<Vec<Vec<u8>>, KeyshareError> {
    let Some(first) = columns.first() else {
        return Ok(Vec::new());
    };
    let rows = first.len();
    if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
        return Err(KeyshareError::ShareLengthMismatch {
            expected: rows,
            got: bad.len(),
        });
    }

    let recombined = (0..rows)
        .map(|row| {
            let width = columns.iter().map(|c| c[row].len()).sum();
            let mut chunk = Vec::with_capacity(width);
            for column in columns {
                chunk.extend_from_slice(&column[row]);
            }
            chunk
        })
        .collect();
    Ok(recombined)
}
