//! Fixed-size chunking with PKCS#7 padding.
//!
//! Chunk format: the input is cut into `chunk_size` blocks and the stream is
//! always padded with `p` bytes of value `p` (`1 <= p <= chunk_size`). An input
//! whose length is already a multiple of `chunk_size` therefore gains one whole
//! chunk of padding, which keeps unpadding unambiguous. Because the pad length
//! is stored in a single byte, `chunk_size` must lie in `1..=255`.

use crate::errors::KeyshareError;

/// Largest chunk size a one-byte pad marker can describe.
pub const MAX_CHUNK_SIZE: usize = 255;

pub(crate) fn validate_chunk_size(chunk_size: usize) -> Result<(), KeyshareError> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(KeyshareError::InvalidInput(format!(
            "chunk size must be in 1..={MAX_CHUNK_SIZE}, got {chunk_size}"
        )));
    }
    Ok(())
}

/// Split `data` into chunks of exactly `chunk_size` bytes, padding the last one.
///
/// # Errors
///
/// [`KeyshareError::InvalidInput`] if `chunk_size` is zero or above 255.
pub fn split_as_padded_chunks(data: &[u8], chunk_size: usize) -> Result<Vec<Vec<u8>>, KeyshareError> {
    validate_chunk_size(chunk_size)?;

    let pad = chunk_size - data.len() % chunk_size;
    let mut chunks = Vec::with_capacity(data.len() / chunk_size + 1);
    let mut whole = data.chunks_exact(chunk_size);
    for chunk in whole.by_ref() {
        chunks.push(chunk.to_vec());
    }

    let mut last = Vec::with_capacity(chunk_size);
    last.extend_from_slice(whole.remainder());
    // pad <= 255 by validate_chunk_size
    last.resize(chunk_size, pad as u8);
    chunks.push(last);

    Ok(chunks)
}

/// Alias of [`split_as_padded_chunks`].
pub fn split_into_padded_chunks(data: &[u8], chunk_size: usize) -> Result<Vec<Vec<u8>>, KeyshareError> {
    split_as_padded_chunks(data, chunk_size)
}

/// Strip the padding recorded in the final chunk.
///
/// The final chunk is truncated to its true length and dropped when nothing
/// but padding remains in it. Earlier chunks are returned untouched.
///
/// # Errors
///
/// [`KeyshareError::CorruptPadding`] if the sequence is empty, the final chunk
/// is empty, or its pad marker is zero, too large, or not uniform.
pub fn unpad_last_element(mut chunks: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>, KeyshareError> {
    strip_padding(&mut chunks)?;
    Ok(chunks)
}

/// In-place form of [`unpad_last_element`]. The chunks stay with the caller
/// on error.
pub(crate) fn strip_padding(chunks: &mut Vec<Vec<u8>>) -> Result<(), KeyshareError> {
    let Some(last) = chunks.last_mut() else {
        return Err(KeyshareError::CorruptPadding("no chunks"));
    };
    let chunk_size = last.len();
    let Some(&marker) = last.last() else {
        return Err(KeyshareError::CorruptPadding("empty final chunk"));
    };
    let pad = usize::from(marker);
    if pad == 0 || pad > chunk_size {
        return Err(KeyshareError::CorruptPadding("pad length out of range"));
    }
    if last[chunk_size - pad..].iter().any(|&b| b != marker) {
        return Err(KeyshareError::CorruptPadding("pad bytes not uniform"));
    }

    last.truncate(chunk_size - pad);
    if last.is_empty() {
        chunks.pop();
    }
    Ok(())
}

/// Alias of [`unpad_last_element`].
pub fn unpad_last_chunk(chunks: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>, KeyshareError> {
    unpad_last_element(chunks)
}

/// Concatenate chunks into one byte string.
pub fn join_chunks(chunks: &[Vec<u8>]) -> Vec<u8> {
    chunks.concat()
}
