use std::io::Cursor;

use image::ImageReader;

use crate::{error::FetchError, types::Dimensions};

/// Reads width and height from an encoded image.
///
/// Only the header is parsed; pixel data is never decoded. The format is sniffed from
/// the leading bytes, so the URL's extension does not matter.
pub fn decode_dimensions(bytes: &[u8]) -> Result<Dimensions, FetchError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::from)?;
    let (width, height) = reader.into_dimensions()?;
    Ok(Dimensions::new(width, height))
}
