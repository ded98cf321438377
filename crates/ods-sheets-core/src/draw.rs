//! Images stored in a book and frames anchoring them to cells

use crate::error::{Error, Result};
use crate::units::{Point, Size};
use image::GenericImageView;
use std::path::Path;

/// Handle to an image in a [`MediaStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(u32);

impl MediaId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Image bytes with the metadata needed to package them
#[derive(Debug, Clone)]
pub struct Media {
    /// Entry name under `Pictures/` in the package
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

impl Media {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Path of the image inside the package, e.g. `Pictures/image1.png`
    pub fn package_path(&self) -> String {
        format!("Pictures/{}", self.file_name)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel dimensions (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }
}

/// Returned when an image is added to a book
///
/// Pass it to [`Cell::create_draw_frame`](crate::Cell::create_draw_frame);
/// `size` is the image's natural size and becomes the frame's initial size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    pub id: MediaId,
    pub size: Size,
}

/// Images owned by a book, each stored once
#[derive(Debug, Clone, Default)]
pub struct MediaStore {
    items: Vec<Media>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add encoded image bytes (PNG, JPEG, GIF or BMP)
    pub fn add(&mut self, bytes: Vec<u8>) -> Result<ImageHandle> {
        let format = image::guess_format(&bytes)
            .map_err(|e| Error::InvalidImage(e.to_string()))?;
        let decoded =
            image::load_from_memory_with_format(&bytes, format).map_err(|e| Error::InvalidImage(e.to_string()))?;
        let (width_px, height_px) = decoded.dimensions();

        let ext = format.extensions_str().first().copied().unwrap_or("bin");
        let id = MediaId(self.items.len() as u32);
        let file_name = format!("image{}.{}", self.items.len() + 1, ext);
        log::debug!("stored {} ({}x{} px)", file_name, width_px, height_px);

        self.items.push(Media {
            file_name,
            mime_type: format.to_mime_type().to_string(),
            bytes,
            width_px,
            height_px,
        });
        Ok(ImageHandle {
            id,
            size: Size::pixels(width_px, height_px),
        })
    }

    /// Read and add an image file
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<ImageHandle> {
        let bytes = std::fs::read(path.as_ref())?;
        self.add(bytes)
    }

    pub fn get(&self, id: MediaId) -> Option<&Media> {
        self.items.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (MediaId, &Media)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, m)| (MediaId(i as u32), m))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An image placed relative to a cell's top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct DrawFrame {
    media: MediaId,
    size: Size,
    offset: Point,
}

impl DrawFrame {
    pub fn new(image: &ImageHandle) -> Self {
        Self {
            media: image.id,
            size: image.size,
            offset: Point::default(),
        }
    }

    pub fn media(&self) -> MediaId {
        self.media
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) -> &mut Self {
        self.size = size;
        self
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Move the frame relative to the cell
    pub fn set_offset(&mut self, offset: Point) -> &mut Self {
        self.offset = offset;
        self
    }
}
