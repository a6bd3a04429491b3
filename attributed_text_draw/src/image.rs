// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::kurbo::Rect;
use crate::{Error, ErrorKind};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an [`Image`]'s pixel data.
///
/// Clones of an image share its id; every call to [`Image::new`] gets a fresh one. Caches of
/// native images are keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(u64);

impl ImageId {
    /// Returns the raw id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Pixel layout of an [`Image`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// 8-bit premultiplied alpha, red, green, blue.
    Argb,
    /// 8-bit red, green, blue.
    Rgb,
    /// 8-bit alpha only.
    SingleChannel,
}

impl ImageFormat {
    /// Bytes used by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Argb => 4,
            Self::Rgb => 3,
            Self::SingleChannel => 1,
        }
    }
}

/// The color space a native image is created in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Three color channels, used for color images.
    Rgb,
    /// One channel, used for masks and single-channel images.
    Grey,
}

/// An immutable, cheaply clonable bitmap.
#[derive(Clone, Debug)]
pub struct Image {
    id: ImageId,
    width: u32,
    height: u32,
    format: ImageFormat,
    data: Arc<[u8]>,
}

impl Image {
    /// Create an image from tightly packed rows of pixels.
    ///
    /// Fails with [`ErrorKind::InvalidImageData`] if the data length doesn't match the
    /// dimensions and format.
    pub fn new(
        width: u32,
        height: u32,
        format: ImageFormat,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self, Error> {
        let data = data.into();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()));
        if expected != Some(data.len()) {
            return Err(Error::new(
                ErrorKind::InvalidImageData,
                "pixel data length doesn't match width * height * bytes per pixel",
            ));
        }
        Ok(Self {
            id: ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            format,
            data,
        })
    }

    /// The identity of the pixel data.
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Raw pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The image bounds at the origin, `(0, 0, width, height)`.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// The color space a native copy of this image is created in.
    pub fn color_space(&self) -> ColorSpace {
        match self.format {
            ImageFormat::SingleChannel => ColorSpace::Grey,
            ImageFormat::Argb | ImageFormat::Rgb => ColorSpace::Rgb,
        }
    }

    /// The alpha channel of this image as a single-channel image.
    ///
    /// The result keeps this image's id, since it is derived from the same pixels; caches tell
    /// the two apart by [`ColorSpace`].
    pub fn to_single_channel(&self) -> Self {
        let data: Arc<[u8]> = match self.format {
            ImageFormat::SingleChannel => return self.clone(),
            ImageFormat::Argb => self.data.chunks_exact(4).map(|px| px[0]).collect(),
            ImageFormat::Rgb => self.data.chunks_exact(3).map(|_| u8::MAX).collect(),
        };
        Self {
            id: self.id,
            width: self.width,
            height: self.height,
            format: ImageFormat::SingleChannel,
            data,
        }
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.format == other.format
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorSpace, Image, ImageFormat};
    use crate::ErrorKind;

    #[test]
    fn rejects_mismatched_data() {
        let err = Image::new(2, 2, ImageFormat::Argb, vec![0_u8; 15]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImageData);
    }

    #[test]
    fn ids_are_unique_and_shared_by_clones() {
        let a = Image::new(1, 1, ImageFormat::Rgb, vec![1_u8, 2, 3]).unwrap();
        let b = Image::new(1, 1, ImageFormat::Rgb, vec![1_u8, 2, 3]).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn single_channel_takes_alpha() {
        let data = vec![10_u8, 1, 2, 3, 200, 4, 5, 6];
        let image = Image::new(2, 1, ImageFormat::Argb, data).unwrap();
        let mask = image.to_single_channel();
        assert_eq!(mask.format(), ImageFormat::SingleChannel);
        assert_eq!(mask.color_space(), ColorSpace::Grey);
        assert_eq!(mask.data(), &[10, 200]);
        assert_eq!(mask.id(), image.id());
        assert_eq!(image.color_space(), ColorSpace::Rgb);
    }
}
