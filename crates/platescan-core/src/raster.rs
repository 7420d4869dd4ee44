/// Borrowed view of an interleaved row-major pixel buffer.
///
/// `data` holds `width * height * channels` samples; the sample of channel
/// `c` at pixel `(x, y)` lives at `(y * width + x) * channels + c`.
#[derive(Clone, Copy, Debug)]
pub struct RasterView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

/// Owned raster with the same layout as [`RasterView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Raster {
    /// Allocate an all-zero raster.
    pub fn zeroed(width: usize, height: usize, channels: usize) -> Raster {
        Raster {
            width,
            height,
            channels,
            data: vec![0; width * height * channels],
        }
    }

    /// Wrap an existing buffer. Returns `None` when the length does not
    /// match the dimensions.
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Option<Raster> {
        if data.len() != width * height * channels {
            return None;
        }
        Some(Raster {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    /// Copy `src` into this raster with its top-left corner at `(x0, y0)`.
    ///
    /// The caller guarantees that `src` fits; both rasters must share the
    /// same channel count.
    pub(crate) fn blit(&mut self, src: &RasterView<'_>, x0: usize, y0: usize) {
        debug_assert_eq!(self.channels, src.channels);
        debug_assert!(x0 + src.width <= self.width && y0 + src.height <= self.height);
        let c = self.channels;
        for row in 0..src.height {
            let src_off = row * src.width * c;
            let dst_off = ((y0 + row) * self.width + x0) * c;
            self.data[dst_off..dst_off + src.width * c]
                .copy_from_slice(&src.data[src_off..src_off + src.width * c]);
        }
    }
}

impl<'a> RasterView<'a> {
    /// Samples of the pixel at `(x, y)`, one per channel.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &'a [u8] {
        let off = (y * self.width + x) * self.channels;
        &self.data[off..off + self.channels]
    }

    /// Copy out the axis-aligned window `[x0, x0 + w) x [y0, y0 + h)`.
    ///
    /// The caller guarantees the window lies inside the view.
    pub(crate) fn copy_window(&self, x0: usize, y0: usize, w: usize, h: usize) -> Raster {
        debug_assert!(x0 + w <= self.width && y0 + h <= self.height);
        let c = self.channels;
        let mut data = Vec::with_capacity(w * h * c);
        for row in 0..h {
            let off = ((y0 + row) * self.width + x0) * c;
            data.extend_from_slice(&self.data[off..off + w * c]);
        }
        Raster {
            width: w,
            height: h,
            channels: c,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_length() {
        assert!(Raster::from_raw(2, 2, 3, vec![0; 12]).is_some());
        assert!(Raster::from_raw(2, 2, 3, vec![0; 11]).is_none());
    }

    #[test]
    fn blit_places_block() {
        let mut canvas = Raster::zeroed(4, 4, 1);
        let block = Raster::from_raw(2, 2, 1, vec![9, 9, 9, 9]).unwrap();
        canvas.blit(&block.view(), 2, 1);
        assert_eq!(canvas.view().pixel(2, 1), &[9]);
        assert_eq!(canvas.view().pixel(3, 2), &[9]);
        assert_eq!(canvas.view().pixel(1, 1), &[0]);
        assert_eq!(canvas.view().pixel(2, 3), &[0]);
    }

    #[test]
    fn copy_window_is_exact() {
        let src = Raster::from_raw(3, 2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let win = src.view().copy_window(1, 0, 2, 2);
        assert_eq!(win.data, vec![2, 3, 5, 6]);
    }
}
