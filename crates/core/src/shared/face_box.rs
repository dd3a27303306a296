/// Width and height of a source raster in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of<P: image::Pixel, C: std::ops::Deref<Target = [P::Subpixel]>>(
        image: &image::ImageBuffer<P, C>,
    ) -> Self {
        Self::new(image.width(), image.height())
    }

    pub fn as_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned face bounding box in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn fits_within(&self, size: ImageSize) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= size.width && self.bottom() <= size.height
    }

    /// Intersection with the image bounds, or `None` when nothing is left.
    pub fn clamped_to(&self, size: ImageSize) -> Option<FaceBox> {
        let x = self.x.min(size.width);
        let y = self.y.min(size.height);
        let right = self.right().min(size.width);
        let bottom = self.bottom().min(size.height);
        if right <= x || bottom <= y {
            return None;
        }
        Some(FaceBox::new(x, y, right - x, bottom - y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_edges() {
        let b = FaceBox::new(10, 20, 30, 40);
        assert_eq!(b.right(), 40);
        assert_eq!(b.bottom(), 60);
        assert_eq!(b.area(), 1200);
    }

    #[rstest]
    #[case::inside(FaceBox::new(0, 0, 100, 100), true)]
    #[case::touching_edges(FaceBox::new(50, 50, 50, 50), true)]
    #[case::overflowing_right(FaceBox::new(60, 0, 50, 50), false)]
    #[case::zero_width(FaceBox::new(10, 10, 0, 10), false)]
    fn test_fits_within(#[case] b: FaceBox, #[case] expected: bool) {
        assert_eq!(b.fits_within(ImageSize::new(100, 100)), expected);
    }

    #[test]
    fn test_clamped_to_trims_overflow() {
        let b = FaceBox::new(80, 90, 50, 50);
        let clamped = b.clamped_to(ImageSize::new(100, 100)).unwrap();
        assert_eq!(clamped, FaceBox::new(80, 90, 20, 10));
    }

    #[test]
    fn test_clamped_to_outside_is_none() {
        let b = FaceBox::new(120, 0, 10, 10);
        assert!(b.clamped_to(ImageSize::new(100, 100)).is_none());
    }

    #[test]
    fn test_image_size_of_buffer() {
        let img = image::GrayImage::new(7, 3);
        assert_eq!(ImageSize::of(&img), ImageSize::new(7, 3));
        assert!(!ImageSize::of(&img).is_empty());
        assert!(ImageSize::new(0, 3).is_empty());
    }
}
