/// デコード済みの1フレーム。
///
/// ピクセルは 0x00RRGGBB 形式。動画ソースがデコード時にこの形式へ変換する。
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// 全ピクセルが黒のフレーム (ウォームアップ用)
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_black() {
        let frame = Frame::blank(4, 3);
        assert_eq!(frame.pixels().len(), 12);
        assert!(frame.pixels().iter().all(|p| *p == 0));
    }

    #[test]
    fn test_pixel_addressing() {
        let mut pixels = vec![0u32; 6];
        pixels[1 * 3 + 2] = 0xFF00FF;
        let frame = Frame::new(3, 2, pixels);
        assert_eq!(frame.pixel(2, 1), 0xFF00FF);
        assert_eq!(frame.pixel(0, 0), 0);
    }
}
