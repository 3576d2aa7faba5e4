use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

/// minifbを使用したレビューウィンドウ
pub struct ReviewWindow {
    window: Window,
    width: usize,
    height: usize,
}

impl ReviewWindow {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            width,
            height,
        })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// バッファをウィンドウに表示
    pub fn show(&mut self, buffer: &[u32]) -> Result<()> {
        self.window
            .update_with_buffer(buffer, self.width, self.height)?;
        Ok(())
    }

    /// バッファ更新なしで入力イベントだけ処理する
    pub fn poll(&mut self) {
        self.window.update();
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    pub fn key_repeated(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::Yes)
    }
}
