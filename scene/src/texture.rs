//! 行優先の2Dテクスチャを定義するモジュール。
//! スカラーとベクトルのピクセルに対応し、
//! 整数インデックスとUVでのサンプリング、一括リサイズ、画像ファイルの入出力を行う。

use std::path::Path;

use glam::{DVec2, DVec3};
use image::{ImageFormat, Rgb, RgbImage};

use crate::SceneError;

/// テクスチャのピクセルになれる値のトレイト。
pub trait Texel: Copy + Default + Send + Sync {
    /// 2値を線形補間する。
    fn lerp(a: Self, b: Self, t: f64) -> Self;
}
impl Texel for f64 {
    #[inline(always)]
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        a + (b - a) * t
    }
}
impl Texel for DVec3 {
    #[inline(always)]
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// 行優先の2Dテクスチャ。
#[derive(Debug, Clone)]
pub struct Texture<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}
impl<T: Texel> Texture<T> {
    /// 全ピクセルがデフォルト値のテクスチャを作成する。
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); (width as usize) * (height as usize)],
        }
    }

    /// テクスチャの幅を取得する。
    pub fn width(&self) -> u32 {
        self.width
    }

    /// テクスチャの高さを取得する。
    pub fn height(&self) -> u32 {
        self.height
    }

    /// ピクセルの値を取得する。範囲外の座標は端にクランプされる。
    #[inline(always)]
    pub fn get(&self, x: u32, y: u32) -> T {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// ピクセルに値を書き込む。
    #[inline(always)]
    pub fn write(&mut self, value: T, x: u32, y: u32) {
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// UV座標でサンプリングする。UVは両軸ともラップされる。
    /// bilinearがtrueなら周囲4ピクセルを補間し、falseなら最近傍を返す。
    pub fn sample_uv(&self, uv: DVec2, bilinear: bool) -> T {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let fx = u * self.width as f64;
        let fy = v * self.height as f64;
        let x = fx as u32;
        let y = fy as u32;

        if bilinear {
            let a = T::lerp(self.get(x, y), self.get(x + 1, y), fx - x as f64);
            let b = T::lerp(self.get(x, y + 1), self.get(x + 1, y + 1), fx - x as f64);
            T::lerp(a, b, fy - y as f64)
        } else {
            self.get(x, y)
        }
    }

    /// テクスチャを新しい解像度にリサイズする。
    /// bilinearがtrueなら補間し、falseなら最近傍の値を使う。
    pub fn resize(&mut self, width: u32, height: u32, bilinear: bool) {
        let mut resized = Texture::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let uv = DVec2::new(
                    (x as f64 + 0.5) / width as f64,
                    (y as f64 + 0.5) / height as f64,
                );
                resized.write(self.sample_uv(uv, bilinear), x, y);
            }
        }
        *self = resized;
    }

    /// ピクセルのスライスを取得する。
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// ピクセルの可変スライスを取得する。
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Texture<DVec3> {
    /// 画像ファイルを読み込みベクトルのテクスチャを作成する。
    /// LDRは[0,1]に正規化され、HDRはリニアな値のまま読み込まれる。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| SceneError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = img.to_rgb32f();
        let (width, height) = rgb.dimensions();
        let data = rgb
            .pixels()
            .map(|pixel| DVec3::new(pixel[0] as f64, pixel[1] as f64, pixel[2] as f64))
            .collect();

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// テクスチャを[0,255]にクランプしてLDR画像として保存する。
    /// フォーマットは拡張子から決まる（PNG、JPG、BMP）。
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|source| SceneError::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;

        RgbImage::from_fn(self.width, self.height, |x, y| {
            let pixel = self.get(x, y) * 255.0;
            Rgb([
                pixel.x.clamp(0.0, 255.0) as u8,
                pixel.y.clamp(0.0, 255.0) as u8,
                pixel.z.clamp(0.0, 255.0) as u8,
            ])
        })
        .save_with_format(path, format)
        .map_err(|source| SceneError::ImageSave {
            path: path.to_path_buf(),
            source,
        })
    }
}
