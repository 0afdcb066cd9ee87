//! シーン構築時のエラー型を定義するモジュール。
//! レンダリング中の数値的なエッジケースはエラーにせず、
//! その場でmiss・ゼロ寄与として回復する。

use std::path::PathBuf;

use thiserror::Error;

/// シーン構築時のエラー。
#[derive(Debug, Error)]
pub enum SceneError {
    /// メッシュファイルの読み込みに失敗した。
    #[error("failed to load mesh {path:?}")]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    /// テクスチャ画像の読み込みに失敗した。
    #[error("failed to load texture {path:?}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// 画像の保存に失敗した。
    #[error("failed to save image {path:?}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
