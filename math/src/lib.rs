//! 数学関連のモジュール。
//! レイやバウンディングボックス、TRS変換、
//! モンテカルロ用のサンプリング関数などを定義する。

mod bounds;
mod ray;
mod sampling;
mod transform;

pub use bounds::*;
pub use ray::*;
pub use sampling::*;
pub use transform::*;
