//! シーンに含まれるプリミティブを定義するモジュール。

mod impls;
mod traits;

pub use impls::*;
pub use traits::*;
