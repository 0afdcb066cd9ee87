//! レンダラーのクレート。
//! ピンホールカメラ、放射輝度を推定するシェーダー、
//! ピクセルループを回すレンダラー本体、デモシーンを含む。

pub mod camera;
pub mod demo;
pub mod renderer;
pub mod shader;

pub use camera::Camera;
pub use renderer::Renderer;
pub use shader::Shader;
