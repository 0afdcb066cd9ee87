//! レンダラー本体を定義するモジュール。
//! ピクセルグリッドをワーカースレッドに分割し、
//! ピクセルごとに独立した乱数列で放射輝度を推定してHDRのフィルムに書き込む。

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{DVec2, DVec3};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use scene::{Brdf, Scene, Texture};

use crate::{Camera, Shader};

/// ピクセルのインデックスをシードに混ぜ込むための定数。
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// レンダラーの構造体。
/// カメラ・シェーダー・BRDF・フィルムを所有する。
pub struct Renderer {
    camera: Camera,
    shader: Shader,
    brdf: Box<dyn Brdf>,
    film: Texture<DVec3>,
    /// ピクセルあたりのスーパーサンプリング数。1で中心の1サンプル。
    ssaa: u32,
    /// マスターシード。固定すればレンダリング結果はビット単位で再現する。
    seed: u64,
}
impl Renderer {
    /// レンダラーを作成する。
    pub fn new(camera: Camera, shader: Shader, brdf: Box<dyn Brdf>, ssaa: u32, seed: u64) -> Self {
        let film = Texture::new(camera.width(), camera.height());
        Self {
            camera,
            shader,
            brdf,
            film,
            ssaa,
            seed,
        }
    }

    /// シーンをレンダリングしフィルムに書き込む。同期的に完了する。
    ///
    /// 開始時にBVHを構築し、終了時に破棄する。
    /// レンダリング中のシーンは共有参照越しの読み取り専用で、
    /// ピクセル同士は通信せず順序の保証も持たない。
    pub fn render(&mut self, scene: &mut Scene) {
        let start = std::time::Instant::now();
        scene.build_bvh();
        log::info!(
            "built bvh for {} primitives: {:.3} seconds",
            scene.primitives().len(),
            start.elapsed().as_secs_f64()
        );

        let start = std::time::Instant::now();
        {
            let scene = &*scene;
            let Self {
                camera,
                shader,
                brdf,
                film,
                ssaa,
                seed,
            } = self;
            let camera: &Camera = camera;
            let shader: &Shader = shader;
            let brdf: &dyn Brdf = &**brdf;
            let (width, height) = (camera.width(), camera.height());
            let (ssaa, seed) = (*ssaa, *seed);

            let total = (width as usize) * (height as usize);
            let progress = AtomicUsize::new(0);
            // 進捗は5%刻みでログに出す。値は表示専用。
            let progress_step = (total / 20).max(1);

            film.as_mut_slice()
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, pixel)| {
                    let x = index as u32 % width;
                    let y = index as u32 / width;

                    // マスターシードとピクセルのインデックスから決定的にシードする。
                    // スレッド数や実行順序に依存しない。
                    let mut rng =
                        StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(SEED_MIX));

                    let color = if ssaa > 1 {
                        let mut acc = DVec3::ZERO;
                        for _ in 0..ssaa {
                            let jitter = DVec2::new(rng.random(), rng.random());
                            let ray = camera.sample_ray(x, y, jitter);
                            acc += shader.light(scene, brdf, &ray, &mut rng);
                        }
                        acc / ssaa as f64
                    } else {
                        let ray = camera.sample_ray(x, y, DVec2::splat(0.5));
                        shader.light(scene, brdf, &ray, &mut rng)
                    };
                    *pixel = color;

                    let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % progress_step == 0 {
                        log::info!("rendering: {}%", done * 100 / total);
                    }
                });
        }
        log::info!("rendered: {:.3} seconds", start.elapsed().as_secs_f64());

        scene.clear_bvh();
    }

    /// レンダリング結果のHDRテクスチャを取得する。
    /// トーンマップやガンマは適用されない。
    pub fn render_texture(&self) -> &Texture<DVec3> {
        &self.film
    }
}
