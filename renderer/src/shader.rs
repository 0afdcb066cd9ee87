//! 放射輝度を推定するシェーダーを定義するモジュール。
//! 光源の直接光サンプリングと、BRDFの重点サンプリングによる
//! 再帰的な間接光の推定を行う。

use glam::DVec3;
use math::{Ray, reflect};
use rand::RngCore;
use scene::{Brdf, Hit, Light, MaterialKind, PrimitiveIndex, Scene};

/// 反射・シャドウレイの原点を表面から浮かせるオフセット。
/// 屈折して媒質に入るレイは負の方向に使う。
const RAY_OFFSET: f64 = 1e-6;

/// これを下回るPDFのサンプルは寄与ゼロとして棄却する。
const PDF_EPSILON: f64 = 1e-12;

/// 放射輝度を推定するシェーダーの構造体。
#[derive(Clone)]
pub struct Shader {
    /// 間接光の再帰の深さの上限。
    pub ray_depth: u32,
    /// ライトごとの直接光のサンプル数。
    pub direct_samples: u32,
    /// 間接光のサンプル数。
    pub indirect_samples: u32,
    /// シャドウレイを飛ばすかどうか。
    pub shadows: bool,
    /// ライトの立体角内をサンプリングするかどうか。
    /// 無効の場合はライト中心への決定的な1サンプルになる。
    pub direct_sampling: bool,
    /// 間接光を推定するかどうか。
    pub indirect_sampling: bool,
    /// シャドウレイが半透明の遮蔽物を透過するかどうか。
    /// 無効の場合、半透明の遮蔽物も完全な影を落とす。
    pub translucency: bool,
    /// 再帰の打ち切りとシーン外の背景の色。
    pub background_color: DVec3,
}
impl Default for Shader {
    fn default() -> Self {
        Self {
            ray_depth: 1,
            direct_samples: 64,
            indirect_samples: 4,
            shadows: true,
            direct_sampling: false,
            indirect_sampling: true,
            translucency: true,
            background_color: DVec3::ZERO,
        }
    }
}

impl Shader {
    /// レイに沿ってシーンから入ってくる放射輝度を推定する。
    pub fn light(
        &self,
        scene: &Scene,
        brdf: &dyn Brdf,
        ray: &Ray,
        rng: &mut dyn RngCore,
    ) -> DVec3 {
        let Some(hit) = scene.query(ray) else {
            return scene.sample_environment(ray.dir, self.background_color);
        };

        // 光源そのものにヒットした場合はEmissiveを返すだけでよい。
        let material = scene.material(hit.material);
        if material.kind() == MaterialKind::Light {
            return material.vector("Emissive", DVec3::ZERO);
        }

        let mut color = self.direct_lighting(scene, brdf, ray, &hit, rng);

        if self.indirect_sampling {
            let mut indirect = DVec3::ZERO;
            for _ in 0..self.indirect_samples {
                indirect += self.indirect_sample(scene, brdf, ray, &hit, 0, rng);
            }
            color += indirect / self.indirect_samples as f64;
        }

        color
    }

    /// BRDFを重点サンプリングして間接光の1サンプルの寄与を求める。
    fn indirect_sample(
        &self,
        scene: &Scene,
        brdf: &dyn Brdf,
        ray: &Ray,
        hit: &Hit,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> DVec3 {
        let material = scene.material(hit.material);
        let view = -ray.dir;

        // BRDFからマイクロ法線をサンプリングし、入射方向を鏡映して新しいレイを作る。
        let micronormal = brdf.sample(hit.normal, view, material, rng);
        let new_dir = reflect(ray.dir, micronormal);
        let new_ray = Ray::new(hit.position + hit.normal * RAY_OFFSET, new_dir);

        let n_dot_l = micronormal.dot(new_dir).max(0.0);
        let pdf = brdf.pdf(hit.normal, view, new_dir, material);
        if !(pdf > PDF_EPSILON) || !pdf.is_finite() {
            return DVec3::ZERO;
        }

        let eval = brdf.eval(hit.normal, view, new_dir, material);
        eval.color * self.ray_recurse(scene, brdf, &new_ray, depth, rng) * n_dot_l / pdf
    }

    /// 間接光の再帰。
    /// 深さの上限に達したら背景色を返し、スタックを溢れさせない。
    /// 光源にヒットした場合は直接光と二重に数えないためゼロを返す。
    fn ray_recurse(
        &self,
        scene: &Scene,
        brdf: &dyn Brdf,
        ray: &Ray,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> DVec3 {
        if depth >= self.ray_depth {
            return self.background_color;
        }

        let Some(hit) = scene.query(ray) else {
            return scene.sample_environment(ray.dir, self.background_color);
        };

        let material = scene.material(hit.material);
        if material.kind() == MaterialKind::Light {
            return DVec3::ZERO;
        }

        self.indirect_sample(scene, brdf, ray, &hit, depth + 1, rng)
            + self.direct_lighting(scene, brdf, ray, &hit, rng)
    }

    /// シーンの全ライトからの直接光の寄与を求める。
    fn direct_lighting(
        &self,
        scene: &Scene,
        brdf: &dyn Brdf,
        ray: &Ray,
        hit: &Hit,
        rng: &mut dyn RngCore,
    ) -> DVec3 {
        let mut final_color = DVec3::ZERO;
        let material = scene.material(hit.material);
        let view = -ray.dir;

        for &light_index in scene.lights() {
            let light = scene.light(light_index);

            if self.direct_sampling {
                // ライトの張る円錐の内側をサンプリングする。
                let mut sampled = DVec3::ZERO;
                for _ in 0..self.direct_samples {
                    let light_dir = light.sample_direction(hit.position, rng);

                    // 減衰の距離を得るためにライト自身と交差を取る。
                    let light_ray = Ray::new(hit.position, light_dir);
                    let Some(light_hit) = light.intersect(&light_ray) else {
                        continue;
                    };

                    let shadow = if self.shadows {
                        self.shadow_attenuation(scene, hit, light, light_index, light_dir)
                    } else {
                        1.0
                    };
                    if shadow == 0.0 {
                        continue;
                    }

                    let n_dot_l = light_dir.dot(hit.normal).max(0.0);
                    let attenuation = light.area() / (light_hit.depth * light_hit.depth);
                    let light_weight = attenuation * (-light_dir).dot(light_hit.normal).max(0.0);
                    let radiance = light.color() * light_weight * shadow;

                    sampled += brdf.eval(hit.normal, view, light_dir, material).diffuse
                        * radiance
                        * n_dot_l;
                }
                final_color += sampled / self.direct_samples as f64;
            } else {
                // ライト中心への決定的な1サンプル。
                let to_light = light.center() - hit.position;
                let light_dist = to_light.length();
                let light_dir = to_light / light_dist;

                let shadow = if self.shadows {
                    self.shadow_attenuation(scene, hit, light, light_index, light_dir)
                } else {
                    1.0
                };
                if shadow == 0.0 {
                    continue;
                }

                let n_dot_l = light_dir.dot(hit.normal).max(0.0);
                let attenuation = light.area() / (light_dist * light_dist);
                let radiance = light.color() * attenuation * shadow;

                final_color +=
                    brdf.eval(hit.normal, view, light_dir, material).color * radiance * n_dot_l;
            }
        }

        final_color
    }

    /// シャドウレイによる減衰係数を返す。
    /// 1.0で遮蔽なし、0.0で完全な影。
    /// translucencyが有効な場合、半透明の遮蔽物はTransmissionを掛けながら透過する。
    fn shadow_attenuation(
        &self,
        scene: &Scene,
        hit: &Hit,
        light: &dyn Light,
        light_index: PrimitiveIndex,
        light_dir: DVec3,
    ) -> f64 {
        let mut shadow_ray = Ray::new(hit.position + hit.normal * RAY_OFFSET, light_dir);
        let mut scale = 1.0;

        loop {
            let Some(shadow_hit) = scene.query(&shadow_ray) else {
                return scale;
            };

            // このライト自身との交差は遮蔽ではない。
            if shadow_hit.primitive == light_index {
                return scale;
            }

            // ライトより遠くにある交差は影を落とさない。
            let light_depth = light
                .intersect(&shadow_ray)
                .map(|light_hit| light_hit.depth)
                .unwrap_or(f64::INFINITY);
            if shadow_hit.depth >= light_depth {
                return scale;
            }

            let transmission = scene
                .material(shadow_hit.material)
                .scalar("Transmission", 0.0);
            if self.translucency && transmission > 0.0 {
                // 自己交差を避けて遮蔽物の反対側から続ける。
                scale *= transmission;
                let dot = shadow_hit.normal.dot(shadow_ray.dir);
                let offset = if dot < 0.0 { -RAY_OFFSET } else { RAY_OFFSET };
                shadow_ray = Ray::new(
                    shadow_hit.position + shadow_hit.normal * offset,
                    shadow_ray.dir,
                );
            } else {
                return 0.0;
            }
        }
    }
}
