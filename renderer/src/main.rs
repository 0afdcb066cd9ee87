use std::f64::consts::PI;

use clap::Parser;
use glam::DVec3;

use renderer::demo::{DemoArgs, load_scene};
use renderer::{Camera, Renderer, Shader};
use scene::{BlinnPhong, Brdf, CookTorrance};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scene number to render
    #[arg(long, default_value_t = 0)]
    scene: u32,
    /// Output image width
    #[arg(short, long, default_value_t = 800)]
    width: u32,
    /// Output image height
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f64,
    /// Samples per pixel (1 disables supersampling)
    #[arg(long, default_value_t = 1)]
    ssaa: u32,
    /// Indirect ray recursion depth
    #[arg(long, default_value_t = 1)]
    depth: u32,
    /// Number of direct light samples per light
    #[arg(long, default_value_t = 64)]
    direct_samples: u32,
    /// Number of indirect samples
    #[arg(long, default_value_t = 4)]
    indirect_samples: u32,
    /// Disable shadow rays
    #[arg(long)]
    no_shadows: bool,
    /// Sample light cones instead of deterministic light centers
    #[arg(long)]
    direct_sampling: bool,
    /// Disable indirect lighting
    #[arg(long)]
    no_indirect: bool,
    /// Translucent occluders cast hard shadows
    #[arg(long)]
    no_translucency: bool,
    /// BRDF type: [cook-torrance, blinn-phong]
    #[arg(long, default_value = "cook-torrance")]
    brdf: String,
    /// Master RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Path to an OBJ file (scene 2)
    #[arg(long)]
    mesh: Option<String>,
    /// Path to an equirectangular environment map
    #[arg(long)]
    environment: Option<String>,
    /// Output image path (PNG, JPG or BMP)
    #[arg(short, long, default_value = "output.png")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // コマンドライン引数をパースする。
    let args = Args::parse();

    let brdf: Box<dyn Brdf> = match args.brdf.as_str() {
        "cook-torrance" => Box::new(CookTorrance),
        "blinn-phong" => Box::new(BlinnPhong),
        _ => anyhow::bail!("unknown brdf: {}", args.brdf),
    };

    let shader = Shader {
        ray_depth: args.depth,
        direct_samples: args.direct_samples,
        indirect_samples: args.indirect_samples,
        shadows: !args.no_shadows,
        direct_sampling: args.direct_sampling,
        indirect_sampling: !args.no_indirect,
        translucency: !args.no_translucency,
        background_color: DVec3::ZERO,
    };

    let demo_args = DemoArgs {
        mesh: args.mesh,
        environment: args.environment,
    };
    let mut scene = load_scene(args.scene, &demo_args)?;

    let camera = Camera::new(args.fov * PI / 180.0, args.width, args.height);
    let mut renderer = Renderer::new(camera, shader, brdf, args.ssaa, args.seed);

    renderer.render(&mut scene);

    renderer.render_texture().save(&args.output)?;
    log::info!("saved image to {}", args.output);

    Ok(())
}
