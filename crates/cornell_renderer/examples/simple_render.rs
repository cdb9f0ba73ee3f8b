//! Quick preview render of the stock Cornell box.
//!
//! Renders a small, low sample count image with a fixed seed and saves it
//! as PPM.

use std::sync::Arc;

use cornell_renderer::{RenderConfig, Renderer, SceneGeometry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Cornell Path Tracer - Preview");
    println!("=============================");

    let scene = SceneGeometry::cornell_box()?;
    println!(
        "Scene: {} triangles, {} emissive",
        scene.len(),
        scene.lights().count()
    );

    let config = RenderConfig::default()
        .with_samples(16)
        .with_chunk_size(32)
        .with_seed(2024);
    let renderer = Renderer::new(Arc::new(scene)).with_config(config);

    let (width, height) = (256, 180);
    println!("Rendering {}x{} @ {} spp...", width, height, renderer.config().samples_per_pixel);

    let start = std::time::Instant::now();
    let image = renderer.render(width, height)?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "preview.ppm";
    image.save(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}
