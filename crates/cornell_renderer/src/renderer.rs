//! Core path tracing renderer.
//!
//! Implements parallel Monte Carlo path tracing with:
//! - A fresh worker pool per render draining a queue of image chunks
//! - Jittered supersampling per pixel
//! - Per-chunk random streams, so output does not depend on scheduling

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use cornell_core::SceneGeometry;
use cornell_math::{Color, Vec3};
use crossbeam_channel::{Receiver, Sender};
use image::RgbImage;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::camera::Camera;
use crate::chunk::{generate_chunks, render_chunk, Chunk, DEFAULT_CHUNK_SIZE};
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::FrameBuffer;
use crate::integrator::{PathIntegrator, DEFAULT_MAX_DEPTH, ROULETTE_DEPTH};

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Jittered camera rays per pixel
    pub samples_per_pixel: u32,
    /// Edge length of the square chunks handed to workers
    pub chunk_size: u32,
    /// Depth past which Russian roulette applies
    pub roulette_depth: u32,
    /// Hard path depth limit
    pub max_depth: u32,
    /// Worker count; derived from the hardware when `None`
    pub threads: Option<usize>,
    /// Master seed; drawn from entropy when `None`
    pub seed: Option<u64>,
    /// Camera position
    pub camera_position: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 48,
            chunk_size: DEFAULT_CHUNK_SIZE,
            roulette_depth: ROULETTE_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            threads: None,
            seed: None,
            camera_position: Camera::DEFAULT_POSITION,
            fov: Camera::DEFAULT_FOV,
        }
    }
}

impl RenderConfig {
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_camera(mut self, position: Vec3, fov: f32) -> Self {
        self.camera_position = position;
        self.fov = fov;
        self
    }

    fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig("samples per pixel must be positive"));
        }
        if self.chunk_size == 0 {
            return Err(RenderError::InvalidConfig("chunk size must be positive"));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig("max depth must be positive"));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig("thread count must be positive"));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(RenderError::InvalidConfig("field of view must be in (0, 180) degrees"));
        }
        if !self.camera_position.is_finite() {
            return Err(RenderError::InvalidConfig("camera position must be finite"));
        }
        Ok(())
    }
}

/// Number of render workers for a machine with `available` hardware threads.
///
/// Leaves two threads for the rest of the system, but never goes below one.
pub fn worker_count(available: usize) -> usize {
    available.saturating_sub(2).max(1)
}

/// Clamp a linear color to [0, 1] and quantize each channel to 8 bits.
///
/// Rounds half away from zero, which for the non-negative clamped values
/// means 127.5 becomes 128.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}

/// Render a single pixel with multi-sampling.
///
/// Each sample's radiance is divided by the sample count as it is
/// accumulated; the result is the averaged, unclamped color.
pub fn render_pixel(
    camera: &Camera,
    integrator: &PathIntegrator<'_>,
    x: u32,
    y: u32,
    samples_per_pixel: u32,
    rng: &mut dyn RngCore,
) -> RenderResult<Color> {
    let numerical = |source| RenderError::Numerical { x, y, source };
    let weight = 1.0 / samples_per_pixel as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples_per_pixel {
        let ray = camera.get_ray(x, y, rng).map_err(numerical)?;
        pixel_color += integrator.radiance(&ray, rng).map_err(numerical)? * weight;
    }

    Ok(pixel_color)
}

/// The random stream for one chunk: the master seed with the chunk index
/// as ChaCha stream id.
fn chunk_rng(seed: u64, chunk: &Chunk) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(chunk.index as u64);
    rng
}

/// Everything a worker reads while rendering.
struct WorkerContext<'a> {
    camera: Camera,
    integrator: PathIntegrator<'a>,
    samples_per_pixel: u32,
    seed: u64,
    framebuffer: &'a FrameBuffer,
    abort: &'a AtomicBool,
}

/// Drain the chunk queue until it is empty or another worker has failed.
fn run_worker(worker: usize, queue: &Receiver<Chunk>, ctx: &WorkerContext<'_>) -> RenderResult<()> {
    let mut rendered = 0usize;

    while let Ok(chunk) = queue.recv() {
        if ctx.abort.load(Ordering::Relaxed) {
            break;
        }

        let mut rng = chunk_rng(ctx.seed, &chunk);
        render_chunk(
            &chunk,
            &ctx.camera,
            &ctx.integrator,
            ctx.samples_per_pixel,
            ctx.framebuffer,
            &mut rng,
        )?;

        log::debug!(
            "Worker {} rendered chunk {} ([{}, {}) x [{}, {}))",
            worker,
            chunk.index,
            chunk.x_start,
            chunk.x_end,
            chunk.y_start,
            chunk.y_end
        );
        rendered += 1;
    }

    log::debug!("Worker {} finished after {} chunks", worker, rendered);
    Ok(())
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run `work(worker)` for `threads` workers in `pool` and wait for all of them.
///
/// The first failing worker raises `abort` so the others can stop early, and
/// its error is returned. A panic in any worker becomes
/// [`RenderError::WorkerPanicked`].
fn run_workers<F>(
    pool: &rayon::ThreadPool,
    threads: usize,
    abort: &AtomicBool,
    work: F,
) -> RenderResult<()>
where
    F: Fn(usize) -> RenderResult<()> + Sync,
{
    let (error_tx, error_rx) = crossbeam_channel::unbounded::<RenderError>();

    let joined = panic::catch_unwind(AssertUnwindSafe(|| {
        pool.scope(|s| {
            for worker in 0..threads {
                let work = &work;
                let error_tx = error_tx.clone();
                s.spawn(move |_| {
                    if let Err(err) = work(worker) {
                        log::error!("Worker {} failed: {}", worker, err);
                        abort.store(true, Ordering::Relaxed);
                        // The receiver outlives the scope
                        let _ = error_tx.send(err);
                    }
                });
            }
        })
    }));

    if let Err(payload) = joined {
        return Err(RenderError::WorkerPanicked(panic_message(payload)));
    }
    match error_rx.try_recv() {
        Ok(err) => Err(err),
        Err(_) => Ok(()),
    }
}

/// Render `scene` to a `width` x `height` RGB image.
///
/// Blocks until every worker has finished. Any worker failure fails the
/// whole render; a partially written frame is never returned.
pub fn render(
    scene: &SceneGeometry,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> RenderResult<RgbImage> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    config.validate()?;

    let start = Instant::now();

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("Render seed: {}", seed);

    // Fill the queue completely before any worker starts
    let chunks = generate_chunks(width, height, config.chunk_size);
    let chunk_count = chunks.len();
    let (sender, receiver): (Sender<Chunk>, Receiver<Chunk>) = crossbeam_channel::unbounded();
    for chunk in chunks {
        sender.send(chunk).map_err(|_| RenderError::QueueDisconnected)?;
    }
    drop(sender);

    let threads = match config.threads {
        Some(threads) => threads,
        None => {
            let available = std::thread::available_parallelism().map_or(1, |n| n.get());
            log::info!("Available cores: {}", available);
            worker_count(available)
        }
    };
    log::info!(
        "Rendering {}x{} @ {} spp in {} chunks using {} threads",
        width,
        height,
        config.samples_per_pixel,
        chunk_count,
        threads
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("cornell-worker-{}", i))
        .build()?;

    let framebuffer = FrameBuffer::new(width, height);
    let abort = AtomicBool::new(false);

    let ctx = WorkerContext {
        camera: Camera::new(width, height)
            .with_position(config.camera_position)
            .with_fov(config.fov),
        integrator: PathIntegrator::new(scene)
            .with_roulette_depth(config.roulette_depth)
            .with_max_depth(config.max_depth),
        samples_per_pixel: config.samples_per_pixel,
        seed,
        framebuffer: &framebuffer,
        abort: &abort,
    };

    run_workers(&pool, threads, &abort, |worker| run_worker(worker, &receiver, &ctx))?;
    drop(pool);

    let image = framebuffer.into_image()?;
    log::info!("Rendering finished in {:.2?}", start.elapsed());
    Ok(image)
}

/// A scene bound to a render configuration.
#[derive(Debug, Clone)]
pub struct Renderer {
    scene: Arc<SceneGeometry>,
    config: RenderConfig,
}

impl Renderer {
    /// Create a renderer with the default configuration.
    pub fn new(scene: Arc<SceneGeometry>) -> Self {
        Self {
            scene,
            config: RenderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scene(&self) -> &SceneGeometry {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one frame.
    pub fn render(&self, width: u32, height: u32) -> RenderResult<RgbImage> {
        render(&self.scene, width, height, &self.config)
    }
}
