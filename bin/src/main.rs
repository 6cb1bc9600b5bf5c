#[macro_use]
extern crate log;

use clap::Parser;
use core_lib::app::*;
use core_lib::image_io::*;
use radiosity::*;
use std::path::Path;
use std::process::ExitCode;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() -> ExitCode {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &Options) -> Result<(), String> {
    let config = SceneConfig::from(options);
    let mut scene = QuadManager::new(&config)?;

    // Form factors.
    let progress = create_progress_reporter(scene.len() as u64, options.quiet);
    progress.set_message("Form factors");
    let ffm = scene.calc_ff_with_progress(&progress);

    // Radiosity.
    let b = DenseSolver.solve(&ffm, &scene.reflectances(), &scene.emissions())?;
    let dump_dir = &options.dump_dir;
    std::fs::create_dir_all(dump_dir)
        .map_err(|e| format!("run(): Error creating '{dump_dir}': {e}"))?;
    scene.move_radiosities(&b.r, &b.g, &b.b, Some(Path::new(dump_dir)))?;

    // Final image.
    let (mut canvas, eye) = front_view(&config, options.width, options.height);
    let progress = create_progress_reporter(options.height as u64, options.quiet);
    progress.set_message("Rendering");
    let pixels = render(&scene, &mut canvas, &eye, &progress);
    write_image(&options.image_file, &pixels, canvas.width(), canvas.height())?;

    info!("Wrote '{}'", options.image_file);
    Ok(())
}
