//! YooAsset CLI
//!
//! Command-line interface for packaging built bundles and for stepping
//! through simulated asset loads.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use yoo_asset::simulation::{AssetDatabase, SimulatedBundle};
use yoo_asset::{
    AssetInfo, BuildConfig, BuildPipeline, LoadOperation, LoadStatus, PlayMode, ProgressReporter,
    ProviderKind, ProviderPriority, SceneMode, TaskCreatePackage,
};

#[derive(Parser)]
#[command(name = "yoo-asset")]
#[command(about = "Asset bundle packaging and load simulation tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy built bundles and manifests into the package directory
    Package {
        /// Build configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Show a progress bar while copying
        #[arg(long)]
        progress: bool,
    },

    /// Drive a simulated scene load and print every transition
    Simulate {
        /// Scene asset path
        #[arg(long, default_value = "Assets/Scenes/Main.unity")]
        scene: String,

        /// Frames until the owning bundle is loaded
        #[arg(long, default_value_t = 2)]
        bundle_frames: u32,

        /// Frames the scene load itself takes
        #[arg(long, default_value_t = 5)]
        load_frames: u32,

        /// Make the owning bundle fail with this message
        #[arg(long)]
        fail_dependency: Option<String>,

        /// Leave the scene out of the database so the load is rejected
        #[arg(long)]
        reject: bool,

        /// Make the loaded scene invalid
        #[arg(long)]
        invalid: bool,

        /// Withhold activation, releasing it once the load succeeded
        #[arg(long)]
        suspend: bool,

        /// Complete synchronously instead of frame by frame
        #[arg(long)]
        sync: bool,

        /// Load additively
        #[arg(long)]
        additive: bool,

        /// Priority hint for the load
        #[arg(long, default_value_t = 0)]
        priority: u32,

        /// Give up after this many frames
        #[arg(long, default_value_t = 1000)]
        max_frames: u32,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Package { config, progress } => package_command(config, progress),
        Commands::Simulate {
            scene,
            bundle_frames,
            load_frames,
            fail_dependency,
            reject,
            invalid,
            suspend,
            sync,
            additive,
            priority,
            max_frames,
        } => simulate_command(SimulateOptions {
            scene,
            bundle_frames,
            load_frames,
            fail_dependency,
            reject,
            invalid,
            suspend,
            sync,
            additive,
            priority,
            max_frames,
        }),
    }
}

/// Progress bar adapter for build tasks
struct BarReporter(ProgressBar);

impl ProgressReporter for BarReporter {
    fn report(&self, title: &str, current: usize, total: usize) {
        self.0.set_length(total as u64);
        self.0.set_position(current as u64);
        self.0.set_message(title.to_string());
    }

    fn finish(&self) {
        self.0.finish_with_message("✅ Copy complete");
    }
}

fn package_command(config: PathBuf, show_progress: bool) -> Result<()> {
    println!("📦 Loading build config: {:?}", config);
    let config = BuildConfig::load(&config)?;
    let package_dir = config.parameters.package_output_directory();
    let bundle_count = config.bundles.len();

    let mut task = TaskCreatePackage::new();
    if show_progress {
        let pb = ProgressBar::new(bundle_count as u64);
        let template =
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        pb.set_style(
            ProgressStyle::default_bar()
                .template(template)?
                .progress_chars("#>-"),
        );
        task = task.with_progress(BarReporter(pb));
    }

    let mut context = config.into_context();
    BuildPipeline::new().with_task(task).run(&mut context)?;

    println!("✓ Package written to {}", package_dir.display());
    println!("  Bundles: {}", bundle_count);
    Ok(())
}

struct SimulateOptions {
    scene: String,
    bundle_frames: u32,
    load_frames: u32,
    fail_dependency: Option<String>,
    reject: bool,
    invalid: bool,
    suspend: bool,
    sync: bool,
    additive: bool,
    priority: u32,
    max_frames: u32,
}

fn simulate_command(options: SimulateOptions) -> Result<()> {
    let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
    if !options.reject {
        if options.invalid {
            database.insert_invalid_scene(options.scene.clone(), options.load_frames);
        } else {
            database.insert_scene(options.scene.clone(), options.load_frames);
        }
    }

    let bundle = Arc::new(match &options.fail_dependency {
        Some(message) => {
            SimulatedBundle::loading_then_fail("scenes", options.bundle_frames, message.clone())
        }
        None => SimulatedBundle::loading("scenes", options.bundle_frames),
    });

    let mode = if options.additive {
        SceneMode::Additive
    } else {
        SceneMode::Single
    };
    let mut operation = LoadOperation::new(
        AssetInfo::new(options.scene.clone()),
        ProviderKind::scene(mode),
        bundle.clone(),
        database.clone(),
    )
    .with_priority(ProviderPriority(options.priority))
    .with_suspend_activation(options.suspend);

    operation.subscribe(|outcome| {
        println!(
            "🔔 Completed: {} ({:.2})",
            outcome.status, outcome.progress
        );
    });

    println!("🎬 Loading scene {:?}", options.scene);
    if options.sync {
        operation.wait_for_completion();
    } else {
        let mut last = (operation.status(), operation.progress());
        println!("  frame    0: {} ({:.2})", last.0, last.1);

        for frame in 1..=options.max_frames {
            bundle.step();
            database.step();
            operation.tick();

            let current = (operation.status(), operation.progress());
            if current != last {
                println!("  frame {:>4}: {} ({:.2})", frame, current.0, current.1);
                last = current;
            }
            if operation.is_done() {
                break;
            }
        }
    }

    if options.suspend && operation.status() == LoadStatus::Succeeded {
        let released = operation.release_suspension();
        println!("▶️  Activation released: {}", released);
    }

    match operation.status() {
        LoadStatus::Succeeded => {
            println!("✅ Scene {} loaded", operation.scene_name().unwrap_or_default());
            Ok(())
        }
        LoadStatus::Failed => bail!(
            "❌ {}",
            operation.last_error().unwrap_or("load failed")
        ),
        status => bail!("⚠️  Load did not finish, stopped in {}", status),
    }
}
