//! MCprep Materials CLI
//!
//! Canonicalize material names, resolve textures and generate shader graphs
//! from the command line.

use clap::{Parser, Subcommand};
use mcprep_materials::{
    canonicalize, detect_form, find_additional_passes, prep_materials, slice_tiled_image,
    swap_texture_pack, Catalog, ExportLocation, HostInfo, ImageCache, Material, OperatorOutcome,
    PackFormat, PassKind, PrepOptions, RenderEngine, ResourcePack, TextureResolver,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcprep")]
#[command(author, version, about = "Generate shader graphs for Minecraft world exports", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Block catalog JSON to use instead of the bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the canonical block id of material names
    Canon {
        /// Raw material names (e.g., "grass_block_top.003" or "Stationary_Water")
        names: Vec<String>,
    },

    /// Find the diffuse texture of materials in a resource pack
    Resolve {
        /// Path to resource pack directory
        #[arg(short, long)]
        resource_pack: PathBuf,

        /// Raw material names
        names: Vec<String>,
    },

    /// List normal / specular / displacement maps beside a diffuse image
    Passes {
        /// Diffuse image file
        diffuse: PathBuf,
    },

    /// Generate material graphs
    Prep {
        /// Raw material names
        names: Vec<String>,

        /// JSON file holding an array of material names
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Resource pack to take diffuse images from
        #[arg(short, long)]
        resource_pack: Option<PathBuf>,

        /// Swap materials to this resource pack after prepping
        #[arg(long)]
        swap: Option<PathBuf>,

        /// Write materials and images as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pack format: simple, specular or seus
        #[arg(long, default_value = "simple")]
        pack_format: PackFormat,

        /// Host render engine id
        #[arg(long, default_value = "CYCLES")]
        engine: String,

        /// Pretend the host has no principled BSDF
        #[arg(long)]
        no_principled: bool,

        /// Ignore the reflective block class
        #[arg(long)]
        no_reflections: bool,

        /// Ignore the emit block class
        #[arg(long)]
        no_emission: bool,

        /// Use principled emission instead of dedicated emission nodes
        #[arg(long)]
        no_emission_nodes: bool,

        /// Make every material opaque
        #[arg(long)]
        only_solid: bool,

        /// Load normal / specular / displacement maps beside the diffuse
        #[arg(long)]
        extra_maps: bool,

        /// Unfold tiled animated textures into image sequences
        #[arg(long)]
        animate: bool,

        /// Where sequences go: "original" or a directory
        #[arg(long, default_value = "original")]
        export_location: ExportLocation,

        /// Regenerate existing image sequences
        #[arg(long)]
        clear_cache: bool,
    },

    /// Slice a vertically tiled image into an image sequence
    Animate {
        /// Tiled source image
        source: PathBuf,

        /// Where the sequence folder goes: "original" or a directory
        #[arg(long, default_value = "original")]
        export_location: ExportLocation,

        /// Regenerate existing frames
        #[arg(long)]
        clear_cache: bool,
    },

    /// Show information about the block catalog
    Catalog,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path),
        None => Catalog::bundled(),
    };

    match cli.command {
        Commands::Canon { names } => show_canonical(&catalog, &names),
        Commands::Resolve {
            resource_pack,
            names,
        } => resolve_names(&catalog, &resource_pack, &names)?,
        Commands::Passes { diffuse } => show_passes(&diffuse),
        Commands::Prep {
            names,
            input,
            resource_pack,
            swap,
            output,
            pack_format,
            engine,
            no_principled,
            no_reflections,
            no_emission,
            no_emission_nodes,
            only_solid,
            extra_maps,
            animate,
            export_location,
            clear_cache,
        } => {
            let mut options = PrepOptions::default()
                .with_pack_format(pack_format)
                .with_only_solid(only_solid)
                .with_extra_maps(extra_maps)
                .with_animation(animate)
                .with_export_location(export_location);
            options.use_reflections = !no_reflections;
            options.use_emission = !no_emission;
            options.use_emission_nodes = !no_emission_nodes;
            options.clear_cache = clear_cache;
            options.resource_pack = resource_pack;

            let mut host = HostInfo::new(RenderEngine::from_id(&engine));
            if no_principled {
                host = host.without_principled();
            }

            let names = collect_names(names, input.as_deref())?;
            run_prep(&catalog, &host, names, swap.as_deref(), output.as_deref(), &options)?;
        }
        Commands::Animate {
            source,
            export_location,
            clear_cache,
        } => {
            let sequence = slice_tiled_image(&source, &export_location, clear_cache)?;
            let verb = if sequence.regenerated { "Wrote" } else { "Reused" };
            println!("{} {} frames in {:?}", verb, sequence.len(), sequence.folder);
        }
        Commands::Catalog => show_catalog(&catalog)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn show_canonical(catalog: &Catalog, names: &[String]) {
    for name in names {
        let canon = canonicalize(catalog, name);
        match canon.form {
            Some(form) => println!("{} -> {} ({})", name, canon.name, form),
            None => println!("{} -> {} (unknown exporter)", name, canon.name),
        }
    }
    if names.len() > 1 {
        match detect_form(catalog, names.iter().map(String::as_str)) {
            Some(form) => println!("Detected exporter: {}", form),
            None => println!("Detected exporter: undecided"),
        }
    }
}

fn resolve_names(
    catalog: &Catalog,
    resource_pack_path: &Path,
    names: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let pack = ResourcePack::open(resource_pack_path)?;
    println!("Texture root: {:?}", pack.texture_root());

    let resolver = TextureResolver::new(&pack, catalog);
    for name in names {
        let canon = canonicalize(catalog, name).name;
        match resolver.resolve(&canon) {
            Some(path) => println!("  {} -> {:?}", name, path),
            None => println!("  {} -> not found", name),
        }
    }
    Ok(())
}

fn show_passes(diffuse: &Path) {
    let passes = find_additional_passes(diffuse);
    for kind in PassKind::ALL {
        match passes.get(kind) {
            Some(path) => println!("  {:<9} {:?}", kind.to_string(), path),
            None => println!("  {:<9} -", kind.to_string()),
        }
    }
}

fn collect_names(
    mut names: Vec<String>,
    input: Option<&Path>,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if let Some(path) = input {
        let json = fs::read_to_string(path)?;
        let listed: Vec<String> = serde_json::from_str(&json)?;
        names.extend(listed);
    }
    if names.is_empty() {
        return Err("no material names given".into());
    }
    Ok(names)
}

// JSON output format
#[derive(Serialize)]
struct PrepOutput<'a> {
    status: &'static str,
    materials: &'a [Material],
    images: &'a ImageCache,
}

fn run_prep(
    catalog: &Catalog,
    host: &HostInfo,
    names: Vec<String>,
    swap: Option<&Path>,
    output_path: Option<&Path>,
    options: &PrepOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut images = ImageCache::new();
    let mut materials: Vec<Material> = names.into_iter().map(Material::new).collect();

    println!("Prepping {} materials...", materials.len());
    let mut outcome = prep_materials(catalog, &mut images, host, &mut materials, options)?;
    print_outcome("prep", &outcome);

    if let Some(pack) = swap {
        println!("Swapping to {:?}...", pack);
        outcome = swap_texture_pack(catalog, &mut images, host, &mut materials, pack, options)?;
        print_outcome("swap", &outcome);
    }

    if let Some(path) = output_path {
        let out = PrepOutput {
            status: outcome.status(),
            materials: &materials,
            images: &images,
        };
        fs::write(path, serde_json::to_string_pretty(&out)?)?;
        println!("Exported {} materials to {:?}", materials.len(), path);
    }
    Ok(())
}

fn print_outcome(operation: &str, outcome: &OperatorOutcome) {
    match outcome {
        OperatorOutcome::Finished(report) => {
            println!("  {}: {} ({} modified)", operation, outcome.status(), report.modified.len());
            for failure in &report.failures {
                println!("  - {:?} {}: {}", failure.severity, failure.material, failure.error);
            }
        }
        OperatorOutcome::Cancelled(reason) => {
            println!("  {}: {} ({})", operation, outcome.status(), reason);
        }
    }
}

fn show_catalog(catalog: &Catalog) -> Result<(), Box<dyn std::error::Error>> {
    catalog.load()?;
    let Some(stats) = catalog.stats() else {
        return Err("catalog unavailable".into());
    };

    println!("Block Catalog Info:");
    println!("  jmc2obj aliases: {}", stats.jmc_aliases);
    println!("  Mineways aliases: {}", stats.mineways_aliases);
    println!("  Canonical remaps: {}", stats.canon_remaps);
    for (class, count) in stats.class_entries {
        println!("  {}: {}", class, count);
    }
    Ok(())
}
