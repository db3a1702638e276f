//! AF (HAR archive) inspection utility.
//!
//! # Features
//!
//! - **info**: Show archive header, stats and sound table
//! - **moves**: List occupied move slots with their animations
//! - **roundtrip**: Decode and re-encode an archive and compare the bytes
//! - **strip**: Remove moves from an archive and save the result
//!
//! Relative paths are resolved against `--dir` (or `OMF_RESOURCE_DIR`).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example af_utils -- info FIGHTR0.AF --hex
//! cargo run --example af_utils -- moves FIGHTR0.AF --verbose
//! OMF_RESOURCE_DIR=~/omf cargo run --example af_utils -- roundtrip FIGHTR0.AF
//! cargo run --example af_utils -- strip FIGHTR0.AF STRIPPED.AF --move 10 --move 11
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};
use omf_rs::prelude::{AfFile, Move, file::af::constants};

#[derive(Parser)]
#[command(name = "af_utils")]
#[command(author = "omf-rs project")]
#[command(version)]
#[command(about = "Inspect and edit HAR archive (.AF) files", long_about = None)]
struct Cli {
	/// Directory used to resolve relative paths
	#[arg(short, long, global = true, env = "OMF_RESOURCE_DIR", value_name = "DIR")]
	dir: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Show archive header and stats
	Info {
		/// Input .AF file
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Show the sound table as hex
		#[arg(short = 'x', long)]
		hex: bool,
	},

	/// List occupied move slots
	Moves {
		/// Input .AF file
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Show animation strings and sprite details
		#[arg(short, long)]
		verbose: bool,
	},

	/// Decode and re-encode an archive, comparing the bytes
	Roundtrip {
		/// Input .AF file
		#[arg(value_name = "INPUT")]
		input: PathBuf,
	},

	/// Remove moves and save the result
	Strip {
		/// Input .AF file
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output .AF file
		#[arg(value_name = "OUTPUT")]
		output: PathBuf,

		/// Slot to remove; removes every move if omitted
		#[arg(short, long = "move", value_name = "SLOT")]
		moves: Vec<usize>,
	},
}

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let dir = cli.dir.as_deref();

	match cli.command {
		Command::Info {
			input,
			hex,
		} => run_info(&resolve(dir, &input), hex),
		Command::Moves {
			input,
			verbose,
		} => run_moves(&resolve(dir, &input), verbose),
		Command::Roundtrip {
			input,
		} => run_roundtrip(&resolve(dir, &input)),
		Command::Strip {
			input,
			output,
			moves,
		} => run_strip(&resolve(dir, &input), &resolve(dir, &output), &moves),
	}
}

fn resolve(dir: Option<&Path>, path: &Path) -> PathBuf {
	match dir {
		Some(dir) if path.is_relative() => dir.join(path),
		_ => path.to_path_buf(),
	}
}

fn load(path: &Path) -> Result<AfFile> {
	AfFile::open(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn run_info(input: &Path, show_hex: bool) -> Result<()> {
	let af = load(input)?;

	println!("File: {}", input.display());
	println!("{}", af);
	println!(
		"  Reserved: a={:#06X} b={:#04X} c={:#04X} d={:#04X}",
		af.unknown_a, af.unknown_b, af.unknown_c, af.unknown_d
	);

	if show_hex {
		println!("  Sound table: {}", hex::encode_upper(af.sound_table));
	}
	Ok(())
}

fn describe_move(index: usize, m: &Move, verbose: bool) {
	let animation = &m.animation;
	println!(
		"  [{:2}] input {:<10} sprites {:3} coords {:4}",
		index,
		format!("'{}'", m.move_string()),
		animation.sprites.len(),
		animation.coords.len()
	);

	if verbose {
		println!("       anim: {}", animation.anim_string_lossy());
		for extra in &animation.extra_strings {
			println!("       extra: {}", String::from_utf8_lossy(extra));
		}
		if !m.footer_string().is_empty() {
			println!("       footer: {}", String::from_utf8_lossy(m.footer_string()));
		}
		for sprite in &animation.sprites {
			let kind = if sprite.is_missing() {
				"shared"
			} else {
				"inline"
			};
			println!(
				"       sprite {:2}: {}x{} at ({}, {}) {} {} bytes",
				sprite.index,
				sprite.width,
				sprite.height,
				sprite.pos_x,
				sprite.pos_y,
				kind,
				sprite.data.len()
			);
		}
	}
}

fn run_moves(input: &Path, verbose: bool) -> Result<()> {
	let af = load(input)?;

	println!("{} of {} move slots used", af.move_count(), constants::MAX_MOVES);
	for (index, m) in af.moves().iter() {
		describe_move(index, m, verbose);
	}
	Ok(())
}

fn run_roundtrip(input: &Path) -> Result<()> {
	let original =
		std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
	let af = AfFile::from_bytes(&original)
		.with_context(|| format!("Failed to decode {}", input.display()))?;
	let encoded = af.to_bytes().context("Failed to encode archive")?;

	if encoded == original {
		info!("{}: {} bytes, round trip identical", input.display(), original.len());
		return Ok(());
	}

	let first_diff = original
		.iter()
		.zip(&encoded)
		.position(|(a, b)| a != b)
		.unwrap_or(original.len().min(encoded.len()));
	bail!(
		"Round trip mismatch: original {} bytes, encoded {} bytes, first difference at offset {:#X}",
		original.len(),
		encoded.len(),
		first_diff
	);
}

fn run_strip(input: &Path, output: &Path, slots: &[usize]) -> Result<()> {
	let mut af = load(input)?;

	if slots.is_empty() {
		let removed = af.move_count();
		af.clear_moves();
		info!("Removed all {} moves", removed);
	} else {
		for &index in slots {
			let previous = af
				.set_move(index, None)
				.with_context(|| format!("Cannot clear slot {}", index))?;
			match previous {
				Some(_) => info!("Removed move {}", index),
				None => warn!("Slot {} was already empty", index),
			}
		}
	}

	af.save(output).with_context(|| format!("Failed to save {}", output.display()))?;
	info!("Saved {} moves to {}", af.move_count(), output.display());
	Ok(())
}
