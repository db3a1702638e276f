//! SCORES.DAT management utility.
//!
//! # Features
//!
//! - **show**: Display every used entry of the high score table
//! - **export**: Export the table to JSON
//! - **import**: Build a table from JSON
//! - **roundtrip**: Decode and re-encode a table and compare the bytes
//! - **reset**: Write an empty table
//!
//! Relative paths are resolved against `--dir` (or `OMF_RESOURCE_DIR`).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example score_utils -- show SCORES.DAT
//! cargo run --example score_utils -- export SCORES.DAT scores.json --pretty
//! cargo run --example score_utils -- import scores.json SCORES.DAT
//! cargo run --example score_utils -- reset SCORES.DAT
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;
use omf_rs::prelude::{ScoreEntry, ScoreFile, file::score::constants};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "score_utils")]
#[command(author = "omf-rs project")]
#[command(version)]
#[command(about = "High score table (SCORES.DAT) utility", long_about = None)]
struct Cli {
	/// Directory used to resolve relative paths
	#[arg(short, long, global = true, env = "OMF_RESOURCE_DIR", value_name = "DIR")]
	dir: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Display the table
	Show {
		/// Input SCORES.DAT file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Include empty entries
		#[arg(short, long)]
		all: bool,
	},

	/// Export the table to JSON
	Export {
		/// Input SCORES.DAT file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output JSON file path
		#[arg(value_name = "OUTPUT")]
		output: PathBuf,

		/// Pretty print JSON
		#[arg(short, long)]
		pretty: bool,
	},

	/// Import the table from JSON
	Import {
		/// Input JSON file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output SCORES.DAT file path
		#[arg(value_name = "OUTPUT")]
		output: PathBuf,
	},

	/// Decode and re-encode a table, comparing the bytes
	Roundtrip {
		/// Input SCORES.DAT file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,
	},

	/// Write an empty table
	Reset {
		/// Output SCORES.DAT file path
		#[arg(value_name = "OUTPUT")]
		output: PathBuf,
	},
}

/// JSON form of one used entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryJson {
	page: usize,
	index: usize,
	score: u32,
	name: String,
	/// Hex of the full 16-byte name buffer, present only when `name` alone
	/// cannot rebuild it
	#[serde(default, skip_serializing_if = "Option::is_none")]
	raw_name: Option<String>,
	har_id: u8,
	pilot_id: u8,
	#[serde(default)]
	padding: u32,
}

/// JSON form of the table; unused entries are omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScoresJson {
	entries: Vec<EntryJson>,
}

/// Returns the hex dump of the name buffer if `set_name(name())` would lose bytes.
fn raw_name_if_lossy(entry: &ScoreEntry) -> Option<String> {
	let mut rebuilt = ScoreEntry::default();
	let exact = rebuilt.set_name(&entry.name()).is_ok() && rebuilt.raw_name() == entry.raw_name();
	(!exact).then(|| hex::encode_upper(entry.raw_name()))
}

impl From<&ScoreFile> for ScoresJson {
	fn from(table: &ScoreFile) -> Self {
		let entries = table
			.iter()
			.filter(|(_, _, entry)| !entry.is_empty())
			.map(|(page, index, entry)| EntryJson {
				page,
				index,
				score: entry.score,
				name: entry.name(),
				raw_name: raw_name_if_lossy(entry),
				har_id: entry.har_id(),
				pilot_id: entry.pilot_id(),
				padding: entry.padding(),
			})
			.collect();
		Self {
			entries,
		}
	}
}

impl TryFrom<&ScoresJson> for ScoreFile {
	type Error = anyhow::Error;

	fn try_from(json: &ScoresJson) -> Result<Self, Self::Error> {
		let mut table = ScoreFile::new();
		for e in &json.entries {
			let max_id = constants::ID_MASK;
			if u32::from(e.har_id) > max_id || u32::from(e.pilot_id) > max_id {
				bail!("Entry {}/{}: ids must be in 0..=63", e.page, e.index);
			}
			if e.padding > constants::PADDING_MASK {
				bail!("Entry {}/{}: padding must fit in 20 bits", e.page, e.index);
			}
			let Some(slot) = table.entry_mut(e.page, e.index) else {
				bail!(
					"Entry {}/{} out of range ({} pages of {} entries)",
					e.page,
					e.index,
					constants::PAGES,
					constants::ENTRIES_PER_PAGE
				);
			};

			let mut entry = ScoreEntry::default();
			entry.score = e.score;
			match &e.raw_name {
				Some(raw) => {
					let bytes = hex::decode(raw).with_context(|| {
						format!("Entry {}/{}: invalid raw_name", e.page, e.index)
					})?;
					let Ok(name) = <[u8; constants::NAME_SIZE]>::try_from(bytes.as_slice())
					else {
						bail!(
							"Entry {}/{}: raw_name must be {} bytes",
							e.page,
							e.index,
							constants::NAME_SIZE
						);
					};
					entry.set_raw_name(name);
				}
				None => {
					entry
						.set_name(&e.name)
						.with_context(|| format!("Entry {}/{}", e.page, e.index))?;
				}
			}
			entry.set_har_id(e.har_id);
			entry.set_pilot_id(e.pilot_id);
			entry.set_padding(e.padding);
			*slot = entry;
		}
		Ok(table)
	}
}

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let dir = cli.dir.as_deref();

	match cli.command {
		Commands::Show {
			input,
			all,
		} => handle_show(&resolve(dir, &input), all),
		Commands::Export {
			input,
			output,
			pretty,
		} => handle_export(&resolve(dir, &input), &resolve(dir, &output), pretty),
		Commands::Import {
			input,
			output,
		} => handle_import(&resolve(dir, &input), &resolve(dir, &output)),
		Commands::Roundtrip {
			input,
		} => handle_roundtrip(&resolve(dir, &input)),
		Commands::Reset {
			output,
		} => handle_reset(&resolve(dir, &output)),
	}
}

fn resolve(dir: Option<&Path>, path: &Path) -> PathBuf {
	match dir {
		Some(dir) if path.is_relative() => dir.join(path),
		_ => path.to_path_buf(),
	}
}

fn load(path: &Path) -> Result<ScoreFile> {
	ScoreFile::open(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn handle_show(input: &Path, all: bool) -> Result<()> {
	let table = load(input)?;
	println!("{}", table);

	for page in 0..constants::PAGES {
		println!("\nPage {}:", page);
		println!("  {:>3}  {:<16} {:>10}  {:>3}  {:>5}", "#", "Name", "Score", "HAR", "Pilot");
		for (index, entry) in table.page(page).unwrap_or_default().iter().enumerate() {
			if !all && entry.is_empty() {
				continue;
			}
			println!(
				"  {:>3}  {:<16} {:>10}  {:>3}  {:>5}",
				index + 1,
				entry.name(),
				entry.score,
				entry.har_id(),
				entry.pilot_id()
			);
		}
	}
	Ok(())
}

fn handle_export(input: &Path, output: &Path, pretty: bool) -> Result<()> {
	let table = load(input)?;
	let json = ScoresJson::from(&table);

	let text = if pretty {
		serde_json::to_string_pretty(&json)?
	} else {
		serde_json::to_string(&json)?
	};
	fs::write(output, text).with_context(|| format!("Failed to write {}", output.display()))?;

	info!("Exported {} entries to {}", json.entries.len(), output.display());
	Ok(())
}

fn handle_import(input: &Path, output: &Path) -> Result<()> {
	let text =
		fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
	let json: ScoresJson = serde_json::from_str(&text)
		.with_context(|| format!("Invalid JSON in {}", input.display()))?;
	let table = ScoreFile::try_from(&json)?;

	table.save(output).with_context(|| format!("Failed to save {}", output.display()))?;
	info!("Imported {} entries into {}", json.entries.len(), output.display());
	Ok(())
}

fn handle_roundtrip(input: &Path) -> Result<()> {
	let original = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
	let table = ScoreFile::from_bytes(&original)
		.with_context(|| format!("Failed to decode {}", input.display()))?;
	let encoded = table.to_bytes()?;

	if encoded != original {
		bail!("Round trip mismatch for {}", input.display());
	}
	info!("{}: {} bytes, round trip identical", input.display(), original.len());
	Ok(())
}

fn handle_reset(output: &Path) -> Result<()> {
	ScoreFile::new().save(output).with_context(|| format!("Failed to save {}", output.display()))?;
	info!("Wrote empty table to {}", output.display());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry_json(padding: u32) -> EntryJson {
		EntryJson {
			page: 0,
			index: 0,
			score: 100,
			name: "ANGEL".to_string(),
			raw_name: None,
			har_id: 1,
			pilot_id: 2,
			padding,
		}
	}

	#[test]
	fn test_import_rejects_wide_padding() {
		let json = ScoresJson {
			entries: vec![entry_json(0x10_0000)],
		};
		assert!(ScoreFile::try_from(&json).is_err());

		let json = ScoresJson {
			entries: vec![entry_json(0xF_FFFF)],
		};
		let table = ScoreFile::try_from(&json).unwrap();
		assert_eq!(table.entry(0, 0).unwrap().padding(), 0xF_FFFF);
	}

	#[test]
	fn test_export_import_keeps_bytes_after_nul() {
		let mut table = ScoreFile::new();
		let entry = table.entry_mut(2, 5).unwrap();
		entry.score = 42;
		entry.set_raw_name(*b"BOB\0JUNK\0\0\0\0\0\0\0\0");
		entry.set_har_id(3);

		let json = ScoresJson::from(&table);
		assert_eq!(json.entries.len(), 1);
		assert_eq!(json.entries[0].name, "BOB");
		assert!(json.entries[0].raw_name.is_some());

		let text = serde_json::to_string(&json).unwrap();
		let parsed: ScoresJson = serde_json::from_str(&text).unwrap();
		let imported = ScoreFile::try_from(&parsed).unwrap();
		assert_eq!(imported.to_bytes().unwrap(), table.to_bytes().unwrap());
	}

	#[test]
	fn test_plain_names_export_without_raw_bytes() {
		let mut table = ScoreFile::new();
		table.entry_mut(0, 0).unwrap().set_name("CRYSTAL").unwrap();
		let json = ScoresJson::from(&table);
		assert!(json.entries[0].raw_name.is_none());
	}
}
