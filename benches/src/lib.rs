//! Benchmark helper utilities for omf-rs
//!
//! This module provides generators for synthetic archives and score tables,
//! so the benchmark suite runs without shipping game data.
//!
//! # Real Game Files
//!
//! When `OMF_BENCH_DIR` points at a game installation, the suite also decodes
//! the `FIGHTR*.AF` archives and `SCORES.DAT` found there.

use omf_types::file::{
	AfFile, Animation, CollisionCoord, Move, ScoreEntry, ScoreFile, Sprite, SpriteData,
	score::constants as score_constants,
};

/// Builds an animation with `frames` sprites of `sprite_size` bytes each.
pub fn generate_animation(frames: u8, sprite_size: usize) -> Animation {
	let coords = (0..frames)
		.flat_map(|frame| {
			(0..4).map(move |i| CollisionCoord {
				x: i16::from(frame) * 3 - 200,
				null: 0,
				y: i * 11 - 20,
				frame_id: frame % 64,
			})
		})
		.collect();

	let sprites = (0..frames)
		.map(|frame| Sprite {
			pos_x: -10,
			pos_y: -90,
			width: 40,
			height: 90,
			index: frame,
			data: if frame % 5 == 4 {
				// every fifth frame reuses pixels from elsewhere
				SpriteData::Shared {
					len: sprite_size as u16,
					marker: 1,
				}
			} else {
				SpriteData::Inline((0..sprite_size).map(|i| (i % 251) as u8).collect())
			},
		})
		.collect();

	Animation {
		start_x: 0,
		start_y: 190,
		unknown_a: 0,
		coords,
		anim_string: b"A1-B2-C3-D4-E5-F6".to_vec(),
		extra_strings: vec![b"s1".to_vec()],
		sprites,
	}
}

/// Generates an encoded archive with `moves` occupied slots.
///
/// # Panics
///
/// Panics if `moves` exceeds the 70 slots of an archive.
pub fn generate_test_af_data(moves: usize, frames: u8, sprite_size: usize) -> Vec<u8> {
	let mut af = AfFile::new();
	af.file_id = 1;
	af.endurance = 28000;
	af.power = 200;
	for i in 0..moves {
		let mut m = Move::new(generate_animation(frames, sprite_size));
		m.set_move_string("D2P").unwrap();
		af.set_move(i, Some(m)).unwrap();
	}
	af.to_bytes().unwrap()
}

/// Generates an encoded score table with every entry filled in.
pub fn generate_test_score_data() -> Vec<u8> {
	let mut scores = ScoreFile::new();
	for page in 0..score_constants::PAGES {
		for index in 0..score_constants::ENTRIES_PER_PAGE {
			let mut entry = ScoreEntry::new(
				(1_000_000 - index * 10_000) as u32,
				*b"PLAYER\0\0\0\0\0\0\0\0\0\0",
				(index % 11) as u8,
				(page * 3) as u8,
				0,
			);
			entry.set_padding(index as u32);
			if let Some(slot) = scores.entry_mut(page, index) {
				*slot = entry;
			}
		}
	}
	scores.to_bytes().unwrap()
}

/// Common archive shapes for synthetic test data
pub mod sizes {
	/// `(moves, frames per move, bytes per sprite)`
	pub type Shape = (usize, u8, usize);

	/// A handful of short moves
	pub const SMALL: Shape = (8, 4, 256);
	/// Roughly the shape of a shipped HAR
	pub const TYPICAL: Shape = (45, 12, 1800);
	/// Every slot used with long animations
	pub const FULL: Shape = (70, 32, 3600);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_test_af_data() {
		let (moves, frames, size) = sizes::SMALL;
		let data = generate_test_af_data(moves, frames, size);
		let af = AfFile::from_bytes(&data).unwrap();

		assert_eq!(af.move_count(), moves);
		assert_eq!(af.get_move(0).unwrap().animation.sprites.len(), usize::from(frames));
		let last = &af.get_move(0).unwrap().animation.sprites[3];
		assert_eq!(last.inline_data().map(<[u8]>::len), Some(size));
	}

	#[test]
	fn test_generate_test_score_data() {
		let data = generate_test_score_data();
		assert_eq!(data.len(), score_constants::FILE_SIZE);

		let scores = ScoreFile::from_bytes(&data).unwrap();
		assert_eq!(scores.entry(2, 0).unwrap().pilot_id(), 6);
		assert_eq!(scores.entry(0, 19).unwrap().score, 810_000);
	}
}
