//! Leak checks for failed decodes, using a per-thread counting allocator.

#![allow(unsafe_code)]

use std::{
	alloc::{GlobalAlloc, Layout, System},
	cell::Cell,
};

use omf_types::prelude::*;

struct CountingAlloc;

thread_local! {
	static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn track(delta: isize) {
	// TLS may already be torn down while the thread exits
	let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

fn live_bytes() -> isize {
	LIVE_BYTES.with(Cell::get)
}

// SAFETY: every call is forwarded unchanged to the system allocator.
unsafe impl GlobalAlloc for CountingAlloc {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		// SAFETY: caller upholds the `GlobalAlloc::alloc` contract.
		let ptr = unsafe { System.alloc(layout) };
		if !ptr.is_null() {
			track(layout.size() as isize);
		}
		ptr
	}

	unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
		track(-(layout.size() as isize));
		// SAFETY: `ptr` was returned by `alloc` with the same layout.
		unsafe { System.dealloc(ptr, layout) }
	}

	unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
		// SAFETY: caller upholds the `GlobalAlloc::realloc` contract.
		let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
		if !new_ptr.is_null() {
			track(new_size as isize - layout.size() as isize);
		}
		new_ptr
	}
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn populated_archive() -> Vec<u8> {
	let mut af = AfFile::new();
	for i in 0..12 {
		let mut m = Move::new(Animation {
			anim_string: vec![b'A'; 64],
			extra_strings: vec![vec![b'x'; 16]; 3],
			sprites: vec![
				Sprite {
					data: SpriteData::Inline(vec![i as u8; 256]),
					..Sprite::default()
				};
				4
			],
			..Animation::default()
		});
		m.set_footer_string(vec![b'f'; 32]).unwrap();
		af.set_move(i * 5, Some(m)).unwrap();
	}
	af.to_bytes().unwrap()
}

#[test]
fn test_truncated_archive_does_not_leak() {
	let bytes = populated_archive();

	for cut in (0..bytes.len()).step_by(97) {
		let before = live_bytes();
		let result = AfFile::from_bytes(&bytes[..cut]);
		assert!(result.is_err(), "cut at {} decoded", cut);
		drop(result);
		assert_eq!(live_bytes(), before, "leak after truncating at {}", cut);
	}
}

#[test]
fn test_truncated_file_load_does_not_leak() {
	let dir = tempfile::TempDir::new().unwrap();
	let path = dir.path().join("cut.af");
	let bytes = populated_archive();
	std::fs::write(&path, &bytes[..bytes.len() * 2 / 3]).unwrap();

	let before = live_bytes();
	let result = AfFile::open(&path);
	assert!(result.is_err());
	drop(result);
	assert_eq!(live_bytes(), before);
}

#[test]
fn test_clone_and_drop_balance() {
	let af = AfFile::from_bytes(&populated_archive()).unwrap();

	let before = live_bytes();
	let copy = af.clone();
	assert!(live_bytes() > before);
	drop(copy);
	assert_eq!(live_bytes(), before);
}
