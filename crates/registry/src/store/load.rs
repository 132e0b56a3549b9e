//! Descriptor directory loading.

use std::path::{Path, PathBuf};

use super::DescriptorStoreBuilder;
use crate::error::StoreError;

/// Outcome of loading a descriptor directory.
#[derive(Debug, Default)]
pub struct StoreLoadReport {
	/// Names of descriptors registered, in load order.
	pub loaded: Vec<String>,
	/// Per-file failures. A failure never prevents other files from loading.
	pub errors: Vec<(PathBuf, StoreError)>,
}

impl StoreLoadReport {
	pub fn is_clean(&self) -> bool {
		self.errors.is_empty()
	}
}

impl DescriptorStoreBuilder {
	/// Registers every `*.json` file in `dir`, in file name order.
	///
	/// Unreadable or malformed files are recorded in the report and skipped.
	pub fn load_dir(&mut self, dir: &Path) -> StoreLoadReport {
		let mut report = StoreLoadReport::default();

		let entries = match std::fs::read_dir(dir) {
			Ok(entries) => entries,
			Err(error) => {
				report.errors.push((
					dir.to_path_buf(),
					StoreError::Io {
						path: dir.to_path_buf(),
						message: error.to_string(),
					},
				));
				return report;
			}
		};

		let mut paths: Vec<PathBuf> = entries
			.filter_map(|entry| entry.ok().map(|e| e.path()))
			.filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
			.collect();
		paths.sort();

		for path in paths {
			self.load_file(&mut report, &path);
		}

		tracing::info!(
			dir = %dir.display(),
			loaded = report.loaded.len(),
			failed = report.errors.len(),
			"descriptor directory loaded",
		);
		report
	}

	fn load_file(&mut self, report: &mut StoreLoadReport, path: &Path) {
		let content = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(error) => {
				report.errors.push((
					path.to_path_buf(),
					StoreError::Io {
						path: path.to_path_buf(),
						message: error.to_string(),
					},
				));
				return;
			}
		};

		let before = self.len();
		match self.register_json(&path.display().to_string(), &content) {
			Ok(()) => {
				if let Some(descriptor) = self.table.get(before) {
					report.loaded.push(descriptor.name.clone());
				}
			}
			Err(error) => report.errors.push((path.to_path_buf(), error)),
		}
	}
}
