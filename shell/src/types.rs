use std::os::fd::OwnedFd;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output, Append }

impl RedirectType {
	pub fn from_operator(word: &str) -> Option<RedirectType> {
		match word {
			"<" => Some(RedirectType::Input),
			">" => Some(RedirectType::Output),
			">>" => Some(RedirectType::Append),
			_ => None,
		}
	}
}

/// Dropping a stage closes both of its descriptors.
#[derive(Debug)]
pub struct Stage {
	pub words: Vec<String>,
	pub upstream: Option<OwnedFd>,
	pub downstream: Option<OwnedFd>,
}

impl Stage {
	pub fn new(words: Vec<String>) -> Stage {
		Stage { words: words, upstream: None, downstream: None }
	}

	pub fn name(&self) -> &str {
		self.words.first().map_or("", String::as_str)
	}
}

#[derive(Debug, Default)]
pub struct Pipeline {
	pub stages: Vec<Stage>,
	pub pipe_count: usize,
}

impl Pipeline {
	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}

	pub fn len(&self) -> usize {
		self.stages.len()
	}
}
