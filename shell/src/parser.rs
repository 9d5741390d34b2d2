use crate::tokenizer::{self, PIPE_DELIMITERS, WORD_DELIMITERS};

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedLine {
	pub stages: Vec<Vec<String>>,
	pub is_background: bool,
}

pub fn parse_line(line: &str) -> ParsedLine {
	let mut line = line.trim();
	let mut is_background = false;
	if let Some(rest) = line.strip_suffix('&') {
		line = rest;
		is_background = true;
	}
	let stages = tokenizer::split(line, PIPE_DELIMITERS)
		.iter()
		.map(|stage| tokenizer::split(stage, WORD_DELIMITERS))
		.collect();
	ParsedLine { stages: stages, is_background: is_background }
}
