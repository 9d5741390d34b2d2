pub const PIPE_DELIMITERS: &[char] = &['|'];
pub const WORD_DELIMITERS: &[char] = &[' ', '\t', '\n'];

/// Splits `input` on runs of any of `delimiters`, dropping empty fields.
pub fn split(input: &str, delimiters: &[char]) -> Vec<String> {
	input
		.split(|c: char| delimiters.contains(&c))
		.filter(|field| !field.is_empty())
		.map(str::to_owned)
		.collect()
}
