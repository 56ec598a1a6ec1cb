/// Shortens an address for display: first six characters, `...`, last four.
///
/// Addresses too short to shorten are returned unchanged.
pub fn format_address(address: &str) -> String {
	let chars: Vec<char> = address.chars().collect();
	if chars.len() <= 10 {
		return address.to_string();
	}
	let head: String = chars[..6].iter().collect();
	let tail: String = chars[chars.len() - 4..].iter().collect();
	format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shortens_tron_address() {
		assert_eq!(format_address("TJRabPrwbZy45sbavfcjinPJC18kjpRTv8"), "TJRabP...RTv8");
	}

	#[test]
	fn short_input_is_untouched() {
		assert_eq!(format_address("TAbc123"), "TAbc123");
		assert_eq!(format_address(""), "");
	}
}
