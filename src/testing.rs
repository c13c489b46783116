/// Returns every word over `alphabet` with at most `max_len` symbols, shortest first.
pub fn words(alphabet: &[char], max_len: usize) -> Vec<Vec<char>> {
	let mut all = vec![Vec::new()];
	let mut layer = vec![Vec::new()];
	for _ in 0..max_len {
		layer = layer
			.iter()
			.flat_map(|word: &Vec<char>| {
				alphabet.iter().map(move |&symbol| {
					let mut next = word.clone();
					next.push(symbol);
					next
				})
			})
			.collect();
		all.extend(layer.iter().cloned());
	}
	all
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn word_count() {
		assert_eq!(1 + 2 + 4 + 8, words(&['0', '1'], 3).len());
		assert_eq!(vec![Vec::<char>::new()], words(&['a'], 0));
	}
}
