//! The catalog: a plain text file of species page URLs, one per line.

use std::fs;
use std::io;
use std::path::Path;

use rand::seq::SliceRandom;

pub fn write_catalog(path: &Path, urls: &[String]) -> io::Result<()> {
    let contents: String = urls.iter().map(|url| format!("{}\n", url)).collect();
    fs::write(path, contents)
}

pub fn read_catalog(path: &Path) -> io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// `count` URLs drawn at random, with replacement.
pub fn random_sample(urls: &[String], count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .filter_map(|_| urls.choose(&mut rng).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("birdeck-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_catalog_round_trip_overwrites() {
        let path = temp_path("catalog.txt");
        let first = vec!["https://a/1".to_string(), "https://a/2".to_string()];
        let second = vec!["https://b/1".to_string()];

        write_catalog(&path, &first).expect("Failed to write catalog");
        assert_eq!(read_catalog(&path).expect("Failed to read catalog"), first);

        write_catalog(&path, &second).expect("Failed to write catalog");
        assert_eq!(read_catalog(&path).expect("Failed to read catalog"), second);
        assert_eq!(fs::read_to_string(&path).unwrap(), "https://b/1\n");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_catalog_skips_blank_lines() {
        let path = temp_path("blank.txt");
        fs::write(&path, "https://a/1\r\n\n  https://a/2  \n").unwrap();

        let urls = read_catalog(&path).expect("Failed to read catalog");
        assert_eq!(urls, vec!["https://a/1".to_string(), "https://a/2".to_string()]);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_random_sample() {
        let urls = vec!["https://a/1".to_string(), "https://a/2".to_string()];

        let sample = random_sample(&urls, 5);
        assert_eq!(sample.len(), 5);
        assert!(sample.iter().all(|u| urls.contains(u)));

        assert!(random_sample(&[], 3).is_empty());
    }
}
