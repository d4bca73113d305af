// imgpipe/src/utils/mod.rs
use image::ImageFormat;
use rand::Rng;
use std::path::{Path, PathBuf};

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Lower-case tag for a detected format, e.g. `"jpeg"` or `"png"`.
pub fn format_tag(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        other => other.extensions_str().first().copied().unwrap_or("unknown"),
    }
}

/// `len` letters drawn uniformly from `a-zA-Z`. Uniqueness is not checked.
pub fn random_identifier<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// `<base>/<id[0..2]>/<id[2..4]>/<id>.<extension>`.
///
/// Identifiers shorter than four characters shard on whatever is available.
pub fn sharded_path(base: &Path, id: &str, extension: &str) -> PathBuf {
    let first = id.get(..2).unwrap_or(id);
    let second = id.get(2..4).unwrap_or_default();

    base.join(first)
        .join(second)
        .join(format!("{}.{}", id, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn identifiers_are_letters_of_requested_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let id = random_identifier(&mut rng, 8);
            assert_eq!(id.len(), 8);
            assert!(id.chars().all(|c| c.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn seeded_identifiers_are_reproducible() {
        let a = random_identifier(&mut StdRng::seed_from_u64(42), 8);
        let b = random_identifier(&mut StdRng::seed_from_u64(42), 8);
        assert_eq!(a, b);
    }

    #[test]
    fn sharded_path_shape() {
        let path = sharded_path(Path::new("/srv/uploads"), "abcdefgh", "png");
        assert_eq!(path, PathBuf::from("/srv/uploads/ab/cd/abcdefgh.png"));
    }

    #[test]
    fn format_tags() {
        assert_eq!(format_tag(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_tag(ImageFormat::Png), "png");
        assert_eq!(format_tag(ImageFormat::Qoi), "qoi");
    }
}
