#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use palette::Srgba;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

pub fn load_images(images: &[PathBuf]) -> Vec<(String, RgbaImage)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    image.into_rgba8(),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, RgbaImage)> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read img directory")
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

/// A texture-like image: a diagonal gradient with a transparent border.
pub fn gradient_texture(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
            Rgba([0, 0, 0, 0])
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let v = |n: u32| (n * 255 / size) as u8;
            Rgba([v(x), v(y), v((x + y) / 2), 255])
        }
    })
}

/// Synthetic textures of increasing size, plus any PNGs in `TEXTURE_DIR`.
pub fn textures() -> Vec<(String, RgbaImage)> {
    let mut textures = [16, 32, 64, 256, 1024]
        .into_iter()
        .map(|size| (format!("gradient_{size}"), gradient_texture(size)))
        .collect::<Vec<_>>();

    if let Ok(dir) = std::env::var("TEXTURE_DIR") {
        textures.extend(load_image_dir(dir));
    }

    textures
}

/// `len` pseudo-random colors (duplicates are possible).
pub fn random_colors(len: usize) -> Vec<Srgba<u8>> {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
    (0..len)
        .map(|_| Srgba::new(rng.gen(), rng.gen(), rng.gen(), rng.gen_range(1..=255)))
        .collect()
}
