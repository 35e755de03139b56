//! Generation of the data pack and resource pack that turn items into armor trim materials.
//!
//! For every [`Item`], the resource pack gets a palette strip computed from the item's texture
//! and the data pack gets a trim material whose text color is the average color of that texture.
//!
//! All inputs are read relative to a root directory (see [`PackOptions`]):
//! - `src/items.json`: the list of items.
//! - `update_1_20/data/minecraft/tags/items/trim_materials.json`: items that already are
//!   trim materials in vanilla and are skipped.
//! - `minecraft/atlases/armor_trims.json` and `minecraft/lang/en_us.json`: vanilla assets.
//! - `<namespace>/textures/...`: the item textures.
//! - `pack.png`: the pack icon.
//!
//! # Examples
//! ```no_run
//! # use trim_palette::pack::{Pack, PackOptions};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pack = Pack::load(PackOptions::new(".").namespace("super_trim"))?;
//! pack.datapack(())?;
//! pack.resourcepack(())?;
//! # Ok(())
//! # }
//! ```

mod error;
mod item;
mod manifest;
mod progress;

pub use error::PackError;
pub use item::*;
pub use manifest::*;
pub use progress::Progress;

use crate::{write_palette, ColorSet, PaletteError};
#[cfg(feature = "threads")]
use rayon::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// The configuration for generating packs.
///
/// Relative paths are resolved against the root directory.
///
/// # Examples
/// ```
/// # use trim_palette::pack::PackOptions;
/// let options = PackOptions::new("assets")
///     .namespace("my_trims")
///     .datapack_format(15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    /// The directory containing all inputs.
    root: PathBuf,
    /// The namespace of the generated palettes and materials.
    namespace: String,
    /// The output directory of the data pack.
    datapack_dir: PathBuf,
    /// The description in the data pack's `pack.mcmeta`.
    datapack_description: String,
    /// The data pack format version.
    datapack_format: u32,
    /// The output directory of the resource pack.
    resourcepack_dir: PathBuf,
    /// The description in the resource pack's `pack.mcmeta`.
    resourcepack_description: String,
    /// The resource pack format version.
    resourcepack_format: u32,
    /// The atlas definition to add the palettes to.
    atlas: String,
    /// The index of the paletted permutations source within the atlas.
    atlas_source: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

impl PackOptions {
    /// Creates a new [`PackOptions`] with default values for the given root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            namespace: "super_trim".to_owned(),
            datapack_dir: PathBuf::from("datapack"),
            datapack_description: "Enables all items as armor trimming materials".to_owned(),
            datapack_format: 11,
            resourcepack_dir: PathBuf::from("resourcepack"),
            resourcepack_description: "Resource pack for the Super Trim data pack".to_owned(),
            resourcepack_format: 12,
            atlas: "armor_trims".to_owned(),
            atlas_source: 0,
        }
    }

    /// Sets the namespace of the generated palettes and materials.
    ///
    /// The default is `super_trim`.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the output directory of the data pack.
    ///
    /// The default is `datapack`. This directory is deleted and recreated on generation.
    #[must_use]
    pub fn datapack_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.datapack_dir = dir.into();
        self
    }

    /// Sets the description of the data pack.
    #[must_use]
    pub fn datapack_description(mut self, description: impl Into<String>) -> Self {
        self.datapack_description = description.into();
        self
    }

    /// Sets the data pack format version.
    ///
    /// The default is `11`.
    #[must_use]
    pub fn datapack_format(mut self, format: u32) -> Self {
        self.datapack_format = format;
        self
    }

    /// Sets the output directory of the resource pack.
    ///
    /// The default is `resourcepack`. This directory is deleted and recreated on generation.
    #[must_use]
    pub fn resourcepack_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resourcepack_dir = dir.into();
        self
    }

    /// Sets the description of the resource pack.
    #[must_use]
    pub fn resourcepack_description(mut self, description: impl Into<String>) -> Self {
        self.resourcepack_description = description.into();
        self
    }

    /// Sets the resource pack format version.
    ///
    /// The default is `12`.
    #[must_use]
    pub fn resourcepack_format(mut self, format: u32) -> Self {
        self.resourcepack_format = format;
        self
    }

    /// Sets the atlas definition and the index of its paletted permutations source.
    ///
    /// The default is source `0` of `armor_trims`.
    #[must_use]
    pub fn atlas(mut self, atlas: impl Into<String>, source: usize) -> Self {
        self.atlas = atlas.into();
        self.atlas_source = source;
        self
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The item list.
    fn items_path(&self) -> PathBuf {
        self.root.join("src").join("items.json")
    }

    /// The vanilla trim materials tag.
    fn blacklist_path(&self) -> PathBuf {
        self.root
            .join("update_1_20")
            .join("data")
            .join("minecraft")
            .join("tags")
            .join("items")
            .join("trim_materials.json")
    }

    /// The vanilla assets.
    fn vanilla_dir(&self) -> PathBuf {
        self.root.join("minecraft")
    }
}

/// A pack generator with its items loaded.
#[derive(Debug, Clone)]
pub struct Pack {
    /// The configuration.
    options: PackOptions,
    /// The items to generate materials for.
    items: Vec<Item>,
}

impl Pack {
    /// Loads the item list and blacklist from the root directory.
    ///
    /// # Errors
    /// Returns an error if the item list or blacklist cannot be read.
    pub fn load(options: PackOptions) -> Result<Self, PackError> {
        let items = load_items(&options.items_path(), &options.blacklist_path())?;
        Ok(Self::with_items(options, items))
    }

    /// Creates a generator for the given items.
    #[must_use]
    pub fn with_items(options: PackOptions, items: Vec<Item>) -> Self {
        Self { options, items }
    }

    /// The items that will become trim materials.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The configuration.
    #[must_use]
    pub fn options(&self) -> &PackOptions {
        &self.options
    }

    /// The texture file of an item.
    fn texture_path(&self, item: &Item) -> PathBuf {
        item.texture_id().resolve(&self.options.root)
    }

    /// Generates the data pack and returns its directory.
    ///
    /// Items whose texture cannot be decoded or has no visible pixels get no material
    /// and are reported through [`Progress::skipped`].
    ///
    /// # Errors
    /// Returns an error if any file cannot be read or written.
    pub fn datapack(&self, mut progress: impl Progress) -> Result<PathBuf, PackError> {
        let options = &self.options;
        let dir = options.root.join(&options.datapack_dir);

        progress.start(4, "Preparing datapack...");
        refresh_dir(&dir)?;

        progress.step("Creating pack.mcmeta...");
        let meta = PackMeta::new(&options.datapack_description, options.datapack_format);
        write_json(&dir.join("pack.mcmeta"), &meta)?;

        progress.step("Creating trim_materials.json...");
        let tags = dir.join("data").join("minecraft").join("tags").join("items");
        create_dir_all(&tags)?;
        let tag = Tag {
            values: self.items.iter().map(Item::id).collect(),
        };
        write_json(&tags.join("trim_materials.json"), &tag)?;

        progress.step("Creating materials...");
        let materials = dir.join("data").join(&options.namespace).join("trim_material");
        create_dir_all(&materials)?;
        let skipped = self.for_each_item(|item| self.create_material(&materials, item))?;
        self.report_skipped(&mut progress, skipped);

        progress.step("Creating pack.png...");
        copy_pack_icon(&options.root, &dir)?;

        progress.finish("Datapack ready");
        Ok(dir)
    }

    /// Generates the resource pack and returns its directory.
    ///
    /// Items whose texture cannot be decoded or has no visible pixels get no palette
    /// and are reported through [`Progress::skipped`].
    ///
    /// # Errors
    /// Returns an error if any file cannot be read or written,
    /// or if the vanilla atlas or language file does not have the expected contents.
    pub fn resourcepack(&self, mut progress: impl Progress) -> Result<PathBuf, PackError> {
        let options = &self.options;
        let dir = options.root.join(&options.resourcepack_dir);
        let vanilla = options.vanilla_dir();

        progress.start(5, "Preparing resource pack...");
        refresh_dir(&dir)?;

        progress.step("Creating pack.mcmeta...");
        let meta = PackMeta::new(&options.resourcepack_description, options.resourcepack_format);
        write_json(&dir.join("pack.mcmeta"), &meta)?;

        let atlas_name = format!("{}.json", options.atlas);
        progress.step(&format!("Creating {atlas_name}..."));
        let atlases = dir.join("assets").join("minecraft").join("atlases");
        create_dir_all(&atlases)?;
        let vanilla_atlas = vanilla.join("atlases").join(&atlas_name);
        let mut atlas: serde_json::Value = read_json(&vanilla_atlas)?;
        set_permutations(
            &mut atlas,
            options.atlas_source,
            &options.namespace,
            &self.items,
            &vanilla_atlas,
        )?;
        write_json(&atlases.join(&atlas_name), &atlas)?;

        progress.step("Creating color palettes...");
        let palettes = dir
            .join("assets")
            .join(&options.namespace)
            .join("textures")
            .join("trims")
            .join("color_palettes");
        create_dir_all(&palettes)?;
        let skipped = self.for_each_item(|item| {
            let output = palettes.join(format!("{}.png", item.name));
            Ok(write_palette(self.texture_path(item), output).map(|_| ()))
        })?;
        self.report_skipped(&mut progress, skipped);

        progress.step("Creating en_us.json...");
        let lang_dir = dir.join("assets").join("minecraft").join("lang");
        create_dir_all(&lang_dir)?;
        let lang: BTreeMap<String, String> = read_json(&vanilla.join("lang").join("en_us.json"))?;
        write_json(&lang_dir.join("en_us.json"), &material_names(&lang, &self.items)?)?;

        progress.step("Creating pack.png...");
        copy_pack_icon(&options.root, &dir)?;

        progress.finish("Resource pack ready");
        Ok(dir)
    }

    /// Writes the material definition of one item.
    ///
    /// The outer error aborts the pack, the inner error skips the item.
    fn create_material(
        &self,
        dir: &Path,
        item: &Item,
    ) -> Result<Result<(), PaletteError>, PackError> {
        let colors = match ColorSet::open(self.texture_path(item)) {
            Ok(colors) => colors,
            Err(e) => return Ok(Err(e.into())),
        };

        let Some(average) = colors.average() else {
            return Ok(Err(crate::EmptyColorSet.into()));
        };

        let material = Material::new(item, average);
        write_json(&dir.join(format!("{}.json", item.name)), &material)?;
        Ok(Ok(()))
    }

    /// Runs `f` for every item, in parallel if the `threads` feature is enabled.
    ///
    /// The outer error of `f` aborts the whole pack, the inner error only skips the item.
    /// Returns the skipped items by index, in item order.
    fn for_each_item(
        &self,
        f: impl Fn(&Item) -> Result<Result<(), PaletteError>, PackError> + Sync + Send,
    ) -> Result<Vec<(usize, PaletteError)>, PackError> {
        #[cfg(feature = "threads")]
        let results = self.items.par_iter().map(f).collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "threads"))]
        let results = self.items.iter().map(f).collect::<Result<Vec<_>, _>>()?;

        Ok(results
            .into_iter()
            .enumerate()
            .filter_map(|(i, result)| result.err().map(|e| (i, e)))
            .collect())
    }

    /// Reports the skipped items to `progress`.
    fn report_skipped(&self, progress: &mut impl Progress, skipped: Vec<(usize, PaletteError)>) {
        for (i, error) in skipped {
            progress.skipped(&self.items[i].name, &error);
        }
    }
}

/// Deletes the directory if it exists, then creates it empty.
fn refresh_dir(dir: &Path) -> Result<(), PackError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(PackError::io(dir)(e)),
    }
    create_dir_all(dir)
}

/// Creates a directory and its parents.
fn create_dir_all(dir: &Path) -> Result<(), PackError> {
    fs::create_dir_all(dir).map_err(PackError::io(dir))
}

/// Copies `pack.png` from the root into the pack directory.
fn copy_pack_icon(root: &Path, dir: &Path) -> Result<(), PackError> {
    let icon = root.join("pack.png");
    fs::copy(&icon, dir.join("pack.png"))
        .map(|_| ())
        .map_err(PackError::io(&icon))
}

/// Reads and parses a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PackError> {
    let file = File::open(path).map_err(PackError::io(path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(PackError::json(path))
}

/// Writes a value as pretty-printed JSON to a new file.
///
/// Fails if the file already exists.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PackError> {
    let file = File::create_new(path).map_err(PackError::io(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(PackError::json(path))?;
    writer.flush().map_err(PackError::io(path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::temp_dir;
    use image::{Rgba, RgbaImage};
    use serde_json::{json, Value};

    #[derive(Default)]
    struct Recorder {
        total: usize,
        steps: Vec<String>,
        skipped: Vec<String>,
        finished: bool,
    }

    impl Progress for Recorder {
        fn start(&mut self, total: usize, _message: &str) {
            self.total = total;
        }

        fn step(&mut self, message: &str) {
            self.steps.push(message.to_owned());
        }

        fn skipped(&mut self, item: &str, _error: &PaletteError) {
            self.skipped.push(item.to_owned());
        }

        fn finish(&mut self, _message: &str) {
            self.finished = true;
        }
    }

    fn write(path: &Path, value: &Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
    }

    fn texture(root: &Path, path: &str, image: &RgbaImage) {
        let path = TextureId::parse(path).resolve(root);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        image.save(path).unwrap();
    }

    /// A root directory with three items: `apple` (a gradient texture), `glass` (fully transparent),
    /// and `stone` (a namespaced texture with a single color), plus the blacklisted `diamond`.
    fn test_root(name: &str) -> PathBuf {
        let root = temp_dir(name);

        write(
            &root.join("src").join("items.json"),
            &json!([
                {"name": "apple", "model": "item/apple", "texture": "item/apple"},
                {"name": "diamond", "model": "item/diamond", "texture": "item/diamond"},
                {"name": "glass", "model": "block/glass", "texture": "block/glass"},
                {"name": "stone", "model": "block/stone", "texture": "extra:block/stone"},
                {"name": "air", "model": "", "texture": "item/air"},
            ]),
        );
        write(
            &PackOptions::new(&root).blacklist_path(),
            &json!({"values": ["minecraft:diamond"]}),
        );
        write(
            &root.join("minecraft").join("atlases").join("armor_trims.json"),
            &json!({"sources": [{"type": "paletted_permutations", "permutations": {}}]}),
        );
        write(
            &root.join("minecraft").join("lang").join("en_us.json"),
            &json!({
                "item.minecraft.apple": "Apple",
                "block.minecraft.glass": "Glass",
                "block.minecraft.stone": "Stone",
            }),
        );

        #[allow(clippy::cast_possible_truncation)]
        let gradient = RgbaImage::from_fn(4, 4, |x, y| {
            Rgba([(x * 60) as u8, (y * 60) as u8, 0, 255])
        });
        let glass = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 0]));
        let stone = RgbaImage::from_pixel(2, 2, Rgba([90, 90, 90, 255]));
        texture(&root, "item/apple", &gradient);
        texture(&root, "block/glass", &glass);
        texture(&root, "extra:block/stone", &stone);

        fs::write(root.join("pack.png"), b"icon").unwrap();
        root
    }

    fn read(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn load_filters_items() {
        let root = test_root("load_filters_items");
        let pack = Pack::load(PackOptions::new(&root)).unwrap();
        let names = pack.items().iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["apple", "glass", "stone"]);
    }

    #[test]
    fn datapack() {
        let root = test_root("datapack");
        let pack = Pack::load(PackOptions::new(&root)).unwrap();
        let mut progress = Recorder::default();
        let dir = pack.datapack(&mut progress).unwrap();

        assert_eq!(dir, root.join("datapack"));
        assert_eq!(progress.steps.len(), progress.total);
        assert_eq!(progress.skipped, ["glass"]);
        assert!(progress.finished);

        let meta = read(&dir.join("pack.mcmeta"));
        assert_eq!(meta["pack"]["pack_format"], 11);
        assert_eq!(
            meta["pack"]["description"],
            "Enables all items as armor trimming materials"
        );
        assert_eq!(
            read(&dir.join("data/minecraft/tags/items/trim_materials.json")),
            json!({"values": ["minecraft:apple", "minecraft:glass", "minecraft:stone"]})
        );

        let materials = dir.join("data/super_trim/trim_material");
        let stone = read(&materials.join("stone.json"));
        assert_eq!(stone["description"]["color"], "#5A5A5A");
        assert_eq!(stone["ingredient"], "minecraft:stone");
        assert!(materials.join("apple.json").exists());
        assert!(!materials.join("glass.json").exists());

        assert_eq!(fs::read(dir.join("pack.png")).unwrap(), b"icon");
    }

    #[test]
    fn resourcepack() {
        let root = test_root("resourcepack");
        let pack = Pack::load(PackOptions::new(&root).namespace("trims")).unwrap();
        let mut progress = Recorder::default();
        let dir = pack.resourcepack(&mut progress).unwrap();

        assert_eq!(progress.steps.len(), progress.total);
        assert_eq!(progress.skipped, ["glass"]);

        let atlas = read(&dir.join("assets/minecraft/atlases/armor_trims.json"));
        assert_eq!(
            atlas["sources"][0]["permutations"]["apple"],
            "trims:trims/color_palettes/apple"
        );
        assert_eq!(atlas["sources"][0]["type"], "paletted_permutations");

        let palettes = dir.join("assets/trims/textures/trims/color_palettes");
        let stone = image::open(palettes.join("stone.png")).unwrap().into_rgba8();
        assert_eq!(stone.dimensions(), (8, 1));
        assert!(stone.pixels().all(|p| p.0 == [90, 90, 90, 255]));
        assert!(palettes.join("apple.png").exists());
        assert!(!palettes.join("glass.png").exists());

        let lang = read(&dir.join("assets/minecraft/lang/en_us.json"));
        assert_eq!(lang["trim_material.minecraft.apple"], "Apple Material");
        assert_eq!(lang["trim_material.minecraft.glass"], "Glass Material");
    }

    #[test]
    fn regenerating_replaces_output() {
        let root = test_root("regenerating_replaces_output");
        let pack = Pack::load(PackOptions::new(&root)).unwrap();
        pack.datapack(()).unwrap();
        fs::write(root.join("datapack").join("stale.txt"), b"").unwrap();

        let dir = pack.datapack(()).unwrap();
        assert!(!dir.join("stale.txt").exists());
    }

    #[test]
    fn missing_inputs() {
        let root = temp_dir("missing_inputs");
        assert!(matches!(
            Pack::load(PackOptions::new(&root)),
            Err(PackError::Io { .. })
        ));

        let root = test_root("missing_inputs_atlas");
        fs::remove_file(root.join("minecraft/atlases/armor_trims.json")).unwrap();
        let pack = Pack::load(PackOptions::new(&root)).unwrap();
        assert!(matches!(pack.resourcepack(()), Err(PackError::Io { .. })));
    }
}
