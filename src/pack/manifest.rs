//! The JSON documents written into the packs.

use super::{Item, PackError, DEFAULT_NAMESPACE};
use crate::hex_rgb;
use palette::Srgba;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, path::Path};

/// The contents of a `pack.mcmeta` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackMeta {
    /// The pack section.
    pub pack: PackInfo,
}

/// The `pack` section of a [`PackMeta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackInfo {
    /// The description shown in the pack list.
    pub description: String,
    /// The pack format version.
    pub pack_format: u32,
}

impl PackMeta {
    /// Creates a new [`PackMeta`].
    #[must_use]
    pub fn new(description: impl Into<String>, pack_format: u32) -> Self {
        Self {
            pack: PackInfo {
                description: description.into(),
                pack_format,
            },
        }
    }
}

/// A trim material definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    /// The name of the palette texture, which is the item name.
    pub asset_name: String,
    /// The text shown for the material.
    pub description: MaterialDescription,
    /// The item that applies this material.
    pub ingredient: String,
    /// The model override index for the trimmed item.
    pub item_model_index: f32,
}

/// The `description` section of a [`Material`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialDescription {
    /// The text color as `#RRGGBB`.
    pub color: String,
    /// The translation key of the material name.
    pub translate: String,
}

impl Material {
    /// Creates the material of an item whose texture has the given average color.
    #[must_use]
    pub fn new(item: &Item, average: Srgba<u8>) -> Self {
        Self {
            asset_name: item.name.clone(),
            description: MaterialDescription {
                color: hex_rgb(average),
                translate: translation_key(item),
            },
            ingredient: item.id(),
            item_model_index: 1.0,
        }
    }
}

/// The translation key of the material name of an item.
#[must_use]
pub fn translation_key(item: &Item) -> String {
    format!("trim_material.{DEFAULT_NAMESPACE}.{}", item.name)
}

/// The palette texture id of an item within `namespace`.
#[must_use]
pub fn palette_texture_id(namespace: &str, item: &Item) -> String {
    format!("{namespace}:trims/color_palettes/{}", item.name)
}

/// Replaces the `permutations` of `atlas.sources[index]` with a palette permutation for every item.
///
/// All other fields of the atlas are kept.
///
/// # Errors
/// Returns an error if there is no source object at `index`.
/// `path` is only used for error reporting.
pub fn set_permutations(
    atlas: &mut Value,
    index: usize,
    namespace: &str,
    items: &[Item],
    path: &Path,
) -> Result<(), PackError> {
    let source = atlas
        .get_mut("sources")
        .and_then(|sources| sources.get_mut(index))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| PackError::MissingAtlasSource {
            path: path.to_path_buf(),
            index,
        })?;

    let permutations = items
        .iter()
        .map(|item| {
            (
                item.name.clone(),
                Value::String(palette_texture_id(namespace, item)),
            )
        })
        .collect::<Map<_, _>>();

    source.insert("permutations".to_owned(), Value::Object(permutations));
    Ok(())
}

/// Creates the language entries for the material names.
///
/// The display name of an item is its `item.minecraft.*` translation.
/// Smithing templates without one are called `Smithing Template`,
/// and everything else falls back to the `block.minecraft.*` translation.
///
/// # Errors
/// Returns an error if an item has no display name.
pub fn material_names(
    lang: &BTreeMap<String, String>,
    items: &[Item],
) -> Result<BTreeMap<String, String>, PackError> {
    items
        .iter()
        .map(|item| {
            let display_name = display_name(lang, item)?;
            Ok((translation_key(item), format!("{display_name} Material")))
        })
        .collect()
}

/// The vanilla display name of an item.
fn display_name<'a>(lang: &'a BTreeMap<String, String>, item: &Item) -> Result<&'a str, PackError> {
    let item_key = format!("item.{DEFAULT_NAMESPACE}.{}", item.name);
    if let Some(name) = lang.get(&item_key) {
        return Ok(name);
    }

    if item.name.ends_with("_smithing_template") {
        return Ok("Smithing Template");
    }

    let block_key = format!("block.{DEFAULT_NAMESPACE}.{}", item.name);
    lang.get(&block_key)
        .map(String::as_str)
        .ok_or(PackError::MissingTranslation { key: block_key })
}
