use super::{read_json, PackError};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fmt::Display,
    path::{Path, PathBuf},
};

/// The namespace used for ids without an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// An item that becomes a trim material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The item id without namespace, e.g., `diamond`.
    pub name: String,
    /// The item model.
    pub model: String,
    /// The texture to take the colors from, as a (possibly namespaced) texture id.
    pub texture: String,
}

impl Item {
    /// The namespaced item id, e.g., `minecraft:diamond`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{DEFAULT_NAMESPACE}:{}", self.name)
    }

    /// The texture id of this item.
    #[must_use]
    pub fn texture_id(&self) -> TextureId<'_> {
        TextureId::parse(&self.texture)
    }
}

/// A tag file, i.e., `{"values": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tag {
    /// The namespaced ids in the tag.
    pub values: Vec<String>,
}

/// A texture id of the form `namespace:path`.
///
/// # Examples
/// ```
/// # use trim_palette::pack::TextureId;
/// # use std::path::Path;
/// let id = TextureId::parse("block/stone");
/// assert_eq!(id.namespace(), "minecraft");
/// assert_eq!(
///     id.resolve(Path::new("root")),
///     Path::new("root/minecraft/textures/block/stone.png"),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId<'a> {
    /// The namespace, e.g., `minecraft`.
    namespace: &'a str,
    /// The path within the `textures` directory of the namespace, without extension.
    path: &'a str,
}

impl<'a> TextureId<'a> {
    /// Parses a texture id.
    ///
    /// An id with exactly one `:` is split into namespace and path.
    /// Any other id is a path in the [`DEFAULT_NAMESPACE`].
    #[must_use]
    pub fn parse(id: &'a str) -> Self {
        match id.split_once(':') {
            Some((namespace, path)) if !path.contains(':') => Self { namespace, path },
            _ => Self { namespace: DEFAULT_NAMESPACE, path: id },
        }
    }

    /// The namespace of the texture.
    #[must_use]
    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    /// The path of the texture within its namespace.
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// The PNG file of this texture below the given root directory.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.namespace)
            .join("textures")
            .join(format!("{}.png", self.path))
    }
}

impl Display for TextureId<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Removes the items whose namespaced id is in `blacklist`, as well as `minecraft:air`.
#[must_use]
pub fn filter_items(items: Vec<Item>, blacklist: &[String]) -> Vec<Item> {
    let air = format!("{DEFAULT_NAMESPACE}:air");
    let blacklist = blacklist
        .iter()
        .map(String::as_str)
        .chain([air.as_str()])
        .collect::<HashSet<_>>();

    items
        .into_iter()
        .filter(|item| !blacklist.contains(item.id().as_str()))
        .collect()
}

/// Reads the item list and removes the items listed in the blacklist tag.
///
/// # Errors
/// Returns an error if either file cannot be read or parsed.
pub fn load_items(items: &Path, blacklist: &Path) -> Result<Vec<Item>, PackError> {
    let Tag { values } = read_json(blacklist)?;
    let items: Vec<Item> = read_json(items)?;
    Ok(filter_items(items, &values))
}
