//! Desktop icon model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned icon identifier, unique within a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconId(i64);

impl IconId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for IconId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IconId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Server-assigned folder (category) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resource kinds the server lists as smart folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Doc,
    Video,
    Audio,
}

impl MediaKind {
    pub const ALL: [Self; 4] = [Self::Image, Self::Doc, Self::Video, Self::Audio];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Doc => "doc",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

/// A `parent_id` as the desktop endpoints understand it.
///
/// `Root` and `Category` are real containers. `Recent` and `Media` are
/// server-side views that can be listed but never receive icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FolderRef {
    /// The desktop itself
    #[default]
    Root,
    /// A folder, by category id
    Category(CategoryId),
    /// The twenty most recently created icons
    Recent,
    /// Every resource of one kind
    Media(MediaKind),
}

impl FolderRef {
    /// Whether icons can be moved or created here
    pub const fn accepts_icons(self) -> bool {
        matches!(self, Self::Root | Self::Category(_))
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Category(id) => write!(f, "{id}"),
            Self::Recent => f.write_str("recent"),
            Self::Media(kind) => f.write_str(kind.as_str()),
        }
    }
}

impl FromStr for FolderRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() || s == "root" {
            return Ok(Self::Root);
        }
        if s == "recent" {
            return Ok(Self::Recent);
        }
        if let Some(kind) = MediaKind::ALL.into_iter().find(|kind| kind.as_str() == s) {
            return Ok(Self::Media(kind));
        }
        s.parse::<i64>()
            .map(|id| Self::Category(CategoryId(id)))
            .map_err(|_| format!("unknown folder '{s}'"))
    }
}

/// Numeric ids go out as numbers, everything else as its name.
impl Serialize for FolderRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Category(id) => serializer.serialize_i64(id.get()),
            other => serializer.collect_str(other),
        }
    }
}

/// What an icon points at.
///
/// The server reports the content type's model name; names other than
/// `category` and `resource` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconKind {
    /// A folder
    Category,
    /// A file or link
    Resource,
    /// Anything else, including the server's own `unknown`
    Unknown(String),
}

impl IconKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Category => "category",
            Self::Resource => "resource",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for IconKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "category" => Self::Category,
            "resource" => Self::Resource,
            _ => Self::Unknown(value),
        }
    }
}

impl From<IconKind> for String {
    fn from(value: IconKind) -> Self {
        match value {
            IconKind::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// How a link icon opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// Inside a desktop window
    #[default]
    Window,
    /// In a new browser tab
    Tab,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_mode: Option<OpenMode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LinkData {
    pub fn open_mode(&self) -> OpenMode {
        self.open_mode.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Polymorphic icon payload.
///
/// Variants are tried in order: a `name` marks a folder, a non-null `link`
/// a link, a non-null `file` a stored file. Anything else is kept raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconData {
    Folder(FolderData),
    Link(LinkData),
    File(FileData),
    Other(Map<String, Value>),
}

/// An icon on the desktop or inside a folder
///
/// Fields the client does not interpret (`parent_folder_id`, `updated_at`,
/// ...) are kept in `extra`, and `type`/`data` are written back only when
/// the server sent them, so a cached icon serializes to what was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub id: IconId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IconKind>,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<IconData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Icon {
    /// Create an icon with no payload at the origin
    #[must_use]
    pub fn new(id: impl Into<IconId>, title: impl Into<String>, kind: IconKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: Some(kind),
            x: 0,
            y: 0,
            data: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub const fn with_position(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: IconData) -> Self {
        self.data = Some(data);
        self
    }

    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, Some(IconKind::Category)) || matches!(self.data, Some(IconData::Folder(_)))
    }

    /// Category this icon opens, when it is a folder.
    ///
    /// Read from the folder payload, falling back to the generic `object_id`.
    pub fn folder_id(&self) -> Option<CategoryId> {
        if !self.is_folder() {
            return None;
        }
        match &self.data {
            Some(IconData::Folder(FolderData { id: Some(id), .. })) => Some(*id),
            _ => self
                .extra
                .get("object_id")
                .and_then(Value::as_i64)
                .map(CategoryId),
        }
    }
}
