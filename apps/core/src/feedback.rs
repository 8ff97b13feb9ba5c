use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::icons;
use crate::model::Favourite;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IconKind {
    #[serde(rename = "fileicon")]
    FileIcon,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Icon {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IconKind>,
    pub path: String,
}

impl Icon {
    pub fn image(path: &str) -> Self {
        Self {
            kind: None,
            path: path.to_string(),
        }
    }

    pub fn file_icon(path: &str) -> Self {
        Self {
            kind: Some(IconKind::FileIcon),
            path: path.to_string(),
        }
    }
}

/// One row of Script Filter output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl From<&Favourite> for Item {
    fn from(value: &Favourite) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert("UUID".to_string(), value.id.clone());
        Self {
            uid: Some(value.id.clone()),
            title: value.name.clone(),
            subtitle: value.server.clone(),
            arg: Some(value.id.clone()),
            valid: true,
            autocomplete: None,
            icon: Some(icons::icon_for(value)),
            variables,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub items: Vec<Item>,
    #[serde(skip)]
    suppress_uids: bool,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn push_favourite(&mut self, favourite: &Favourite) {
        self.items.push(Item::from(favourite));
    }

    /// Stops the host from reordering results by usage, so a pinned
    /// first item stays first.
    pub fn suppress_uids(&mut self) {
        self.suppress_uids = true;
    }

    /// Adds a single non-actionable item when there is nothing else to show.
    pub fn warn_empty(&mut self, title: &str, subtitle: &str) {
        if !self.items.is_empty() {
            return;
        }
        self.items.push(Item {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            valid: false,
            icon: Some(Icon::image(icons::DEFAULT_ICON)),
            ..Default::default()
        });
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        if !self.suppress_uids {
            return serde_json::to_string(self);
        }
        let mut stripped = self.clone();
        for item in &mut stripped.items {
            item.uid = None;
        }
        serde_json::to_string(&stripped)
    }
}
