// Dashboard component domain model
use super::ids::generate_id;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Open key/value mapping used for component props and styles.
pub type PropertyMap = Map<String, Value>;

/// 1-indexed placement of a component on the layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridArea {
    pub row: u32,
    pub col: u32,
    pub row_span: u32,
    pub col_span: u32,
}

impl GridArea {
    pub fn new(row: u32, col: u32, row_span: u32, col_span: u32) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// Placement for a copy dropped next to this area, kept inside a grid of `cols` columns.
    pub fn shifted_right(&self, cols: u32) -> Self {
        let last_start = cols.saturating_add(1).saturating_sub(self.col_span).max(1);
        Self {
            col: self.col.saturating_add(self.col_span).min(last_start),
            ..*self
        }
    }
}

/// Target cell for a move on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridPosition {
    pub row: u32,
    pub col: u32,
}

/// Partial component overrides applied at one breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropertyMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<PropertyMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_area: Option<GridArea>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<ComponentOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<ComponentOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<ComponentOverride>,
}

/// A placed, configurable unit on the canvas.
///
/// `component_type` is an open tag; unknown tags are stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardComponent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub props: PropertyMap,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub style: PropertyMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_area: Option<GridArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<ResponsiveOverrides>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DashboardComponent>,
}

impl DashboardComponent {
    /// A component without an id yet; the store assigns one when it is added.
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            component_type: component_type.into(),
            name: None,
            props: PropertyMap::new(),
            style: PropertyMap::new(),
            grid_area: None,
            responsive: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    pub fn with_grid_area(mut self, grid_area: GridArea) -> Self {
        self.grid_area = Some(grid_area);
        self
    }

    pub fn with_child(mut self, child: DashboardComponent) -> Self {
        self.children.push(child);
        self
    }

    /// Human label: the name when set, otherwise the type tag.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.component_type)
    }

    /// Depth-first search of this component and its children.
    pub fn find(&self, id: &str) -> Option<&DashboardComponent> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Visit this component and every descendant.
    pub fn for_each_id<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        visit(&self.id);
        for child in &self.children {
            child.for_each_id(visit);
        }
    }

    /// Give this component and all of its descendants fresh ids.
    pub fn reassign_ids(&mut self) {
        self.id = generate_id();
        for child in &mut self.children {
            child.reassign_ids();
        }
    }

    /// Apply a patch in place. `id` is never touched.
    pub fn apply_patch(&mut self, patch: &ComponentPatch) {
        if let Some(component_type) = &patch.component_type {
            self.component_type = component_type.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(props) = &patch.props {
            merge_properties(&mut self.props, props);
        }
        if let Some(style) = &patch.style {
            merge_properties(&mut self.style, style);
        }
        if let Some(grid_area) = &patch.grid_area {
            self.grid_area = *grid_area;
        }
        if let Some(responsive) = &patch.responsive {
            self.responsive = responsive.clone();
        }
        if let Some(children) = &patch.children {
            self.children = children.clone();
        }
    }
}

/// Partial update for a component.
///
/// Absent fields are left alone. For the nullable fields (`name`, `gridArea`,
/// `responsive`) an explicit `null` clears the value. `props` and `style` are
/// merged key by key, and a `null` value removes that key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(default, rename = "type")]
    pub component_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default)]
    pub props: Option<PropertyMap>,
    #[serde(default)]
    pub style: Option<PropertyMap>,
    #[serde(default, deserialize_with = "nullable")]
    pub grid_area: Option<Option<GridArea>>,
    #[serde(default, deserialize_with = "nullable")]
    pub responsive: Option<Option<ResponsiveOverrides>>,
    #[serde(default)]
    pub children: Option<Vec<DashboardComponent>>,
}

impl ComponentPatch {
    pub fn set_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props
            .get_or_insert_with(PropertyMap::new)
            .insert(key.into(), value);
        self
    }

    pub fn clear_prop(self, key: impl Into<String>) -> Self {
        self.set_prop(key, Value::Null)
    }

    pub fn set_style(mut self, key: impl Into<String>, value: Value) -> Self {
        self.style
            .get_or_insert_with(PropertyMap::new)
            .insert(key.into(), value);
        self
    }

    pub fn set_name(mut self, name: Option<String>) -> Self {
        self.name = Some(name);
        self
    }

    pub fn set_grid_area(mut self, grid_area: Option<GridArea>) -> Self {
        self.grid_area = Some(grid_area);
        self
    }
}

/// Give every component in `components` (children included) an id not yet in
/// `taken`, keeping ids that are free. Claimed ids are added to `taken`.
pub fn claim_unique_ids(components: &mut [DashboardComponent], taken: &mut HashSet<String>) {
    for component in components {
        while component.id.is_empty() || taken.contains(&component.id) {
            component.id = generate_id();
        }
        taken.insert(component.id.clone());
        claim_unique_ids(&mut component.children, taken);
    }
}

/// Shallow merge of `patch` into `target`; `null` values delete the key.
pub fn merge_properties(target: &mut PropertyMap, patch: &PropertyMap) {
    for (key, value) in patch {
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
