// Dashboard document model
use super::component::{DashboardComponent, PropertyMap, merge_properties, nullable};
use super::ids::generate_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Sidebar,
    Navbar,
    Footer,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionPosition {
    Fixed,
    Sticky,
    Relative,
}

/// A structural slot of the page that owns its own component list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SectionPosition>,
    #[serde(default)]
    pub style: PropertyMap,
    #[serde(default)]
    pub components: Vec<DashboardComponent>,
}

impl LayoutSection {
    pub fn new(id: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            visible: true,
            height: None,
            width: None,
            position: None,
            style: PropertyMap::new(),
            components: Vec::new(),
        }
    }

    pub fn apply_patch(&mut self, patch: &SectionPatch) {
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(height) = &patch.height {
            self.height = height.clone();
        }
        if let Some(width) = &patch.width {
            self.width = width.clone();
        }
        if let Some(position) = &patch.position {
            self.position = *position;
        }
        if let Some(style) = &patch.style {
            merge_properties(&mut self.style, style);
        }
        if let Some(components) = &patch.components {
            self.components = components.clone();
        }
    }
}

/// Partial update for a layout section. Same null semantics as `ComponentPatch`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub height: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub width: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub position: Option<Option<SectionPosition>>,
    #[serde(default)]
    pub style: Option<PropertyMap>,
    #[serde(default)]
    pub components: Option<Vec<DashboardComponent>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Grid,
    Flexbox,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSettings {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarSettings {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(rename = "type")]
    pub layout_type: LayoutType,
    pub rows: u32,
    pub cols: u32,
    pub gap: u32,
    #[serde(default)]
    pub sections: Vec<LayoutSection>,
    #[serde(default)]
    pub header: BarSettings,
    #[serde(default)]
    pub sidebar: SidebarSettings,
    #[serde(default)]
    pub content: ContentSettings,
    #[serde(default)]
    pub footer: BarSettings,
}

impl Layout {
    pub fn section(&self, id: &str) -> Option<&LayoutSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut LayoutSection> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Leave exactly one content section: the fallback is inserted when none
    /// exists, and extra content sections are folded into the first one.
    pub fn ensure_content_section(&mut self) {
        let mut seen = false;
        let mut folded = Vec::new();
        self.sections.retain_mut(|section| {
            if section.kind != SectionKind::Content {
                return true;
            }
            if !seen {
                seen = true;
                return true;
            }
            folded.append(&mut section.components);
            false
        });

        match self
            .sections
            .iter_mut()
            .find(|s| s.kind == SectionKind::Content)
        {
            Some(content) => content.components.append(&mut folded),
            None => self.sections.push(default_content_section()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub mode: ThemeMode,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: String,
    pub border_radius: String,
    pub shadows: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Light,
            primary_color: "#3b82f6".into(),
            secondary_color: "#64748b".into(),
            background_color: "#ffffff".into(),
            text_color: "#1f2937".into(),
            font_family: "Inter".into(),
            font_size: "14px".into(),
            border_radius: "8px".into(),
            shadows: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveSettings {
    pub breakpoints: Breakpoints,
    pub current_breakpoint: Breakpoint,
}

impl Default for ResponsiveSettings {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints {
                mobile: 768,
                tablet: 1024,
                desktop: 1280,
            },
            current_breakpoint: Breakpoint::Desktop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// The root document: the editor's entire state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub layout: Layout,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub responsive: ResponsiveSettings,
    #[serde(default)]
    pub components: Vec<DashboardComponent>,
    pub metadata: Metadata,
}

/// Shallow update of the top-level document fields. Metadata is merged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub responsive: Option<ResponsiveSettings>,
    #[serde(default)]
    pub components: Option<Vec<DashboardComponent>>,
    #[serde(default)]
    pub metadata: Option<MetadataPatch>,
}

impl DashboardConfig {
    /// The builder's stock starting document with a fresh id.
    pub fn new_default() -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: "New Dashboard".into(),
            description: "A custom dashboard built with Dashboard Builder".into(),
            layout: default_layout(),
            theme: Theme::default(),
            responsive: ResponsiveSettings::default(),
            components: Vec::new(),
            metadata: Metadata {
                created_at: now,
                updated_at: now,
                version: "1.0.0".into(),
                tags: Vec::new(),
            },
        }
    }

    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }

    pub fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(layout) = patch.layout {
            self.layout = layout;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(responsive) = patch.responsive {
            self.responsive = responsive;
        }
        if let Some(components) = patch.components {
            self.components = components;
        }
        if let Some(metadata) = patch.metadata {
            if let Some(created_at) = metadata.created_at {
                self.metadata.created_at = created_at;
            }
            if let Some(version) = metadata.version {
                self.metadata.version = version;
            }
            if let Some(tags) = metadata.tags {
                self.metadata.tags = tags;
            }
        }
        self.layout.ensure_content_section();
    }

    /// Recursive lookup across top-level components, then sections in order.
    pub fn find_component(&self, id: &str) -> Option<&DashboardComponent> {
        self.components
            .iter()
            .chain(self.layout.sections.iter().flat_map(|s| s.components.iter()))
            .find_map(|c| c.find(id))
    }

    /// Direct lookup for editing: top-level list first, then each section in
    /// order. Nested children are not reachable here.
    pub fn component_mut(&mut self, id: &str) -> Option<&mut DashboardComponent> {
        if let Some(index) = self.components.iter().position(|c| c.id == id) {
            return self.components.get_mut(index);
        }
        self.layout
            .sections
            .iter_mut()
            .find_map(|s| s.components.iter_mut().find(|c| c.id == id))
    }

    /// Every component id in the document, nested children included.
    pub fn component_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        let all = self
            .components
            .iter()
            .chain(self.layout.sections.iter().flat_map(|s| s.components.iter()));
        for component in all {
            component.for_each_id(&mut |id| ids.push(id));
        }
        ids
    }

    pub fn contains_component(&self, id: &str) -> bool {
        self.find_component(id).is_some()
    }
}

fn default_content_section() -> LayoutSection {
    let mut section = LayoutSection::new("content", SectionKind::Content);
    section.style = style(&[("backgroundColor", "#ffffff"), ("padding", "24px")]);
    section
}

fn style(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

fn default_layout() -> Layout {
    let mut header = LayoutSection::new("header", SectionKind::Header);
    header.height = Some("64px".into());
    header.position = Some(SectionPosition::Sticky);
    header.style = style(&[
        ("backgroundColor", "#ffffff"),
        ("borderBottom", "1px solid #e5e7eb"),
    ]);

    let mut sidebar = LayoutSection::new("sidebar", SectionKind::Sidebar);
    sidebar.width = Some("256px".into());
    sidebar.position = Some(SectionPosition::Fixed);
    sidebar.style = style(&[
        ("backgroundColor", "#f8fafc"),
        ("borderRight", "1px solid #e5e7eb"),
    ]);

    let mut footer = LayoutSection::new("footer", SectionKind::Footer);
    footer.visible = false;
    footer.height = Some("48px".into());
    footer.style = style(&[
        ("backgroundColor", "#f8fafc"),
        ("borderTop", "1px solid #e5e7eb"),
    ]);

    Layout {
        layout_type: LayoutType::Grid,
        rows: 12,
        cols: 12,
        gap: 16,
        sections: vec![header, sidebar, default_content_section(), footer],
        header: BarSettings {
            enabled: true,
            height: Some("64px".into()),
            background: Some("white".into()),
            padding: Some("16px 24px".into()),
        },
        sidebar: SidebarSettings {
            enabled: true,
            width: Some("256px".into()),
            position: Some("left".into()),
            collapsible: Some(false),
            background: Some("gray-50".into()),
            padding: Some("16px".into()),
        },
        content: ContentSettings {
            container: Some("fluid".into()),
            grid_columns: Some(12),
            gap: Some("md".into()),
            background: Some("white".into()),
            padding: Some("24px".into()),
        },
        footer: BarSettings {
            enabled: false,
            height: Some("48px".into()),
            background: Some("gray-50".into()),
            padding: Some("16px 24px".into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_shape() {
        let config = DashboardConfig::new_default();
        assert_eq!(config.layout.cols, 12);
        assert_eq!(config.layout.sections.len(), 4);
        assert!(config.components.is_empty());
        assert_eq!(config.metadata.version, "1.0.0");
        assert!(!config.layout.section("footer").unwrap().visible);
    }

    #[test]
    fn test_patch_merges_metadata() {
        let mut config = DashboardConfig::new_default();
        let created_at = config.metadata.created_at;
        config.apply_patch(ConfigPatch {
            name: Some("Sales".into()),
            metadata: Some(MetadataPatch {
                tags: Some(vec!["q3".into()]),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(config.name, "Sales");
        assert_eq!(config.metadata.tags, vec!["q3".to_string()]);
        assert_eq!(config.metadata.version, "1.0.0");
        assert_eq!(config.metadata.created_at, created_at);
    }

    #[test]
    fn test_layout_patch_restores_content_section() {
        let mut config = DashboardConfig::new_default();
        let mut layout = config.layout.clone();
        layout.sections.retain(|s| s.kind != SectionKind::Content);
        config.apply_patch(ConfigPatch {
            layout: Some(layout),
            ..Default::default()
        });

        let content: Vec<_> = config
            .layout
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::Content)
            .collect();
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn test_extra_content_sections_fold_into_first() {
        let mut layout = DashboardConfig::new_default().layout;
        let mut extra = LayoutSection::new("content2", SectionKind::Content);
        extra
            .components
            .push(DashboardComponent::new("chart").with_id("c2"));
        layout.sections.push(extra);
        layout
            .section_mut("content")
            .unwrap()
            .components
            .push(DashboardComponent::new("text").with_id("c1"));

        layout.ensure_content_section();

        let content: Vec<_> = layout
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::Content)
            .collect();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].id, "content");
        let ids: Vec<_> = content[0].components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
        assert!(layout.section("content2").is_none());
        assert_eq!(layout.sections.len(), 4);
    }

    #[test]
    fn test_section_patch_merges_style() {
        let mut section = LayoutSection::new("header", SectionKind::Header);
        section.style = style(&[("backgroundColor", "#fff")]);
        section.apply_patch(&SectionPatch {
            visible: Some(false),
            style: Some(style(&[("padding", "8px")])),
            ..Default::default()
        });

        assert!(!section.visible);
        assert_eq!(section.style.len(), 2);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let config = DashboardConfig::new_default();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"currentBreakpoint\":\"desktop\""));
        let back: DashboardConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
