// Dashboard store - Document mutations, history and persistence
use crate::application::error::StoreError;
use crate::application::history::HistoryLog;
use crate::application::notification_queue::NotificationQueue;
use crate::application::project_repository::ProjectRepository;
use crate::domain::component::{
    ComponentPatch, DashboardComponent, GridArea, GridPosition, claim_unique_ids,
};
use crate::domain::dashboard::{
    Breakpoint, ConfigPatch, DashboardConfig, Layout, LayoutSection, SectionPatch,
};
use crate::domain::session::CurrentProject;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Editor state that lives beside the document and is not part of history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub selected_component: Option<String>,
    pub selected_section: Option<String>,
    pub preview_mode: bool,
    pub current_breakpoint: Breakpoint,
    pub show_grid: bool,
    pub current_project: Option<CurrentProject>,
    pub is_auto_saving: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            selected_component: None,
            selected_section: None,
            preview_mode: false,
            current_breakpoint: Breakpoint::Desktop,
            show_grid: true,
            current_project: None,
            is_auto_saving: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub component_count: usize,
}

impl From<&DashboardConfig> for ProjectSummary {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            updated_at: config.metadata.updated_at,
            tags: config.metadata.tags.clone(),
            component_count: config.component_ids().len(),
        }
    }
}

/// Owns the live document, its history and the notification queue.
///
/// Every mutation builds the next document from a copy and swaps it in once,
/// so readers never observe a half-applied change. Targets that cannot be
/// found are ignored; outcomes reach the user only through notifications.
pub struct DashboardStore {
    config: DashboardConfig,
    history: HistoryLog,
    editor: EditorState,
    notifications: NotificationQueue,
    projects: Arc<dyn ProjectRepository>,
}

impl DashboardStore {
    pub fn new(
        config: DashboardConfig,
        history_capacity: usize,
        notifications: NotificationQueue,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        let mut config = config;
        config.layout.ensure_content_section();
        Self {
            config,
            history: HistoryLog::new(history_capacity),
            editor: EditorState::default(),
            notifications,
            projects,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn select_component(&mut self, id: Option<String>) {
        self.editor.selected_component = id;
    }

    pub fn select_section(&mut self, id: Option<String>) {
        self.editor.selected_section = id;
    }

    pub fn set_preview_mode(&mut self, preview: bool) {
        self.editor.preview_mode = preview;
    }

    pub fn set_current_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.editor.current_breakpoint = breakpoint;
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.editor.show_grid = show;
    }

    /// Stamp, swap in and record the next document.
    fn commit(&mut self, mut next: DashboardConfig, action: impl Into<String>) {
        next.touch();
        self.config = next;
        self.history.push(&self.config, action);
    }

    pub fn update_config(&mut self, mut patch: ConfigPatch) {
        if patch.components.is_some() || patch.layout.is_some() {
            let top: &[DashboardComponent] = match patch.components {
                Some(_) => &self.config.components,
                None => &[],
            };
            let sectioned: &[LayoutSection] = match patch.layout {
                Some(_) => &self.config.layout.sections,
                None => &[],
            };
            let mut taken =
                self.ids_outside(top.iter().chain(sectioned.iter().flat_map(|s| &s.components)));
            if let Some(components) = patch.components.as_mut() {
                claim_unique_ids(components, &mut taken);
            }
            if let Some(layout) = patch.layout.as_mut() {
                for section in &mut layout.sections {
                    claim_unique_ids(&mut section.components, &mut taken);
                }
            }
        }

        let mut next = self.config.clone();
        next.apply_patch(patch);
        self.commit(next, "Update config");
    }

    pub fn update_layout(&mut self, layout: Layout) {
        self.update_config(ConfigPatch {
            layout: Some(layout),
            ..Default::default()
        });
    }

    /// Append a component to a section, or to the top level when no section is
    /// given. Missing or clashing ids are replaced with fresh ones.
    pub fn add_component(&mut self, component: DashboardComponent, section_id: Option<&str>) {
        let mut component = component;
        self.ensure_unique_ids(&mut component);

        let mut next = self.config.clone();
        match section_id {
            Some(section_id) => match next.layout.section_mut(section_id) {
                Some(section) => section.components.push(component.clone()),
                None => {
                    tracing::debug!("Ignoring add to unknown section {}", section_id);
                    return;
                }
            },
            None => next.components.push(component.clone()),
        }

        self.commit(next, format!("Add {}", component.component_type));
        self.notifications
            .success(format!("{} added successfully", component.display_name()));
    }

    fn ensure_unique_ids(&self, component: &mut DashboardComponent) {
        let clash = {
            let mut taken: HashSet<&str> = self.config.component_ids().into_iter().collect();
            let mut clash = false;
            component.for_each_id(&mut |id| {
                if id.is_empty() || !taken.insert(id) {
                    clash = true;
                }
            });
            clash
        };

        if clash {
            component.reassign_ids();
        }
    }

    /// Ids in the current document, minus those of the subtrees about to be replaced.
    fn ids_outside<'a>(
        &self,
        replaced: impl IntoIterator<Item = &'a DashboardComponent>,
    ) -> HashSet<String> {
        let mut leaving = HashSet::new();
        for component in replaced {
            component.for_each_id(&mut |id| {
                leaving.insert(id);
            });
        }
        self.config
            .component_ids()
            .into_iter()
            .filter(|id| !leaving.contains(id))
            .map(String::from)
            .collect()
    }

    pub fn update_component(&mut self, id: &str, mut patch: ComponentPatch) {
        let mut next = self.config.clone();
        let Some(component) = next.component_mut(id) else {
            tracing::debug!("Ignoring update of unknown component {}", id);
            return;
        };
        if let Some(children) = patch.children.as_mut() {
            let mut taken = self.ids_outside(&component.children);
            claim_unique_ids(children, &mut taken);
        }
        component.apply_patch(&patch);
        self.commit(next, "Update component");
    }

    pub fn remove_component(&mut self, id: &str) {
        let present = self.config.components.iter().any(|c| c.id == id)
            || self
                .config
                .layout
                .sections
                .iter()
                .any(|s| s.components.iter().any(|c| c.id == id));
        if !present {
            tracing::debug!("Ignoring removal of unknown component {}", id);
            return;
        }

        let mut next = self.config.clone();
        next.components.retain(|c| c.id != id);
        for section in &mut next.layout.sections {
            section.components.retain(|c| c.id != id);
        }

        self.commit(next, "Remove component");
        if self.editor.selected_component.as_deref() == Some(id) {
            self.editor.selected_component = None;
        }
        self.notifications.success("Component removed");
    }

    pub fn delete_component(&mut self, id: &str) {
        self.remove_component(id);
    }

    /// Copy a component (searching nested children too) to the top level,
    /// placed to the right of the original.
    pub fn duplicate_component(&mut self, id: &str) {
        let Some(original) = self.config.find_component(id) else {
            tracing::debug!("Ignoring duplicate of unknown component {}", id);
            return;
        };

        let mut copy = original.clone();
        copy.reassign_ids();
        copy.name = Some(format!("{} Copy", original.display_name()));
        copy.grid_area = original
            .grid_area
            .map(|area| area.shifted_right(self.config.layout.cols));

        self.add_component(copy, None);
    }

    /// Only top-level components with a grid area can be moved.
    pub fn move_component(&mut self, id: &str, position: GridPosition) {
        let Some(area) = self
            .config
            .components
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.grid_area)
        else {
            tracing::debug!("Ignoring move of {}: not a placed top-level component", id);
            return;
        };

        let moved = GridArea {
            row: position.row,
            col: position.col,
            ..area
        };
        self.update_component(id, ComponentPatch::default().set_grid_area(Some(moved)));
    }

    pub fn update_layout_section(&mut self, section_id: &str, mut patch: SectionPatch) {
        let mut next = self.config.clone();
        let Some(section) = next.layout.section_mut(section_id) else {
            tracing::debug!("Ignoring update of unknown section {}", section_id);
            return;
        };
        if let Some(components) = patch.components.as_mut() {
            let mut taken = self.ids_outside(&section.components);
            claim_unique_ids(components, &mut taken);
        }
        section.apply_patch(&patch);
        self.commit(next, format!("Update {} section", section_id));
    }

    pub fn toggle_section_visibility(&mut self, section_id: &str) {
        let Some(visible) = self.config.layout.section(section_id).map(|s| s.visible) else {
            tracing::debug!("Ignoring toggle of unknown section {}", section_id);
            return;
        };
        self.update_layout_section(
            section_id,
            SectionPatch {
                visible: Some(!visible),
                ..Default::default()
            },
        );
    }

    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.undo() else {
            return;
        };
        self.config = snapshot.clone();
        self.notifications.success("Undone");
    }

    pub fn redo(&mut self) {
        let Some(snapshot) = self.history.redo() else {
            return;
        };
        self.config = snapshot.clone();
        self.notifications.success("Redone");
    }

    async fn persist(&self) -> Result<(), StoreError> {
        self.projects.save(&self.config).await?;
        Ok(())
    }

    pub async fn save_project(&mut self) {
        self.editor.is_auto_saving = true;
        let result = self.persist().await;
        self.editor.is_auto_saving = false;

        match result {
            Ok(()) => {
                tracing::info!("Saved project {} ({})", self.config.name, self.config.id);
                self.editor.current_project = Some(CurrentProject {
                    id: self.config.id.clone(),
                    name: self.config.name.clone(),
                });
                self.notifications.success("Project saved successfully!");
            }
            Err(e) => {
                tracing::error!("Error saving project {}: {}", self.config.id, e);
                self.notifications.error("Failed to save project");
            }
        }
    }

    /// Timer-driven save: quiet on success, one error notification on failure.
    pub async fn auto_save(&mut self) -> Result<(), StoreError> {
        self.editor.is_auto_saving = true;
        let result = self.persist().await;
        self.editor.is_auto_saving = false;

        if result.is_err() {
            self.notifications.error("Auto-save failed");
        }
        result
    }

    pub async fn load_project(&mut self, id: &str) {
        match self.projects.load(id).await {
            Ok(Some(mut project)) => {
                project.layout.ensure_content_section();
                self.editor.current_project = Some(CurrentProject {
                    id: project.id.clone(),
                    name: project.name.clone(),
                });
                self.config = project;
                self.history.reset(&self.config, "Load project");
                tracing::info!("Loaded project {}", id);
                self.notifications.success("Project loaded successfully!");
            }
            Ok(None) => {
                tracing::warn!("Project {} not found", id);
                self.notifications.error("Project not found");
            }
            Err(e) => {
                tracing::error!("Error loading project {}: {}", id, e);
                self.notifications.error("Failed to load project");
            }
        }
    }

    pub fn create_new_project(&mut self) {
        self.config = DashboardConfig::new_default();
        self.editor.current_project = Some(CurrentProject {
            id: self.config.id.clone(),
            name: self.config.name.clone(),
        });
        self.editor.selected_component = None;
        self.editor.selected_section = None;
        self.history.reset(&self.config, "Create new project");
        self.notifications.success("New project created!");
    }

    pub async fn list_projects(&self) -> Vec<ProjectSummary> {
        match self.projects.list().await {
            Ok(projects) => projects.iter().map(ProjectSummary::from).collect(),
            Err(e) => {
                tracing::error!("Error listing projects: {}", e);
                self.notifications.error("Failed to load projects");
                Vec::new()
            }
        }
    }

    /// Stop delivering notifications; used when the store leaves its scope.
    pub fn dispose(&self) {
        self.notifications.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notification_queue::RecordingSurface;
    use crate::domain::dashboard::SectionKind;
    use crate::domain::notification::NotificationKind;
    use crate::infrastructure::local_storage::LocalStorage;
    use crate::infrastructure::project_store::LocalProjectRepository;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    fn repository() -> Arc<LocalProjectRepository> {
        Arc::new(LocalProjectRepository::new(
            Arc::new(LocalStorage::in_memory()),
            Duration::ZERO,
            Duration::ZERO,
        ))
    }

    fn store_with(
        projects: Arc<dyn ProjectRepository>,
    ) -> (DashboardStore, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let queue = NotificationQueue::new(surface.clone(), Duration::ZERO);
        let store = DashboardStore::new(DashboardConfig::new_default(), 50, queue, projects);
        (store, surface)
    }

    fn store() -> (DashboardStore, Arc<RecordingSurface>) {
        store_with(repository())
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    fn only_id(store: &DashboardStore) -> String {
        assert_eq!(store.config().components.len(), 1);
        store.config().components[0].id.clone()
    }

    #[test]
    fn test_add_assigns_id_and_records_history() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("button"), None);

        let id = only_id(&store);
        assert!(!id.is_empty());
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history().current().unwrap().action, "Add button");
    }

    #[test]
    fn test_add_to_section_and_unknown_section() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("logo"), Some("header"));
        assert_eq!(store.config().layout.section("header").unwrap().components.len(), 1);
        assert!(store.config().components.is_empty());

        store.add_component(DashboardComponent::new("logo"), Some("nowhere"));
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.config().component_ids().len(), 1);
    }

    #[test]
    fn test_ids_stay_unique_across_adds_and_duplicates() {
        let (mut store, _) = store();
        let card = DashboardComponent::new("card")
            .with_id("fixed")
            .with_child(DashboardComponent::new("text").with_id("child"));
        store.add_component(card.clone(), None);
        store.add_component(card, Some("sidebar"));
        store.duplicate_component("fixed");
        store.duplicate_component("child");

        let ids = store.config().component_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 7);
        assert_eq!(unique.len(), ids.len());
    }

    fn assert_unique_ids(store: &DashboardStore) {
        let ids = store.config().component_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate ids in {:?}", ids);
    }

    #[test]
    fn test_children_patch_cannot_reuse_taken_ids() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("text").with_id("a"), None);
        store.add_component(
            DashboardComponent::new("card")
                .with_id("card")
                .with_child(DashboardComponent::new("text").with_id("kid")),
            None,
        );

        let patch = ComponentPatch {
            children: Some(vec![
                DashboardComponent::new("text").with_id("a"),
                DashboardComponent::new("text").with_id("kid"),
                DashboardComponent::new("text").with_id("kid"),
            ]),
            ..Default::default()
        };
        store.update_component("card", patch);

        assert_unique_ids(&store);
        let card = &store.config().components[1];
        assert_eq!(store.config().components[0].id, "a");
        assert_eq!(card.children.len(), 3);
        assert_ne!(card.children[0].id, "a");
        assert_eq!(card.children[1].id, "kid");
        assert_ne!(card.children[2].id, "kid");
    }

    #[test]
    fn test_section_components_patch_cannot_reuse_taken_ids() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("text").with_id("a"), None);
        store.add_component(DashboardComponent::new("logo").with_id("logo"), Some("header"));

        store.update_layout_section(
            "header",
            SectionPatch {
                components: Some(vec![
                    DashboardComponent::new("logo").with_id("logo"),
                    DashboardComponent::new("text").with_id("a"),
                ]),
                ..Default::default()
            },
        );

        assert_unique_ids(&store);
        let header = store.config().layout.section("header").unwrap();
        assert_eq!(header.components[0].id, "logo");
        assert_ne!(header.components[1].id, "a");
        assert_eq!(store.config().components[0].id, "a");
    }

    #[test]
    fn test_config_components_patch_cannot_reuse_section_ids() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("logo").with_id("a"), Some("header"));
        store.add_component(DashboardComponent::new("text").with_id("b"), None);

        store.update_config(ConfigPatch {
            components: Some(vec![
                DashboardComponent::new("text").with_id("a"),
                DashboardComponent::new("text").with_id("b"),
            ]),
            ..Default::default()
        });

        assert_unique_ids(&store);
        let top = &store.config().components;
        assert_ne!(top[0].id, "a");
        assert_eq!(top[1].id, "b");
        assert_eq!(
            store.config().layout.section("header").unwrap().components[0].id,
            "a"
        );
    }

    #[test]
    fn test_layout_replacement_keeps_ids_and_one_content_section() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("text").with_id("a"), None);
        store.add_component(DashboardComponent::new("logo").with_id("h"), Some("header"));

        let mut layout = store.config().layout.clone();
        let mut extra = LayoutSection::new("content2", SectionKind::Content);
        extra
            .components
            .push(DashboardComponent::new("chart").with_id("a"));
        layout.sections.push(extra);
        store.update_layout(layout);

        assert_unique_ids(&store);
        let config = store.config();
        assert_eq!(config.components[0].id, "a");
        assert_eq!(config.layout.section("header").unwrap().components[0].id, "h");
        let content: Vec<_> = config
            .layout
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::Content)
            .collect();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].components.len(), 1);
        assert_eq!(content[0].components[0].component_type, "chart");
    }

    #[test]
    fn test_duplicate_at_far_right_column_does_not_overflow() {
        let (mut store, _) = store();
        store.add_component(
            DashboardComponent::new("chart")
                .with_id("a")
                .with_grid_area(GridArea::new(1, u32::MAX, 1, 2)),
            None,
        );
        store.duplicate_component("a");

        let copy = &store.config().components[1];
        assert_eq!(copy.grid_area.unwrap().col, 11);
    }

    #[test]
    fn test_history_length_is_bounded() {
        let (mut store, _) = store();
        for i in 0..60 {
            store.add_component(DashboardComponent::new("text").with_prop("i", json!(i)), None);
            let expected = (i + 1).min(50);
            assert_eq!(store.history().len(), expected);
            assert_eq!(store.history().cursor(), Some(expected - 1));
        }
    }

    #[test]
    fn test_update_merges_props_in_sections() {
        let (mut store, _) = store();
        store.add_component(
            DashboardComponent::new("nav").with_id("n1").with_prop("items", json!(3)),
            Some("sidebar"),
        );
        store.update_component("n1", ComponentPatch::default().set_prop("dense", json!(true)));

        let nav = store.config().find_component("n1").unwrap();
        assert_eq!(nav.props.get("items"), Some(&json!(3)));
        assert_eq!(nav.props.get("dense"), Some(&json!(true)));
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_update_unknown_component_is_noop() {
        let (mut store, _) = store();
        let before = store.config().clone();
        store.update_component("ghost", ComponentPatch::default().set_prop("a", json!(1)));
        assert_eq!(store.config(), &before);
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_update_stamps_updated_at() {
        let (mut store, _) = store();
        let created = store.config().metadata.updated_at;
        std::thread::sleep(Duration::from_millis(2));
        store.update_config(ConfigPatch {
            name: Some("Ops".into()),
            ..Default::default()
        });
        assert!(store.config().metadata.updated_at > created);
        assert_eq!(store.history().current().unwrap().action, "Update config");
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("a"), None);
        store.add_component(DashboardComponent::new("b"), None);
        let current = store.config().clone();

        store.undo();
        assert_eq!(store.config().components.len(), 1);
        store.redo();
        assert_eq!(store.config(), &current);

        store.redo();
        assert_eq!(store.config(), &current);
        assert_eq!(store.history().cursor(), Some(1));
    }

    #[test]
    fn test_new_mutation_after_undo_discards_redo() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("a"), None);
        store.add_component(DashboardComponent::new("b"), None);
        store.undo();
        assert!(store.can_redo());

        store.toggle_section_visibility("footer");
        assert!(!store.can_redo());
    }

    #[test]
    fn test_duplicate_shifts_and_clamps() {
        let (mut store, _) = store();
        store.add_component(
            DashboardComponent::new("chart")
                .with_id("c1")
                .with_grid_area(GridArea::new(1, 1, 2, 3)),
            None,
        );
        store.add_component(
            DashboardComponent::new("chart")
                .with_id("c2")
                .with_name("Edge")
                .with_grid_area(GridArea::new(1, 10, 1, 3)),
            None,
        );
        store.duplicate_component("c1");
        store.duplicate_component("c2");

        let components = &store.config().components;
        assert_eq!(components.len(), 4);
        assert_eq!(components[2].grid_area, Some(GridArea::new(1, 4, 2, 3)));
        assert_eq!(components[2].name.as_deref(), Some("chart Copy"));
        assert_eq!(components[3].grid_area.unwrap().col, 10);
        assert_eq!(components[3].name.as_deref(), Some("Edge Copy"));
        assert_eq!(store.history().current().unwrap().action, "Add chart");
    }

    #[test]
    fn test_duplicate_unknown_is_noop() {
        let (mut store, _) = store();
        store.duplicate_component("ghost");
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_move_only_reaches_top_level() {
        let (mut store, _) = store();
        store.add_component(
            DashboardComponent::new("kpi")
                .with_id("top")
                .with_grid_area(GridArea::new(1, 1, 1, 2)),
            None,
        );
        store.add_component(
            DashboardComponent::new("kpi")
                .with_id("nested")
                .with_grid_area(GridArea::new(1, 1, 1, 2)),
            Some("content"),
        );
        store.add_component(DashboardComponent::new("text").with_id("loose"), None);

        store.move_component("top", GridPosition { row: 3, col: 5 });
        store.move_component("nested", GridPosition { row: 3, col: 5 });
        store.move_component("loose", GridPosition { row: 3, col: 5 });

        let top = store.config().find_component("top").unwrap();
        assert_eq!(top.grid_area, Some(GridArea::new(3, 5, 1, 2)));
        let nested = store.config().find_component("nested").unwrap();
        assert_eq!(nested.grid_area, Some(GridArea::new(1, 1, 1, 2)));
        assert_eq!(store.history().len(), 4);
    }

    #[test]
    fn test_remove_clears_matching_selection_only() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("a").with_id("a"), None);
        store.add_component(DashboardComponent::new("b").with_id("b"), Some("header"));

        store.select_component(Some("a".into()));
        store.remove_component("b");
        assert_eq!(store.editor().selected_component.as_deref(), Some("a"));

        store.delete_component("a");
        assert_eq!(store.editor().selected_component, None);
        assert!(store.config().component_ids().is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut store, _) = store();
        store.remove_component("ghost");
        assert!(store.history().is_empty());
        assert_eq!(store.notifications().pending_len(), 0);
    }

    #[test]
    fn test_live_edits_do_not_reach_snapshots() {
        let (mut store, _) = store();
        store.add_component(DashboardComponent::new("text").with_id("t").with_prop("v", json!(1)), None);
        store.update_component("t", ComponentPatch::default().set_prop("v", json!(2)));

        let first = store.history().entries().next().unwrap();
        assert_eq!(first.snapshot.components[0].props.get("v"), Some(&json!(1)));
    }

    #[test]
    fn test_section_updates_and_toggle() {
        let (mut store, _) = store();
        store.toggle_section_visibility("footer");
        assert!(store.config().layout.section("footer").unwrap().visible);
        assert_eq!(store.history().current().unwrap().action, "Update footer section");

        store.update_layout_section(
            "header",
            SectionPatch {
                height: Some(Some("80px".into())),
                ..Default::default()
            },
        );
        assert_eq!(
            store.config().layout.section("header").unwrap().height.as_deref(),
            Some("80px")
        );

        store.toggle_section_visibility("ghost");
        store.update_layout_section("ghost", SectionPatch::default());
        assert_eq!(store.history().len(), 2);
    }

    #[tokio::test]
    async fn test_notifications_arrive_after_mutation_returns() {
        let (mut store, surface) = store();
        store.add_component(DashboardComponent::new("button").with_name("Buy"), None);
        assert!(surface.delivered().is_empty());

        settle().await;
        assert_eq!(surface.messages(), vec!["Buy added successfully"]);
    }

    #[tokio::test]
    async fn test_undo_at_boundary_is_silent() {
        let (mut store, surface) = store();
        store.add_component(DashboardComponent::new("a"), None);
        settle().await;

        store.undo();
        store.redo();
        settle().await;
        assert_eq!(surface.messages(), vec!["a added successfully"]);
        assert_eq!(store.history().cursor(), Some(0));
    }

    #[tokio::test]
    async fn test_button_scenario() {
        let (mut store, surface) = store();
        store.add_component(
            DashboardComponent::new("button").with_prop("text", json!("Click")),
            None,
        );
        let id = only_id(&store);
        assert_eq!(store.config().components[0].component_type, "button");
        assert_eq!(store.history().len(), 1);

        store.update_component(&id, ComponentPatch::default().set_prop("text", json!("Clicked")));
        assert_eq!(store.config().components[0].id, id);
        assert_eq!(store.config().components[0].props["text"], json!("Clicked"));
        assert_eq!(store.history().len(), 2);

        store.undo();
        assert_eq!(store.config().components[0].props["text"], json!("Click"));
        assert_eq!(store.history().cursor(), Some(0));

        store.select_component(Some(id.clone()));
        store.remove_component(&id);
        assert!(store.config().components.is_empty());
        assert_eq!(store.editor().selected_component, None);

        settle().await;
        assert_eq!(
            surface.messages(),
            vec!["button added successfully", "Undone", "Component removed"]
        );
    }

    #[tokio::test]
    async fn test_save_then_load_resets_history() {
        let projects = repository();
        let (mut store, surface) = store_with(projects.clone());
        store.add_component(DashboardComponent::new("table"), None);
        store.save_project().await;
        let saved_id = store.config().id.clone();

        store.create_new_project();
        assert_ne!(store.config().id, saved_id);
        assert_eq!(store.history().len(), 1);

        store.load_project(&saved_id).await;
        assert_eq!(store.config().id, saved_id);
        assert_eq!(store.config().components.len(), 1);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history().current().unwrap().action, "Load project");
        assert!(!store.can_undo());
        assert_eq!(store.editor().current_project.as_ref().unwrap().id, saved_id);
        assert_eq!(store.list_projects().await.len(), 1);

        settle().await;
        assert_eq!(
            surface.messages(),
            vec![
                "table added successfully",
                "Project saved successfully!",
                "New project created!",
                "Project loaded successfully!",
            ]
        );
    }

    #[tokio::test]
    async fn test_load_missing_project_reports_error() {
        let (mut store, surface) = store();
        store.add_component(DashboardComponent::new("a"), None);
        let before = store.config().clone();

        store.load_project("missing").await;
        assert_eq!(store.config(), &before);

        settle().await;
        let last = surface.delivered().pop().unwrap();
        assert_eq!(last.message, "Project not found");
        assert_eq!(last.kind, NotificationKind::Error);
    }

    struct BrokenRepository;

    #[async_trait]
    impl ProjectRepository for BrokenRepository {
        async fn list(&self) -> anyhow::Result<Vec<DashboardConfig>> {
            anyhow::bail!("disk unavailable")
        }

        async fn save(&self, _config: &DashboardConfig) -> anyhow::Result<()> {
            anyhow::bail!("disk unavailable")
        }

        async fn load(&self, _id: &str) -> anyhow::Result<Option<DashboardConfig>> {
            anyhow::bail!("disk unavailable")
        }
    }

    #[tokio::test]
    async fn test_io_failures_surface_one_error_each() {
        let (mut store, surface) = store_with(Arc::new(BrokenRepository));
        let before = store.config().clone();

        store.save_project().await;
        store.load_project("x").await;
        assert_eq!(store.config(), &before);
        assert!(store.editor().current_project.is_none());
        assert!(!store.editor().is_auto_saving);
        assert!(store.auto_save().await.is_err());

        settle().await;
        let delivered = surface.delivered();
        assert_eq!(delivered.len(), 3);
        assert!(delivered.iter().all(|n| n.kind == NotificationKind::Error));
        assert_eq!(delivered[0].message, "Failed to save project");
        assert_eq!(delivered[1].message, "Failed to load project");
    }

    #[tokio::test]
    async fn test_dispose_silences_notifications() {
        let (mut store, surface) = store();
        store.add_component(DashboardComponent::new("a"), None);
        store.dispose();
        store.add_component(DashboardComponent::new("b"), None);

        settle().await;
        assert!(surface.delivered().is_empty());
        assert_eq!(store.config().components.len(), 2);
    }
}
