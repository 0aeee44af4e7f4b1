use std::path::Path;
use std::sync::Mutex;

use reelkit_core::{GatewayError, ProjectGateway, ProjectId};
use reelkit_wizard::{
    AudioPlan, Brief, Character, Composition, MoodBoard, PlatformChoice, ScriptSection, Storyboard,
};

use crate::error::Result;
use crate::store::Store;

/// [`ProjectGateway`] backed by the sqlite store. The connection is not
/// `Sync`, so the store sits behind a mutex; tool handlers run one at a
/// time anyway, so there is no contention to speak of.
pub struct SqliteGateway {
    store: Mutex<Store>,
}

impl SqliteGateway {
    pub fn new(store: Store) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Store::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Store::open_in_memory()?))
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut Store) -> Result<T>,
    ) -> std::result::Result<T, GatewayError> {
        let mut store = self.store.lock().unwrap();
        f(&mut store).map_err(|e| {
            tracing::warn!(error = %e, "project store operation failed");
            GatewayError::new(e.to_string())
        })
    }
}

impl ProjectGateway for SqliteGateway {
    fn ensure_project(&self, session_key: &str) -> std::result::Result<ProjectId, GatewayError> {
        self.with_store(|store| Ok(store.projects().ensure_project(session_key)?.id))
    }

    fn save_platform(
        &self,
        project_id: &str,
        platform: &PlatformChoice,
    ) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_platform(project_id, platform))
    }

    fn save_brief(&self, project_id: &str, brief: &Brief) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_brief(project_id, brief))
    }

    fn save_mood_board(
        &self,
        project_id: &str,
        board: &MoodBoard,
    ) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_mood_board(project_id, board))
    }

    fn save_storyboard(
        &self,
        project_id: &str,
        storyboard: &Storyboard,
    ) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_storyboard(project_id, storyboard))
    }

    fn save_audio_plan(
        &self,
        project_id: &str,
        audio: &AudioPlan,
    ) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_audio_plan(project_id, audio))
    }

    fn save_composition(
        &self,
        project_id: &str,
        composition: &Composition,
    ) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_composition(project_id, composition))
    }

    fn save_script_section(
        &self,
        project_id: &str,
        section: &ScriptSection,
    ) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_script_section(project_id, section))
    }

    fn save_character(
        &self,
        project_id: &str,
        character: &Character,
    ) -> std::result::Result<(), GatewayError> {
        self.with_store(|store| store.projects().save_character(project_id, character))
    }
}
