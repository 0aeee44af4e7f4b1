use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use reelkit_wizard::{
    AudioPlan, Brief, Character, Composition, MoodBoard, PlatformChoice, ScriptSection, Storyboard,
};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub session_key: String,
    pub platform: Option<PlatformChoice>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

pub struct Projects<'db> {
    pub(crate) conn: &'db mut Connection,
}

impl Projects<'_> {
    /// Find or create the project bound to a session key. At most one row
    /// per key ever exists; racing callers all land on the same id.
    pub fn ensure_project(&mut self, session_key: &str) -> Result<ProjectRecord> {
        let now = now_ms();
        let tx = self.conn.transaction()?;

        let existing = tx
            .query_row(
                "SELECT id, session_key, platform_json, created_at_ms, updated_at_ms
                 FROM projects
                 WHERE session_key = ?1",
                params![session_key],
                row_to_project,
            )
            .optional()?;

        let project = if let Some(project) = existing {
            project
        } else {
            let id = generate_id(&tx, "proj")?;
            tx.execute(
                "INSERT INTO projects (id, session_key, platform_json, created_at_ms, updated_at_ms)
                 VALUES (?1, ?2, NULL, ?3, ?4)",
                params![id, session_key, now, now],
            )?;
            ProjectRecord {
                id,
                session_key: session_key.to_string(),
                platform: None,
                created_at_ms: now,
                updated_at_ms: now,
            }
        };

        tx.commit()?;
        Ok(project)
    }

    pub fn get_project(&self, project_id: &str) -> Result<Option<ProjectRecord>> {
        self.conn
            .query_row(
                "SELECT id, session_key, platform_json, created_at_ms, updated_at_ms
                 FROM projects
                 WHERE id = ?1",
                params![project_id],
                row_to_project,
            )
            .optional()
            .map_err(Error::from)
    }

    /// The platform choice lives on the project row itself.
    pub fn save_platform(&mut self, project_id: &str, platform: &PlatformChoice) -> Result<()> {
        let platform_json = serde_json::to_string(platform)?;
        let now = now_ms();
        let tx = self.conn.transaction()?;

        ensure_project_exists(&tx, project_id)?;
        tx.execute(
            "UPDATE projects
             SET platform_json = ?2, updated_at_ms = ?3
             WHERE id = ?1",
            params![project_id, platform_json, now],
        )?;

        tx.commit()?;
        Ok(())
    }

    pub fn save_brief(&mut self, project_id: &str, brief: &Brief) -> Result<()> {
        self.upsert_singleton("briefs", "brief", project_id, brief)
    }

    pub fn get_brief(&self, project_id: &str) -> Result<Option<Brief>> {
        self.get_singleton("briefs", project_id)
    }

    pub fn save_mood_board(&mut self, project_id: &str, board: &MoodBoard) -> Result<()> {
        self.upsert_singleton("mood_boards", "mood", project_id, board)
    }

    pub fn get_mood_board(&self, project_id: &str) -> Result<Option<MoodBoard>> {
        self.get_singleton("mood_boards", project_id)
    }

    pub fn save_storyboard(&mut self, project_id: &str, storyboard: &Storyboard) -> Result<()> {
        self.upsert_singleton("storyboards", "story", project_id, storyboard)
    }

    pub fn get_storyboard(&self, project_id: &str) -> Result<Option<Storyboard>> {
        self.get_singleton("storyboards", project_id)
    }

    pub fn save_audio_plan(&mut self, project_id: &str, audio: &AudioPlan) -> Result<()> {
        self.upsert_singleton("audio_plans", "audio", project_id, audio)
    }

    pub fn get_audio_plan(&self, project_id: &str) -> Result<Option<AudioPlan>> {
        self.get_singleton("audio_plans", project_id)
    }

    pub fn save_composition(&mut self, project_id: &str, composition: &Composition) -> Result<()> {
        self.upsert_singleton("compositions", "comp", project_id, composition)
    }

    pub fn get_composition(&self, project_id: &str) -> Result<Option<Composition>> {
        self.get_singleton("compositions", project_id)
    }

    /// Upsert a script section keyed by its heading.
    pub fn save_script_section(&mut self, project_id: &str, section: &ScriptSection) -> Result<()> {
        let now = now_ms();
        let tx = self.conn.transaction()?;

        ensure_project_exists(&tx, project_id)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM script_sections WHERE project_id = ?1 AND heading = ?2",
                params![project_id, section.heading],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE script_sections
                     SET body = ?2, updated_at_ms = ?3
                     WHERE id = ?1",
                    params![id, section.body, now],
                )?;
            }
            None => {
                let id = generate_id(&tx, "sect")?;
                tx.execute(
                    "INSERT INTO script_sections (id, project_id, heading, body, created_at_ms, updated_at_ms)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![id, project_id, section.heading, section.body, now, now],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub fn list_script_sections(&self, project_id: &str) -> Result<Vec<ScriptSection>> {
        let mut stmt = self.conn.prepare(
            "SELECT heading, body
             FROM script_sections
             WHERE project_id = ?1
             ORDER BY created_at_ms ASC",
        )?;
        let iter = stmt.query_map(params![project_id], |row| {
            Ok(ScriptSection {
                heading: row.get(0)?,
                body: row.get(1)?,
            })
        })?;
        collect_rows(iter)
    }

    /// Upsert a character keyed by its name.
    pub fn save_character(&mut self, project_id: &str, character: &Character) -> Result<()> {
        let now = now_ms();
        let tx = self.conn.transaction()?;

        ensure_project_exists(&tx, project_id)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM script_characters WHERE project_id = ?1 AND name = ?2",
                params![project_id, character.name],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE script_characters
                     SET description = ?2, updated_at_ms = ?3
                     WHERE id = ?1",
                    params![id, character.description, now],
                )?;
            }
            None => {
                let id = generate_id(&tx, "char")?;
                tx.execute(
                    "INSERT INTO script_characters (id, project_id, name, description, created_at_ms, updated_at_ms)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![id, project_id, character.name, character.description, now, now],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub fn list_characters(&self, project_id: &str) -> Result<Vec<Character>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, description
             FROM script_characters
             WHERE project_id = ?1
             ORDER BY created_at_ms ASC",
        )?;
        let iter = stmt.query_map(params![project_id], |row| {
            Ok(Character {
                name: row.get(0)?,
                description: row.get(1)?,
            })
        })?;
        collect_rows(iter)
    }

    // One payload row per project; repeated saves update in place. The
    // table names here are fixed strings from the callers above, never
    // user input.
    fn upsert_singleton<T: Serialize>(
        &mut self,
        table: &str,
        id_prefix: &str,
        project_id: &str,
        payload: &T,
    ) -> Result<()> {
        let payload_json = serde_json::to_string(payload)?;
        let now = now_ms();
        let tx = self.conn.transaction()?;

        ensure_project_exists(&tx, project_id)?;

        let existing: Option<String> = tx
            .query_row(
                &format!("SELECT id FROM {table} WHERE project_id = ?1"),
                params![project_id],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                tx.execute(
                    &format!(
                        "UPDATE {table}
                         SET payload_json = ?2, updated_at_ms = ?3
                         WHERE id = ?1"
                    ),
                    params![id, payload_json, now],
                )?;
            }
            None => {
                let id = generate_id(&tx, id_prefix)?;
                tx.execute(
                    &format!(
                        "INSERT INTO {table} (id, project_id, payload_json, created_at_ms, updated_at_ms)
                         VALUES (?1, ?2, ?3, ?4, ?5)"
                    ),
                    params![id, project_id, payload_json, now, now],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_singleton<T: DeserializeOwned>(
        &self,
        table: &str,
        project_id: &str,
    ) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT payload_json FROM {table} WHERE project_id = ?1"),
                params![project_id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    #[cfg(test)]
    pub(crate) fn count_rows(&self, table: &str) -> Result<i64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(Error::from)
    }
}

fn ensure_project_exists(tx: &Transaction<'_>, project_id: &str) -> Result<()> {
    let exists = tx
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)",
            params![project_id],
            |row| row.get::<_, i64>(0),
        )
        .map(|n| n != 0)?;
    if exists {
        Ok(())
    } else {
        Err(Error::ProjectNotFound(project_id.to_string()))
    }
}

fn generate_id(tx: &Transaction<'_>, prefix: &str) -> rusqlite::Result<String> {
    tx.query_row("SELECT lower(hex(randomblob(16)))", [], |row| {
        let suffix: String = row.get(0)?;
        Ok(format!("{prefix}_{suffix}"))
    })
}

fn row_to_project(row: &Row<'_>) -> rusqlite::Result<ProjectRecord> {
    let platform_json: Option<String> = row.get(2)?;
    let platform = match platform_json {
        None => None,
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
    };
    Ok(ProjectRecord {
        id: row.get(0)?,
        session_key: row.get(1)?,
        platform,
        created_at_ms: row.get(3)?,
        updated_at_ms: row.get(4)?,
    })
}

fn collect_rows<T, F>(iter: rusqlite::MappedRows<'_, F>) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut rows = Vec::new();
    for row in iter {
        rows.push(row?);
    }
    Ok(rows)
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
