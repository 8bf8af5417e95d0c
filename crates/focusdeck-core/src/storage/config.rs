//! TOML-based subject configuration.
//!
//! Stores the user's study hierarchy:
//! - Top-level subjects, each with a target-hours budget
//! - Optional named tasks under each subject, each with its own target
//! - The dashboard theme color (an opaque token for the presentation layer)
//!
//! Configuration is stored at `~/.config/focusdeck/config.toml`. Renaming a
//! subject or task cascades into the session log so historical rows always
//! carry current names; deleting does not (deleted entries simply stop
//! matching, their history stays queryable).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::log::{RenameField, SessionLog};
use super::{atomic_write, data_dir};
use crate::error::{ConfigError, CoreError};

pub const DEFAULT_THEME_COLOR: &str = "#007AFF";

/// Minimum effective target, so progress math never divides by zero even if
/// a persisted target is malformed.
const TARGET_EPSILON: f64 = 0.1;

/// A named subdivision of a subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub target_hours: f64,
}

/// A top-level study category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub target_hours: f64,
    #[serde(default)]
    pub children: BTreeMap<String, Task>,
}

impl Subject {
    /// Target hours used for progress computation: the sum of task targets
    /// when any tasks exist, the subject's own target otherwise. A subject
    /// with tasks is a pure aggregate; its own target field is inert.
    pub fn effective_target(&self) -> f64 {
        if self.children.is_empty() {
            self.target_hours.max(TARGET_EPSILON)
        } else {
            self.children
                .values()
                .map(|t| t.target_hours)
                .sum::<f64>()
                .max(TARGET_EPSILON)
        }
    }
}

/// The persisted configuration tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default)]
    pub subjects: BTreeMap<String, Subject>,
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

impl Default for Config {
    /// Built-in starter tree, written on first run so the dashboard is
    /// usable without a setup step.
    fn default() -> Self {
        let mut subjects = BTreeMap::new();
        let mut engineering_children = BTreeMap::new();
        engineering_children.insert("System Design".to_string(), Task { target_hours: 40.0 });
        engineering_children.insert("Algorithms".to_string(), Task { target_hours: 60.0 });
        subjects.insert(
            "Engineering".to_string(),
            Subject {
                target_hours: 100.0,
                children: engineering_children,
            },
        );
        subjects.insert(
            "Design".to_string(),
            Subject {
                target_hours: 50.0,
                children: BTreeMap::new(),
            },
        );
        Config {
            theme_color: default_theme_color(),
            subjects,
        }
    }
}

/// File-backed store owning the subject tree.
///
/// All mutations persist before returning. `save` is atomic
/// (write-to-temp-then-rename), so `load` either sees the previous tree or
/// the new one, never a torn write.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Open the store at `~/.config/focusdeck/config.toml`.
    ///
    /// # Errors
    /// Returns `ConfigError::Corrupt` if a file exists but cannot be parsed.
    pub fn open() -> Result<Self, ConfigError> {
        let path = data_dir()?.join("config.toml");
        Self::open_at(path)
    }

    /// Open the store at an explicit path (used by tests and by callers that
    /// manage their own data directory).
    ///
    /// If no file exists the built-in default tree is written immediately,
    /// establishing it as the on-disk baseline.
    pub fn open_at(path: PathBuf) -> Result<Self, ConfigError> {
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Config::default();
                let store = ConfigStore {
                    path: path.clone(),
                    config,
                };
                store.save()?;
                return Ok(store);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(ConfigStore { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of the current tree.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.config.subjects.get(name)
    }

    /// Persist the current tree to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.config)?;
        atomic_write(&self.path, &content)?;
        Ok(())
    }

    /// Insert a new subject with an empty task set.
    ///
    /// # Errors
    /// `DuplicateName` if a subject with this name already exists.
    pub fn add_subject(&mut self, name: &str, target_hours: f64) -> Result<(), ConfigError> {
        validate_name("subject", name)?;
        validate_target(target_hours)?;
        if self.config.subjects.contains_key(name) {
            return Err(ConfigError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.config.subjects.insert(
            name.to_string(),
            Subject {
                target_hours,
                children: BTreeMap::new(),
            },
        );
        self.save()
    }

    /// Insert a new task under an existing subject.
    pub fn add_task(
        &mut self,
        subject: &str,
        name: &str,
        target_hours: f64,
    ) -> Result<(), ConfigError> {
        validate_name("task", name)?;
        validate_target(target_hours)?;
        let entry = self
            .config
            .subjects
            .get_mut(subject)
            .ok_or_else(|| ConfigError::UnknownSubject {
                name: subject.to_string(),
            })?;
        if entry.children.contains_key(name) {
            return Err(ConfigError::DuplicateName {
                name: name.to_string(),
            });
        }
        entry.children.insert(
            name.to_string(),
            Task { target_hours },
        );
        self.save()
    }

    /// Rename a subject, cascading the new name into every historical log
    /// row before the config is persisted, so config and log never disagree
    /// for longer than one operation.
    pub fn rename_subject(
        &mut self,
        old: &str,
        new: &str,
        log: &SessionLog,
    ) -> Result<(), CoreError> {
        validate_name("subject", new).map_err(CoreError::Config)?;
        if old == new {
            return Ok(());
        }
        if self.config.subjects.contains_key(new) {
            return Err(ConfigError::DuplicateName {
                name: new.to_string(),
            }
            .into());
        }
        let subject = self
            .config
            .subjects
            .remove(old)
            .ok_or_else(|| ConfigError::UnknownSubject {
                name: old.to_string(),
            })?;
        self.config.subjects.insert(new.to_string(), subject);
        log.rename_references(RenameField::Subject, old, new)?;
        self.save().map_err(CoreError::Config)
    }

    /// Rename a task under a subject, with the same log cascade as
    /// [`rename_subject`](Self::rename_subject).
    pub fn rename_task(
        &mut self,
        subject: &str,
        old: &str,
        new: &str,
        log: &SessionLog,
    ) -> Result<(), CoreError> {
        validate_name("task", new).map_err(CoreError::Config)?;
        if old == new {
            return Ok(());
        }
        let entry = self
            .config
            .subjects
            .get_mut(subject)
            .ok_or_else(|| ConfigError::UnknownSubject {
                name: subject.to_string(),
            })?;
        if entry.children.contains_key(new) {
            return Err(ConfigError::DuplicateName {
                name: new.to_string(),
            }
            .into());
        }
        let task = entry
            .children
            .remove(old)
            .ok_or_else(|| ConfigError::UnknownTask {
                subject: subject.to_string(),
                name: old.to_string(),
            })?;
        entry.children.insert(new.to_string(), task);
        log.rename_references(RenameField::Task, old, new)?;
        self.save().map_err(CoreError::Config)
    }

    /// Remove a subject from the tree. Historical sessions logged under it
    /// are left untouched and keep their original name.
    pub fn delete_subject(&mut self, name: &str) -> Result<(), ConfigError> {
        if self.config.subjects.remove(name).is_none() {
            return Err(ConfigError::UnknownSubject {
                name: name.to_string(),
            });
        }
        self.save()
    }

    /// Remove a task from its subject. Historical sessions are untouched.
    pub fn delete_task(&mut self, subject: &str, name: &str) -> Result<(), ConfigError> {
        let entry = self
            .config
            .subjects
            .get_mut(subject)
            .ok_or_else(|| ConfigError::UnknownSubject {
                name: subject.to_string(),
            })?;
        if entry.children.remove(name).is_none() {
            return Err(ConfigError::UnknownTask {
                subject: subject.to_string(),
                name: name.to_string(),
            });
        }
        self.save()
    }

    /// Store an opaque theme token for the presentation layer. Only
    /// non-emptiness is validated here.
    pub fn set_theme_color(&mut self, value: &str) -> Result<(), ConfigError> {
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "theme_color".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }
        self.config.theme_color = value.to_string();
        self.save()
    }
}

fn validate_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "name must be non-empty".to_string(),
        });
    }
    Ok(())
}

fn validate_target(target_hours: f64) -> Result<(), ConfigError> {
    if !target_hours.is_finite() || target_hours <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "target_hours".to_string(),
            message: "must be a positive number".to_string(),
        });
    }
    Ok(())
}
