//! Bundled observers: console and file sinks
//!
//! Thin, replaceable collaborators behind the `InteractionObserver`
//! contract. The core never depends on them; drop or swap them freely.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::core::types::Outcome;
use crate::creature::state::Creature;
use crate::engine::observer::InteractionObserver;

/// Prints one line per applied outcome to stdout.
#[derive(Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl InteractionObserver for ConsoleObserver {
    fn on_interaction(&self, actor: &Creature, target: &Creature, outcome: Outcome) {
        match outcome {
            Outcome::Escaped => println!(
                ">>> {} ({}) escaped from {} ({})",
                target.name, target.kind, actor.name, actor.kind
            ),
            Outcome::NoInteraction => {}
            _ => println!(
                ">>> {} ({}) {} {} ({})",
                actor.name,
                actor.kind,
                outcome.verb(),
                target.name,
                target.kind
            ),
        }
    }
}

// Column widths for the file log
const W_NAME: usize = 18;
const W_KIND: usize = 10;
const W_POS: usize = 11;
const W_ACTION: usize = 10;

/// Appends fixed-width rows to a log file, one per applied outcome.
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileObserver {
    /// Create (truncating) the log file and write the header row.
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Arc<Self>> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        writeln!(
            file,
            "{:<W_NAME$}{:<W_KIND$}{:<W_POS$}{:<W_ACTION$}{:<W_NAME$}{:<W_KIND$}{:<W_POS$}",
            "Actor", "Kind", "Pos", "Action", "Target", "Kind", "Pos"
        )?;
        writeln!(
            file,
            "{}",
            "-".repeat(W_NAME * 2 + W_KIND * 2 + W_POS * 2 + W_ACTION)
        )?;
        Ok(Arc::new(Self {
            path,
            file: Mutex::new(file),
        }))
    }
}

fn format_row(lead: &Creature, action: &str, trail: &Creature) -> String {
    let (lx, ly) = lead.position();
    let (tx, ty) = trail.position();
    format!(
        "{:<W_NAME$}{:<W_KIND$}{:<W_POS$}{:<W_ACTION$}{:<W_NAME$}{:<W_KIND$}{:<W_POS$}",
        lead.name,
        lead.kind.as_str(),
        format!("({lx},{ly})"),
        action,
        trail.name,
        trail.kind.as_str(),
        format!("({tx},{ty})")
    )
}

impl InteractionObserver for FileObserver {
    fn on_interaction(&self, actor: &Creature, target: &Creature, outcome: Outcome) {
        // Escaped rows lead with the escapee
        let row = match outcome {
            Outcome::NoInteraction => return,
            Outcome::Escaped => format_row(target, outcome.verb(), actor),
            _ => format_row(actor, outcome.verb(), target),
        };
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(file, "{row}") {
            tracing::warn!(path = %self.path.display(), %err, "failed to append interaction row");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CreatureId;
    use crate::creature::kind::CreatureKind;
    use crate::creature::state::CreatureSpec;

    fn creature(id: u32, kind: CreatureKind, name: &str, x: i32, y: i32) -> Creature {
        Creature::new(
            CreatureId(id),
            &CreatureSpec {
                kind,
                name: name.to_string(),
                x,
                y,
            },
        )
    }

    #[test]
    fn test_row_columns_are_fixed_width() {
        let orc = creature(0, CreatureKind::Orc, "Orc_1", 3, 4);
        let bear = creature(1, CreatureKind::Bear, "Bear_2", 10, 4);
        let row = format_row(&orc, "hurt", &bear);

        assert!(row.starts_with("Orc_1"));
        assert_eq!(&row[W_NAME..W_NAME + 3], "Orc");
        assert_eq!(
            &row[W_NAME + W_KIND..W_NAME + W_KIND + 5],
            "(3,4)"
        );
        let action_start = W_NAME + W_KIND + W_POS;
        assert_eq!(&row[action_start..action_start + 4], "hurt");
        let target_start = action_start + W_ACTION;
        assert_eq!(&row[target_start..target_start + 6], "Bear_2");
    }

    #[test]
    fn test_file_observer_writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!(
            "wildmarch_observer_test_{}.log",
            std::process::id()
        ));
        let observer = FileObserver::create(&path).unwrap();

        let orc = creature(0, CreatureKind::Orc, "Orc_1", 3, 4);
        let bear = creature(1, CreatureKind::Bear, "Bear_2", 10, 4);
        observer.on_interaction(&orc, &bear, Outcome::Hurt);
        observer.on_interaction(&orc, &bear, Outcome::NoInteraction);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        // Header, separator, and exactly one row (NoInteraction writes none)
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Actor"));
        assert!(lines[2].contains("hurt"));

        std::fs::remove_file(&path).ok();
    }
}
