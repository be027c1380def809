//! Save/load text boundary
//!
//! One count line, then one line per creature: `<kind_code> <name> <x> <y>`.
//! Names are single whitespace-free tokens. Health and aliveness are not
//! persisted; a loaded record produces a fresh creature at full health.
//! Loading skips records that fail to parse; a malformed line is a
//! warning, never a fatal error.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::core::error::Result;
use crate::creature::arena::Arena;
use crate::creature::kind::CreatureKind;
use crate::creature::state::CreatureSpec;

pub fn save_all<W: Write>(arena: &Arena, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", arena.len())?;
    for creature in arena.iter() {
        let (x, y) = creature.position();
        writeln!(writer, "{} {} {} {}", creature.kind.code(), creature.name, x, y)?;
    }
    Ok(())
}

pub fn load_all<R: BufRead>(reader: R) -> Result<Vec<CreatureSpec>> {
    let mut lines = reader.lines();

    let count: usize = match lines.next() {
        Some(line) => line?.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("unreadable count line, loading nothing");
            0
        }),
        None => 0,
    };

    let mut specs = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match parse_record(&line) {
            Some(spec) => specs.push(spec),
            None => tracing::warn!(line = %line, "skipping malformed creature record"),
        }
    }
    Ok(specs)
}

pub fn save_to_file(arena: &Arena, path: impl AsRef<Path>) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    save_all(arena, &mut file)
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<CreatureSpec>> {
    let file = std::fs::File::open(path)?;
    load_all(BufReader::new(file))
}

/// Parse one record line; exactly four whitespace-separated tokens.
fn parse_record(line: &str) -> Option<CreatureSpec> {
    let mut parts = line.split_whitespace();
    let code: u8 = parts.next()?.parse().ok()?;
    let kind = CreatureKind::from_code(code)?;
    let name = parts.next()?.to_string();
    let x: i32 = parts.next()?.parse().ok()?;
    let y: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(CreatureSpec { kind, name, x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn arena() -> Arena {
        Arena::from_specs(&[
            CreatureSpec {
                kind: CreatureKind::Orc,
                name: "Orc_1".into(),
                x: 3,
                y: 7,
            },
            CreatureSpec {
                kind: CreatureKind::Druid,
                name: "Druid_2".into(),
                x: 20,
                y: 41,
            },
        ])
    }

    #[test]
    fn test_save_emits_count_line_then_records() {
        let mut buffer = Vec::new();
        save_all(&arena(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "2\n1 Orc_1 3 7\n4 Druid_2 20 41\n");
    }

    #[test]
    fn test_load_is_the_inverse_of_save() {
        let arena = arena();
        let mut buffer = Vec::new();
        save_all(&arena, &mut buffer).unwrap();

        let specs = load_all(Cursor::new(buffer)).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "Orc_1");
        assert_eq!(specs[0].kind, CreatureKind::Orc);
        assert_eq!((specs[0].x, specs[0].y), (3, 7));
        assert_eq!(specs[1].kind, CreatureKind::Druid);
    }

    #[test]
    fn test_malformed_records_are_skipped_not_fatal() {
        let input = "4\n1 Orc_1 3 7\n9 Ghost_2 1 1\nnot a record\n3 Bear_4 8 8\n";
        let specs = load_all(Cursor::new(input)).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "Orc_1");
        assert_eq!(specs[1].name, "Bear_4");
    }

    #[test]
    fn test_unreadable_count_loads_nothing() {
        let specs = load_all(Cursor::new("garbage\n1 Orc_1 3 7\n")).unwrap();
        assert!(specs.is_empty());
    }

    #[test]
    fn test_count_caps_the_number_of_records_read() {
        let input = "1\n1 Orc_1 3 7\n3 Bear_2 8 8\n";
        let specs = load_all(Cursor::new(input)).unwrap();
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn test_short_file_stops_at_eof() {
        let input = "5\n1 Orc_1 3 7\n";
        let specs = load_all(Cursor::new(input)).unwrap();
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn test_trailing_tokens_invalidate_a_record() {
        let input = "1\n1 Orc_1 3 7 extra\n";
        let specs = load_all(Cursor::new(input)).unwrap();
        assert!(specs.is_empty());
    }
}
