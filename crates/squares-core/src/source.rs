//! Puzzle payloads and the sources they come from.
//!
//! A puzzle is looked up through a list of tiers: a per-theme file, then a
//! shared sample file, then a small puzzle compiled into the crate. Every
//! tier goes through the same [`PuzzleModel::build`] path, and a tier whose
//! payload fails to build is skipped like one that failed to load.

use crate::error::DataError;
use crate::puzzle::{check_size, Direction, Position, PuzzleModel, WordPlacement};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Grid dimensions used when a payload does not give any
pub const DEFAULT_SIZE: GridSize = GridSize { rows: 15, cols: 15 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueEntry {
    #[serde(default)]
    pub clue: String,
    pub answer: String,
    pub row: usize,
    pub col: usize,
}

/// Puzzle as stored on disk. Clue numbers in `across`/`down` are only
/// labels; the built model renumbers in raster order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzlePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<GridSize>,
    /// Optional solution grid, one string per cell, `#` for blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub across: BTreeMap<String, ClueEntry>,
    #[serde(default)]
    pub down: BTreeMap<String, ClueEntry>,
}

impl PuzzlePayload {
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    fn size(&self) -> GridSize {
        if let Some(size) = self.size {
            return size;
        }
        match &self.grid {
            Some(rows) if !rows.is_empty() => GridSize {
                rows: rows.len(),
                cols: rows.iter().map(Vec::len).max().unwrap_or(0),
            },
            _ => DEFAULT_SIZE,
        }
    }

    fn shipped_letter(&self, pos: Position) -> Option<char> {
        let cell = self.grid.as_ref()?.get(pos.row)?.get(pos.col)?;
        let mut chars = cell.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
            _ => None,
        }
    }

    /// Placements listed in the payload, ordered by clue label
    pub fn placements(&self) -> Vec<WordPlacement> {
        let mut words = Vec::with_capacity(self.across.len() + self.down.len());
        let lists = [(Direction::Across, &self.across), (Direction::Down, &self.down)];
        for (direction, clues) in lists {
            let mut entries: Vec<(&String, &ClueEntry)> = clues.iter().collect();
            entries.sort_by_key(|(label, _)| label.parse::<u32>().unwrap_or(u32::MAX));
            words.extend(entries.into_iter().map(|(_, entry)| {
                WordPlacement::new(&entry.answer, entry.row, entry.col, direction)
                    .with_clue(&entry.clue)
            }));
        }
        words
    }

    /// Word runs (two or more letters) read off the shipped grid
    fn placements_from_grid(&self, size: GridSize) -> Vec<WordPlacement> {
        let mut words = Vec::new();
        for direction in [Direction::Across, Direction::Down] {
            let (lines, len) = match direction {
                Direction::Across => (size.rows, size.cols),
                Direction::Down => (size.cols, size.rows),
            };
            for line in 0..lines {
                let at = |i: usize| match direction {
                    Direction::Across => Position::new(line, i),
                    Direction::Down => Position::new(i, line),
                };
                let mut i = 0;
                while i < len {
                    let start = i;
                    let mut word = String::new();
                    while let Some(letter) =
                        (i < len).then(|| self.shipped_letter(at(i))).flatten()
                    {
                        word.push(letter);
                        i += 1;
                    }
                    if word.len() >= 2 {
                        let pos = at(start);
                        words.push(WordPlacement::new(&word, pos.row, pos.col, direction));
                    }
                    i += 1;
                }
            }
        }
        words
    }

    /// Build the model, cross-checking a shipped grid against the words
    pub fn into_model(self) -> Result<PuzzleModel, DataError> {
        let size = self.size();
        check_size(size.rows, size.cols)?;
        let mut words = self.placements();
        if words.is_empty() && self.grid.is_some() {
            words = self.placements_from_grid(size);
        }

        let model = PuzzleModel::build(size.rows, size.cols, &words)?;

        if self.grid.is_some() {
            for row in 0..size.rows {
                for col in 0..size.cols {
                    let pos = Position::new(row, col);
                    if self.shipped_letter(pos) != model.letter_at(pos) {
                        return Err(DataError::GridMismatch { row, col });
                    }
                }
            }
        }

        Ok(model)
    }
}

/// Somewhere puzzle payloads can be fetched from, by theme key
pub trait PuzzleSource {
    /// Short label for logs
    fn name(&self) -> &str;
    fn fetch(&self, theme_key: &str) -> Result<PuzzlePayload, DataError>;
}

/// `<root>/puzzles/<theme key with spaces as underscores>.json`
#[derive(Debug, Clone)]
pub struct PuzzleDirectory {
    root: PathBuf,
}

impl PuzzleDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, theme_key: &str) -> PathBuf {
        self.root
            .join("puzzles")
            .join(format!("{}.json", theme_key.replace(' ', "_")))
    }
}

impl PuzzleSource for PuzzleDirectory {
    fn name(&self) -> &str {
        "theme puzzle"
    }

    fn fetch(&self, theme_key: &str) -> Result<PuzzlePayload, DataError> {
        PuzzlePayload::from_json(&fs::read_to_string(self.path_for(theme_key))?)
    }
}

/// One shared puzzle file served for every theme
#[derive(Debug, Clone)]
pub struct SampleFile {
    path: PathBuf,
}

impl SampleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PuzzleSource for SampleFile {
    fn name(&self) -> &str {
        "sample puzzle"
    }

    fn fetch(&self, _theme_key: &str) -> Result<PuzzlePayload, DataError> {
        PuzzlePayload::from_json(&fs::read_to_string(&self.path)?)
    }
}

/// Payloads held in memory, keyed by theme
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    payloads: HashMap<String, PuzzlePayload>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, theme_key: &str, payload: PuzzlePayload) -> Self {
        self.payloads.insert(theme_key.to_string(), payload);
        self
    }
}

impl PuzzleSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, theme_key: &str) -> Result<PuzzlePayload, DataError> {
        self.payloads
            .get(theme_key)
            .cloned()
            .ok_or_else(|| DataError::MissingTheme(theme_key.to_string()))
    }
}

/// Which tier a loaded puzzle came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleOrigin {
    /// Index into the source list, with the source's name
    Source { tier: usize, name: String },
    Builtin,
}

/// Ordered list of sources with the built-in puzzle as the last resort
#[derive(Default)]
pub struct PuzzleLoader {
    tiers: Vec<Box<dyn PuzzleSource>>,
}

impl PuzzleLoader {
    pub fn new(tiers: Vec<Box<dyn PuzzleSource>>) -> Self {
        Self { tiers }
    }

    /// The file layout under one data directory: per-theme puzzles, then
    /// `sample_crossword.json`
    pub fn for_data_dir(root: &Path) -> Self {
        Self::new(vec![
            Box::new(PuzzleDirectory::new(root)),
            Box::new(SampleFile::new(root.join("sample_crossword.json"))),
        ])
    }

    /// First tier that yields a buildable puzzle, else the built-in one
    pub fn load(&self, theme_key: &str) -> (PuzzleModel, PuzzleOrigin) {
        for (tier, source) in self.tiers.iter().enumerate() {
            match source.fetch(theme_key).and_then(PuzzlePayload::into_model) {
                Ok(model) => {
                    debug!(
                        theme = theme_key,
                        source = source.name(),
                        rows = model.rows(),
                        cols = model.cols(),
                        across = model.placements(Direction::Across).count(),
                        down = model.placements(Direction::Down).count(),
                        "puzzle loaded"
                    );
                    return (
                        model,
                        PuzzleOrigin::Source {
                            tier,
                            name: source.name().to_string(),
                        },
                    );
                }
                Err(err) => {
                    warn!(
                        theme = theme_key,
                        source = source.name(),
                        %err,
                        "puzzle source failed, falling back"
                    );
                }
            }
        }
        warn!(theme = theme_key, "using built-in puzzle");
        (builtin_puzzle(), PuzzleOrigin::Builtin)
    }
}

/// Words of the built-in puzzle
///
/// ```text
/// S L A Y # #
/// I # # # # #
/// M I D # # #
/// P # R I Z Z
/// # # I # # #
/// # # P # # #
/// ```
pub fn builtin_placements() -> Vec<WordPlacement> {
    vec![
        WordPlacement::new("SLAY", 0, 0, Direction::Across)
            .with_clue("Do something exceptionally well"),
        WordPlacement::new("SIMP", 0, 0, Direction::Down)
            .with_clue("Does way too much for a crush"),
        WordPlacement::new("MID", 2, 0, Direction::Across).with_clue("Mediocre, nothing special"),
        WordPlacement::new("DRIP", 2, 2, Direction::Down).with_clue("A seriously stylish outfit"),
        WordPlacement::new("RIZZ", 3, 2, Direction::Across).with_clue("Charisma or charm"),
    ]
}

pub fn builtin_puzzle() -> PuzzleModel {
    PuzzleModel::build(6, 6, &builtin_placements()).expect("built-in puzzle is consistent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PuzzleError;

    fn payload_json() -> &'static str {
        r#"{
            "theme": "Urban Dictionary Essentials",
            "size": { "rows": 4, "cols": 4 },
            "across": { "1": { "clue": "Do it well", "answer": "SLAY", "row": 0, "col": 0 } },
            "down": { "1": { "clue": "Too devoted", "answer": "SIMP", "row": 0, "col": 0 } }
        }"#
    }

    #[test]
    fn test_payload_into_model() {
        let model = PuzzlePayload::from_json(payload_json()).unwrap().into_model().unwrap();

        assert_eq!(model.rows(), 4);
        assert_eq!(model.white_count(), 7);
        let slay = model.placement(1, Direction::Across).unwrap();
        assert_eq!(slay.clue, "Do it well");
    }

    #[test]
    fn test_payload_labels_are_renumbered() {
        let json = r#"{
            "size": { "rows": 1, "cols": 9 },
            "across": { "12": { "answer": "FIRE", "row": 0, "col": 5 },
                        "3":  { "answer": "STAN", "row": 0, "col": 0 } }
        }"#;
        let model = PuzzlePayload::from_json(json).unwrap().into_model().unwrap();

        assert_eq!(model.placement(1, Direction::Across).unwrap().answer, "STAN");
        assert_eq!(model.placement(2, Direction::Across).unwrap().answer, "FIRE");
    }

    #[test]
    fn test_payload_default_size() {
        let json = r#"{ "across": { "1": { "answer": "VIBES", "row": 14, "col": 10 } } }"#;
        let model = PuzzlePayload::from_json(json).unwrap().into_model().unwrap();
        assert_eq!((model.rows(), model.cols()), (15, 15));
    }

    #[test]
    fn test_payload_grid_must_agree() {
        let mut payload = PuzzlePayload::from_json(payload_json()).unwrap();
        let row = |s: &str| s.chars().map(|c| c.to_string()).collect::<Vec<_>>();
        payload.grid = Some(vec![row("SLAY"), row("I###"), row("M###"), row("P###")]);
        assert!(payload.clone().into_model().is_ok());

        payload.grid = Some(vec![row("SLAY"), row("I###"), row("M#X#"), row("P###")]);
        assert!(matches!(
            payload.into_model(),
            Err(DataError::GridMismatch { row: 2, col: 2 })
        ));
    }

    #[test]
    fn test_payload_grid_only() {
        let row = |s: &str| s.chars().map(|c| c.to_string()).collect::<Vec<_>>();
        let payload = PuzzlePayload {
            grid: Some(vec![row("SLAY"), row("I#A#"), row("M#S#"), row("P###")]),
            ..Default::default()
        };
        let model = payload.into_model().unwrap();

        let words: Vec<&str> = model.all_placements().map(|p| p.answer.as_str()).collect();
        assert_eq!(words, vec!["SLAY", "SIMP", "AAS"]);
        assert_eq!(model.clue_number_at(0, 2), Some(2));
    }

    #[test]
    fn test_payload_conflict_surfaces() {
        let json = r#"{
            "size": { "rows": 5, "cols": 5 },
            "across": { "1": { "answer": "RIZZ", "row": 1, "col": 1 } },
            "down": { "1": { "answer": "VIBES", "row": 1, "col": 1 } }
        }"#;
        let err = PuzzlePayload::from_json(json).unwrap().into_model().unwrap_err();
        assert!(matches!(err, DataError::Puzzle(PuzzleError::Conflict { .. })));
    }

    #[test]
    fn test_loader_falls_through_tiers() {
        let broken = PuzzlePayload::from_json(
            r#"{
                "size": { "rows": 2, "cols": 2 },
                "across": { "1": { "answer": "SLAY", "row": 0, "col": 0 } }
            }"#,
        )
        .unwrap();
        let good = PuzzlePayload::from_json(payload_json()).unwrap();

        let loader = PuzzleLoader::new(vec![
            Box::new(MemorySource::new().with("Day 1", broken)),
            Box::new(MemorySource::new().with("Day 1", good)),
        ]);

        let (model, origin) = loader.load("Day 1");
        assert_eq!(model.white_count(), 7);
        assert_eq!(
            origin,
            PuzzleOrigin::Source {
                tier: 1,
                name: "memory".to_string()
            }
        );

        let (model, origin) = loader.load("Day 2");
        assert_eq!(origin, PuzzleOrigin::Builtin);
        assert_eq!(model, builtin_puzzle());
    }

    #[test]
    fn test_loader_missing_files() {
        let loader = PuzzleLoader::for_data_dir(Path::new("/no/such/data/dir"));
        let (_, origin) = loader.load("Day 1");
        assert_eq!(origin, PuzzleOrigin::Builtin);
    }

    #[test]
    fn test_loader_skips_unbuildable_coordinates() {
        let far_down = PuzzlePayload::from_json(
            r#"{
                "size": { "rows": 4, "cols": 4 },
                "down": { "1": { "answer": "SLAY", "row": 18446744073709551615, "col": 0 } }
            }"#,
        )
        .unwrap();
        let err = far_down.clone().into_model().unwrap_err();
        assert!(matches!(err, DataError::Puzzle(PuzzleError::OutOfBounds { .. })));

        let loader = PuzzleLoader::new(vec![Box::new(MemorySource::new().with("Day 1", far_down))]);
        let (model, origin) = loader.load("Day 1");
        assert_eq!(origin, PuzzleOrigin::Builtin);
        assert_eq!(model, builtin_puzzle());
    }

    #[test]
    fn test_loader_skips_oversized_grid() {
        let huge = PuzzlePayload::from_json(
            r#"{
                "size": { "rows": 4294967296, "cols": 4294967296 },
                "across": { "1": { "answer": "SLAY", "row": 0, "col": 0 } }
            }"#,
        )
        .unwrap();
        let err = huge.clone().into_model().unwrap_err();
        assert!(matches!(err, DataError::Puzzle(PuzzleError::TooLarge { .. })));

        let loader = PuzzleLoader::new(vec![Box::new(MemorySource::new().with("Day 1", huge))]);
        let (_, origin) = loader.load("Day 1");
        assert_eq!(origin, PuzzleOrigin::Builtin);
    }

    #[test]
    fn test_directory_path() {
        let dir = PuzzleDirectory::new("/data");
        assert_eq!(dir.path_for("Day 12"), PathBuf::from("/data/puzzles/Day_12.json"));
    }

    #[test]
    fn test_directory_reads_file() {
        let root = std::env::temp_dir().join(format!("squares-source-{}", std::process::id()));
        fs::create_dir_all(root.join("puzzles")).unwrap();
        fs::write(root.join("puzzles").join("Day_1.json"), payload_json()).unwrap();

        let loader = PuzzleLoader::for_data_dir(&root);
        let (model, origin) = loader.load("Day 1");

        fs::remove_dir_all(&root).unwrap();
        assert_eq!(model.white_count(), 7);
        assert!(matches!(origin, PuzzleOrigin::Source { tier: 0, .. }));
    }

    #[test]
    fn test_builtin_puzzle() {
        let puzzle = builtin_puzzle();
        assert_eq!(puzzle.white_count(), 15);
        assert_eq!(puzzle.to_string(), "SLAY##\nI#####\nMID###\nP#RIZZ\n##I###\n##P###\n");
        assert_eq!(puzzle.clue_number_at(2, 2), Some(3));
        assert_eq!(puzzle.placement(4, Direction::Across).unwrap().answer, "RIZZ");
    }
}
